// Layout of the distributions sheet.
//
// The layout is computed first, as plain rows, together with the position of
// each question in the sheet. The chart drawer only relies on these positions.

use log::{debug, warn};
use rust_xlsxwriter::{ColNum, RowNum, Workbook};
use snafu::prelude::*;

use crate::charts::io_xlsx::write_answer;
use crate::charts::*;

pub const DISTRIBUTIONS_SHEET: &str = "distributions";

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Label(String),
    Value(Answer),
    Count(u64),
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum BlockKind {
    /// Answers in the first column, counts in the second one.
    Pie,
    /// Options in the first column, then one column of counts per answer.
    /// The answers are in the header row, just above the data.
    Bar { header_row: RowNum, last_col: ColNum },
}

/// Where the distribution of one question was written.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DataBlock {
    pub question: String,
    pub title_row: RowNum,
    pub first_row: RowNum,
    pub last_row: RowNum,
    pub kind: BlockKind,
}

impl DataBlock {
    /// The number of rows taken by the block, title included.
    pub fn row_span(&self) -> u32 {
        self.last_row - self.title_row + 1
    }

    pub fn entry_count(&self) -> u32 {
        self.last_row - self.first_row + 1
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct DistributionSheet {
    pub rows: Vec<Vec<Cell>>,
    pub blocks: Vec<DataBlock>,
}

impl DistributionSheet {
    fn next_row(&self) -> RowNum {
        self.rows.len() as RowNum
    }

    fn push_single(&mut self, question: &str, tally: &Tally) {
        let title_row = self.next_row();
        self.rows.push(vec![Cell::Label(question.to_string())]);
        for (answer, count) in tally.sorted() {
            self.rows.push(vec![Cell::Value(answer), Cell::Count(count)]);
        }
        self.blocks.push(DataBlock {
            question: question.to_string(),
            title_row,
            first_row: title_row + 1,
            last_row: self.next_row() - 1,
            kind: BlockKind::Pie,
        });
    }

    fn push_multi(&mut self, question: &str, options: &[(String, Tally)]) {
        let values = answer_values(options);
        let title_row = self.next_row();
        self.rows.push(vec![Cell::Label(question.to_string())]);

        let mut header = vec![Cell::Empty];
        header.extend(values.iter().map(|v| Cell::Value(v.clone())));
        self.rows.push(header);

        for (name, tally) in options {
            let mut row = vec![Cell::Label(name.clone())];
            row.extend(values.iter().map(|v| Cell::Count(tally.get(v))));
            self.rows.push(row);
        }
        self.blocks.push(DataBlock {
            question: question.to_string(),
            title_row,
            first_row: title_row + 2,
            last_row: self.next_row() - 1,
            kind: BlockKind::Bar {
                header_row: title_row + 1,
                last_col: values.len() as ColNum,
            },
        });
    }
}

/// The answers given to any option: first those of the first option, in the
/// order they were seen, then the ones that only appear in later options.
fn answer_values(options: &[(String, Tally)]) -> Vec<Answer> {
    let mut res: Vec<Answer> = Vec::new();
    for (_, tally) in options {
        for a in tally.keys() {
            if !res.contains(a) {
                res.push(a.clone());
            }
        }
    }
    res
}

/// Lays out all the distributions one after the other.
///
/// Questions without any answer are skipped.
pub fn layout_distributions(distributions: &[QuestionDistribution]) -> DistributionSheet {
    let mut sheet = DistributionSheet::default();
    for qd in distributions {
        if qd.distribution.is_empty() {
            warn!(
                "layout_distributions: no answer for question {:?}, skipping",
                qd.question
            );
            continue;
        }
        match &qd.distribution {
            Distribution::SingleOption(tally) => sheet.push_single(&qd.question, tally),
            Distribution::MultiOption(options) => sheet.push_multi(&qd.question, options),
        }
        debug!(
            "layout_distributions: {:?}",
            sheet.blocks.last().map(|b| (b.title_row, b.last_row))
        );
    }
    sheet
}

/// Adds the distributions sheet to the workbook.
pub fn write_distribution_sheet(
    workbook: &mut Workbook,
    sheet: &DistributionSheet,
) -> ChartResult<()> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(DISTRIBUTIONS_SHEET)
        .context(BuildingSheetSnafu {
            sheet: DISTRIBUTIONS_SHEET,
        })?;
    for (row_idx, row) in sheet.rows.iter().enumerate() {
        let row_num = row_idx as RowNum;
        for (col_idx, cell) in row.iter().enumerate() {
            let col_num = col_idx as ColNum;
            let res = match cell {
                Cell::Empty => Ok(()),
                Cell::Label(s) => worksheet.write_string(row_num, col_num, s).map(|_| ()),
                Cell::Value(a) => write_answer(worksheet, row_num, col_num, a),
                Cell::Count(c) => worksheet
                    .write_number(row_num, col_num, *c as f64)
                    .map(|_| ()),
            };
            res.context(BuildingSheetSnafu {
                sheet: DISTRIBUTIONS_SHEET,
            })?;
        }
    }
    debug!(
        "write_distribution_sheet: {} rows, {} questions",
        sheet.rows.len(),
        sheet.blocks.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(question: &str, answers: &[&str]) -> QuestionDistribution {
        QuestionDistribution {
            question: question.to_string(),
            distribution: Distribution::SingleOption(
                answers.iter().map(|a| Answer::text(a)).collect(),
            ),
        }
    }

    fn multi(question: &str, options: &[(&str, &[&str])]) -> QuestionDistribution {
        QuestionDistribution {
            question: question.to_string(),
            distribution: Distribution::MultiOption(
                options
                    .iter()
                    .map(|(n, xs)| (n.to_string(), xs.iter().map(|a| Answer::text(a)).collect()))
                    .collect(),
            ),
        }
    }

    fn label(s: &str) -> Cell {
        Cell::Label(s.to_string())
    }

    fn value(s: &str) -> Cell {
        Cell::Value(Answer::text(s))
    }

    #[test]
    fn color_rows() {
        let sheet = layout_distributions(&[single("Color", &["Red", "Blue", "Red"])]);
        assert_eq!(
            sheet.rows,
            vec![
                vec![label("Color")],
                vec![value("Blue"), Cell::Count(1)],
                vec![value("Red"), Cell::Count(2)],
            ]
        );
        assert_eq!(
            sheet.blocks,
            vec![DataBlock {
                question: "Color".to_string(),
                title_row: 0,
                first_row: 1,
                last_row: 2,
                kind: BlockKind::Pie,
            }]
        );
    }

    #[test]
    fn multi_rows() {
        let sheet = layout_distributions(&[multi(
            "Rate",
            &[
                ("Food", &["Good", "Bad", "Good"][..]),
                ("Service", &["Meh", "Good"][..]),
            ],
        )]);
        assert_eq!(
            sheet.rows,
            vec![
                vec![label("Rate")],
                vec![Cell::Empty, value("Good"), value("Bad"), value("Meh")],
                vec![label("Food"), Cell::Count(2), Cell::Count(1), Cell::Count(0)],
                vec![label("Service"), Cell::Count(1), Cell::Count(0), Cell::Count(1)],
            ]
        );
        let block = &sheet.blocks[0];
        assert_eq!(block.first_row, 2);
        assert_eq!(block.last_row, 3);
        assert_eq!(
            block.kind,
            BlockKind::Bar {
                header_row: 1,
                last_col: 3
            }
        );
    }

    #[test]
    fn same_label_answers_stay_apart() {
        let tally: Tally = vec![
            Answer::text("1"),
            Answer::number(1.0),
            Answer::number(1.0),
            Answer::text("TRUE"),
            Answer::Bool(true),
        ]
        .into_iter()
        .collect();
        let sheet = layout_distributions(&[QuestionDistribution {
            question: "Level".to_string(),
            distribution: Distribution::SingleOption(tally),
        }]);
        assert_eq!(
            sheet.rows[1..].to_vec(),
            vec![
                vec![Cell::Value(Answer::Bool(true)), Cell::Count(1)],
                vec![Cell::Value(Answer::number(1.0)), Cell::Count(2)],
                vec![value("1"), Cell::Count(1)],
                vec![value("TRUE"), Cell::Count(1)],
            ]
        );
        let written: u64 = sheet.rows[1..]
            .iter()
            .map(|row| match row[1] {
                Cell::Count(c) => c,
                _ => 0,
            })
            .sum();
        assert_eq!(written, 5);
    }

    #[test]
    fn row_accounting() {
        let sheet = layout_distributions(&[
            single("Color", &["Red", "Blue", "Red"]),
            multi("Rate", &[("Food", &["Good"][..]), ("Service", &["Bad"][..])]),
            single("Nobody", &[]),
            single("Zone", &["North"]),
        ]);
        assert_eq!(sheet.blocks.len(), 3);
        let mut next_row = 0;
        for block in sheet.blocks.iter() {
            assert_eq!(block.title_row, next_row);
            let header_rows = match block.kind {
                BlockKind::Pie => 1,
                BlockKind::Bar { .. } => 2,
            };
            assert_eq!(block.row_span(), block.entry_count() + header_rows);
            next_row += block.row_span();
        }
        assert_eq!(next_row as usize, sheet.rows.len());
    }
}
