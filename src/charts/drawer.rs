use log::debug;
use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartDataLabelPosition, ChartType, ColNum, RowNum, Workbook,
};
use snafu::prelude::*;

use crate::charts::layout::{BlockKind, DataBlock, DISTRIBUTIONS_SHEET};
use crate::charts::*;

pub fn chart_sheet_name(idx: usize) -> String {
    format!("diagram{}", idx)
}

/// The cells one chart series points at, as `sheet!$A$1:$A$2` references.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SeriesRanges {
    pub name: Option<String>,
    pub categories: String,
    pub values: String,
}

/// Column letters of a zero-based column index (0 -> A, 26 -> AA).
fn col_to_letter(col: ColNum) -> String {
    let mut result = String::new();
    let mut n = col as u32;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

fn cell_ref(row: RowNum, col: ColNum) -> String {
    format!("${}${}", col_to_letter(col), row + 1)
}

fn column_ref(col: ColNum, first_row: RowNum, last_row: RowNum) -> String {
    format!(
        "{}!{}:{}",
        DISTRIBUTIONS_SHEET,
        cell_ref(first_row, col),
        cell_ref(last_row, col)
    )
}

/// The series of the chart of a block: a single one for pie charts, one per
/// answer column for bar charts.
pub fn series_ranges(block: &DataBlock) -> Vec<SeriesRanges> {
    let (first, last) = (block.first_row, block.last_row);
    match block.kind {
        BlockKind::Pie => vec![SeriesRanges {
            name: None,
            categories: column_ref(0, first, last),
            values: column_ref(1, first, last),
        }],
        BlockKind::Bar {
            header_row,
            last_col,
        } => (1..=last_col)
            .map(|col| SeriesRanges {
                name: Some(format!(
                    "{}!{}",
                    DISTRIBUTIONS_SHEET,
                    cell_ref(header_row, col)
                )),
                categories: column_ref(0, first, last),
                values: column_ref(col, first, last),
            })
            .collect(),
    }
}

/// A pie chart for single-option questions, and a clustered column chart with
/// one series per answer for the other ones.
pub fn build_chart(block: &DataBlock) -> Chart {
    let mut chart = match block.kind {
        BlockKind::Pie => Chart::new(ChartType::Pie),
        BlockKind::Bar { .. } => Chart::new(ChartType::Column),
    };
    let mut labels = ChartDataLabel::new();
    labels
        .show_percentage()
        .set_position(ChartDataLabelPosition::OutsideEnd);

    for ranges in series_ranges(block) {
        let series = chart
            .add_series()
            .set_categories(format!("={}", ranges.categories).as_str())
            .set_values(format!("={}", ranges.values).as_str());
        if let Some(name) = &ranges.name {
            series.set_name(format!("={}", name).as_str());
        }
        if block.kind == BlockKind::Pie {
            series.set_data_label(&labels);
        }
    }
    chart.title().set_name(block.question.as_str());
    chart
}

/// Adds one chart sheet per block, in order.
pub fn draw_charts(workbook: &mut Workbook, blocks: &[DataBlock]) -> ChartResult<()> {
    for (idx, block) in blocks.iter().enumerate() {
        let name = chart_sheet_name(idx);
        debug!(
            "draw_charts: {}: {:?}: {} entries from row {}",
            name,
            block.question,
            block.entry_count(),
            block.first_row
        );
        let chart = build_chart(block);
        let chartsheet = workbook.add_chartsheet();
        chartsheet
            .set_name(name.as_str())
            .context(BuildingSheetSnafu { sheet: name.as_str() })?;
        chartsheet
            .insert_chart(0, 0, &chart)
            .context(BuildingSheetSnafu { sheet: name.as_str() })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::layout::layout_distributions;

    #[test]
    fn one_sheet_per_block() {
        let distributions = vec![
            QuestionDistribution {
                question: "Color".to_string(),
                distribution: Distribution::SingleOption(
                    vec![Answer::text("Red"), Answer::text("Blue")]
                        .into_iter()
                        .collect(),
                ),
            },
            QuestionDistribution {
                question: "Rate".to_string(),
                distribution: Distribution::MultiOption(vec![
                    ("Food".to_string(), vec![Answer::text("Good")].into_iter().collect()),
                    ("Service".to_string(), vec![Answer::text("Bad")].into_iter().collect()),
                ]),
            },
        ];
        let sheet = layout_distributions(&distributions);
        let mut workbook = Workbook::new();
        workbook
            .add_worksheet()
            .set_name(DISTRIBUTIONS_SHEET)
            .unwrap();
        draw_charts(&mut workbook, &sheet.blocks).unwrap();
        assert!(workbook.worksheet_from_name("diagram0").is_ok());
        assert!(workbook.worksheet_from_name("diagram1").is_ok());
        assert!(workbook.worksheet_from_name("diagram2").is_err());
    }

    #[test]
    fn chart_ranges() {
        let distributions = vec![
            QuestionDistribution {
                question: "Color".to_string(),
                distribution: Distribution::SingleOption(
                    vec![Answer::text("Red"), Answer::text("Blue")]
                        .into_iter()
                        .collect(),
                ),
            },
            QuestionDistribution {
                question: "Rate".to_string(),
                distribution: Distribution::MultiOption(vec![
                    (
                        "Food".to_string(),
                        vec![Answer::text("Good"), Answer::text("Bad")]
                            .into_iter()
                            .collect(),
                    ),
                    ("Service".to_string(), vec![Answer::text("Bad")].into_iter().collect()),
                ]),
            },
        ];
        let sheet = layout_distributions(&distributions);

        assert_eq!(
            series_ranges(&sheet.blocks[0]),
            vec![SeriesRanges {
                name: None,
                categories: "distributions!$A$2:$A$3".to_string(),
                values: "distributions!$B$2:$B$3".to_string(),
            }]
        );
        assert_eq!(
            series_ranges(&sheet.blocks[1]),
            vec![
                SeriesRanges {
                    name: Some("distributions!$B$5".to_string()),
                    categories: "distributions!$A$6:$A$7".to_string(),
                    values: "distributions!$B$6:$B$7".to_string(),
                },
                SeriesRanges {
                    name: Some("distributions!$C$5".to_string()),
                    categories: "distributions!$A$6:$A$7".to_string(),
                    values: "distributions!$C$6:$C$7".to_string(),
                },
            ]
        );
    }

    #[test]
    fn column_letters() {
        assert_eq!(col_to_letter(0), "A");
        assert_eq!(col_to_letter(25), "Z");
        assert_eq!(col_to_letter(26), "AA");
        assert_eq!(cell_ref(4, 1), "$B$5");
    }

    #[test]
    fn sheet_names() {
        assert_eq!(chart_sheet_name(0), "diagram0");
        assert_eq!(chart_sheet_name(12), "diagram12");
    }
}
