// Reading the responses workbook, and copying its sheets to the output.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use log::{debug, warn};
use rust_xlsxwriter::{ColNum, RowNum, Workbook, Worksheet, XlsxError};
use snafu::prelude::*;

use crate::charts::*;

/// The values of one worksheet of the input workbook.
#[derive(PartialEq, Debug, Clone)]
pub struct SourceSheet {
    pub name: String,
    /// Position of the top-left cell of `rows` in the worksheet.
    pub start: (u32, u32),
    pub rows: Vec<Vec<Option<Answer>>>,
}

pub fn read_workbook(path: &str) -> ChartResult<Vec<SourceSheet>> {
    let mut workbook: Xlsx<_> =
        open_workbook(path).context(OpeningExcelSnafu { path: path.to_string() })?;
    let mut res: Vec<SourceSheet> = Vec::new();
    for (name, wrange) in workbook.worksheets() {
        debug!(
            "read_workbook: path: {:?} worksheet: {:?} size: {:?}",
            path,
            name,
            wrange.get_size()
        );
        res.push(read_sheet(&name, &wrange)?);
    }
    Ok(res)
}

fn read_sheet(name: &str, wrange: &Range<DataType>) -> ChartResult<SourceSheet> {
    let start = wrange.start().unwrap_or((0, 0));
    let mut rows: Vec<Vec<Option<Answer>>> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        let mut cells: Vec<Option<Answer>> = Vec::new();
        for (col_idx, cell) in row.iter().enumerate() {
            cells.push(read_answer(
                cell,
                start.0 + idx as u32 + 1,
                start.1 + col_idx as u32 + 1,
            )?);
        }
        rows.push(cells);
    }
    Ok(SourceSheet {
        name: name.to_string(),
        start,
        rows,
    })
}

/// Converts a cell. `row` and `col` are only used for error reporting.
pub fn read_answer(cell: &DataType, row: u32, col: u32) -> ChartResult<Option<Answer>> {
    match cell {
        DataType::String(s) => Ok(Some(Answer::Text(s.clone()))),
        DataType::Float(f) => Ok(Some(Answer::number(*f))),
        DataType::Int(i) => Ok(Some(Answer::number(*i as f64))),
        DataType::Bool(b) => Ok(Some(Answer::Bool(*b))),
        // Dates are kept as their serial number.
        DataType::DateTime(f) => Ok(Some(Answer::number(*f))),
        DataType::Empty => Ok(None),
        #[allow(unreachable_patterns)]
        _ => Err(ChartError::ExcelWrongCellType {
            row,
            col,
            content: format!("{:?}", cell),
        }),
    }
}

/// The worksheet holding the responses.
pub fn first_sheet<'a>(sheets: &'a [SourceSheet], path: &str) -> ChartResult<&'a SourceSheet> {
    sheets.first().context(EmptyExcelSnafu { path })
}

/// Splits a worksheet into columns. The first row holds the headers.
///
/// Columns without header are dropped.
pub fn extract_columns(sheet: &SourceSheet) -> Vec<Column> {
    let header = match sheet.rows.first() {
        Some(h) => h,
        None => return vec![],
    };
    let mut res: Vec<Column> = Vec::new();
    for (col_idx, header_cell) in header.iter().enumerate() {
        let answers: Vec<Option<Answer>> = sheet.rows[1..]
            .iter()
            .map(|row| row.get(col_idx).cloned().flatten())
            .collect();
        match header_cell {
            Some(h) => res.push(Column {
                header: h.to_string(),
                answers,
            }),
            None if answers.iter().any(|a| a.is_some()) => {
                warn!(
                    "extract_columns: column {} of {:?} has answers but no header, skipping",
                    col_idx + 1,
                    sheet.name
                );
            }
            None => {}
        }
    }
    res
}

pub fn write_answer(
    worksheet: &mut Worksheet,
    row: RowNum,
    col: ColNum,
    answer: &Answer,
) -> Result<(), XlsxError> {
    match answer {
        Answer::Bool(b) => worksheet.write_boolean(row, col, *b)?,
        Answer::Number(n) => worksheet.write_number(row, col, n.value())?,
        Answer::Text(s) => worksheet.write_string(row, col, s)?,
    };
    Ok(())
}

/// Writes the values of an input sheet to a new worksheet with the same name.
pub fn copy_sheet(workbook: &mut Workbook, sheet: &SourceSheet) -> ChartResult<()> {
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(sheet.name.as_str())
        .context(BuildingSheetSnafu {
            sheet: sheet.name.as_str(),
        })?;
    for (idx, row) in sheet.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            if let Some(answer) = cell {
                write_answer(
                    worksheet,
                    sheet.start.0 + idx as RowNum,
                    (sheet.start.1 as usize + col_idx) as ColNum,
                    answer,
                )
                .context(BuildingSheetSnafu {
                    sheet: sheet.name.as_str(),
                })?;
            }
        }
    }
    debug!(
        "copy_sheet: {:?}: {} rows copied",
        sheet.name,
        sheet.rows.len()
    );
    Ok(())
}
