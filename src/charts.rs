use log::{debug, info, warn};

use snafu::{prelude::*, ErrorCompat, Snafu};

use rust_xlsxwriter::Workbook;

use survey_tally::*;

use crate::args::Args;
use crate::charts::drawer::draw_charts;
use crate::charts::io_xlsx::{copy_sheet, extract_columns, first_sheet, read_workbook};
use crate::charts::layout::{layout_distributions, write_distribution_sheet};

pub mod drawer;
pub mod io_xlsx;
pub mod layout;

#[derive(Debug, Snafu)]
pub enum ChartError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} does not contain any worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot read the cell at row {row}, column {col}: {content}"))]
    ExcelWrongCellType { row: u32, col: u32, content: String },

    #[snafu(display("Error while building the sheet {sheet}"))]
    BuildingSheet {
        source: rust_xlsxwriter::XlsxError,
        sheet: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingExcel {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
}

pub type ChartResult<T> = Result<T, ChartError>;

/// Reads the responses in `input`, and writes to `output` a workbook with the
/// input sheets, a sheet with the distributions and one chart sheet per question.
///
/// Returns the distributions that were computed.
pub fn make_charts(input: &str, output: &str) -> ChartResult<Vec<QuestionDistribution>> {
    info!("make_charts: reading responses from {:?}", input);
    let sheets = read_workbook(input)?;
    let responses = first_sheet(&sheets, input)?;
    let columns = extract_columns(responses);
    debug!("make_charts: {} columns", columns.len());
    if columns.is_empty() {
        warn!(
            "make_charts: no question found in the worksheet {:?}",
            responses.name
        );
    }

    let distributions = compute_distributions(&columns);
    let dist_sheet = layout_distributions(&distributions);

    let mut workbook = Workbook::new();
    for sheet in sheets.iter() {
        copy_sheet(&mut workbook, sheet)?;
    }
    write_distribution_sheet(&mut workbook, &dist_sheet)?;
    draw_charts(&mut workbook, &dist_sheet.blocks)?;

    info!(
        "make_charts: writing {} charts to {:?}",
        dist_sheet.blocks.len(),
        output
    );
    workbook
        .save(output)
        .context(WritingExcelSnafu { path: output })?;
    Ok(distributions)
}

/// Runs the whole conversion described by the command line.
pub fn run(args: &Args) -> ChartResult<()> {
    make_charts(&args.input, &args.output)?;
    Ok(())
}

/// Prints the error and its backtrace, if any.
pub fn report_error(e: &ChartError) {
    warn!("Error occurred {:?}", e);
    eprintln!("An error occurred: {}", e);
    if let Some(bt) = ErrorCompat::backtrace(e) {
        eprintln!("trace: {}", bt);
    }
}
