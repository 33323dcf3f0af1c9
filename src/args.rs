use clap::Parser;

/// Computes the distribution of the answers to each question of a survey and draws a chart for
/// each of them.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, default responses.xlsx) The Excel workbook containing the responses. The first
    /// row holds the questions, every other row is one respondent.
    #[clap(value_parser, default_value = "responses.xlsx")]
    pub input: String,

    /// (file path, default analytics.xlsx) Where to write the workbook with the distributions and
    /// the charts.
    #[clap(value_parser, default_value = "analytics.xlsx")]
    pub output: String,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
