use clap::Parser;

/// Draws one radar chart per lead from the answers to a 360 questionnaire.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path) The survey export, in Excel (.xlsx) or CSV (.csv) format. The first row is
    /// ignored, the second row contains the names of the columns.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (file path, optional) A JSON configuration file. See the manual for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, default 'charts') Where the charts and the index page are written. Setting this
    /// option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the scores will be written in JSON format to the given
    /// location.
    #[clap(short, long, value_parser)]
    pub summary: Option<String>,

    /// (file path) A reference file containing the scores in JSON format. If provided, leadradar will
    /// check that the computed scores match the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (default: the first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 'Your lead name:') The name of the column that contains the lead of each response.
    #[clap(long, value_parser)]
    pub group_column: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
