use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Explore real-estate price spreadsheets by area and year",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the price-like and demand-like columns detected in a dataset
    Columns(ColumnsArgs),
    /// Rank the most frequent locality names in a dataset
    Areas(AreasArgs),
    /// Summarize prices and demand for an area by year
    Query(QueryArgs),
    /// Write the records matching an area as CSV
    Export(ExportArgs),
    /// Print parsing diagnostics for a dataset as JSON
    Inspect(InspectArgs),
    /// Run an interactive session that keeps one dataset resident
    Session(SessionArgs),
    /// Print the active inference heuristics as YAML
    Heuristics(HeuristicsArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SourceArgs {
    /// Spreadsheet (xlsx, xls, ods) or CSV/TSV file to analyze
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,
    /// Sample dataset used when no input is given
    #[arg(long, env = "ESTATE_INSIGHT_SAMPLE")]
    pub sample: Option<PathBuf>,
    /// Never fall back to the sample dataset
    #[arg(long = "no-sample")]
    pub no_sample: bool,
    /// Treat the input as delimited text with this delimiter (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of delimited input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// YAML file overriding the inference token tables
    #[arg(long)]
    pub heuristics: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct AreasArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Maximum number of areas to list
    #[arg(long, default_value_t = 100)]
    pub max: usize,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Free-text query such as "analyze Baner"
    #[arg(short = 'q', long = "query")]
    pub query: Option<String>,
    /// Area to filter by, bypassing query text extraction
    #[arg(long)]
    pub area: Option<String>,
    /// Price column to aggregate (defaults to the first detected)
    #[arg(long = "price-col")]
    pub price_col: Option<String>,
    /// Demand column to aggregate (defaults to the first detected)
    #[arg(long = "demand-col")]
    pub demand_col: Option<String>,
    /// Maximum matching records to include in the output
    #[arg(long, default_value_t = 500)]
    pub rows: usize,
    /// Emit JSON instead of text tables
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Area to filter by (all records when omitted)
    #[arg(long)]
    pub area: Option<String>,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Number of preview records to include
    #[arg(long, default_value_t = 3)]
    pub preview: usize,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

#[derive(Debug, Args)]
pub struct HeuristicsArgs {
    /// YAML file to start from (defaults to the built-in tables)
    #[arg(long)]
    pub heuristics: Option<PathBuf>,
    /// Destination file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
