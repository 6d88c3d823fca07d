use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::LevelFilter;
use qa_logging::{LogDestination, DEFAULT_LOG_FILE};

#[derive(Debug, Parser)]
#[command(
    name = "battery-qa",
    version,
    about = "Collect battery-domain text and turn it into question/answer datasets"
)]
pub struct Cli {
    /// RON file overriding the built-in pipeline configuration
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to a file (`--log-file=FILE`; bare flag uses battery_qa.log)
    #[arg(
        long,
        value_name = "FILE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = DEFAULT_LOG_FILE
    )]
    pub log_file: Option<PathBuf>,

    /// Log only to the log file, not the terminal
    #[arg(short, long, requires = "log_file")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Crawl the paginated article listing into title/body QA pairs
    Articles,
    /// Scrape the materials data table into CSV
    Table,
    /// Search arXiv, download PDFs and build segmented QA pairs
    Papers,
    /// Format saved QA pairs as a JSON Lines training corpus
    ExportTraining,
    /// Run the three pipelines, then export the training corpus
    All,
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match (&self.log_file, self.quiet) {
            (Some(path), true) => LogDestination::File(path.clone()),
            (Some(path), false) => LogDestination::Both(path.clone()),
            (None, _) => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
