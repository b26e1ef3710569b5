use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::limits::{
    MAX_ISSUE_SIZE, MAX_PATH_LENGTH, MAX_REFERRER_LENGTH, MAX_TIMESTAMP_LENGTH,
    MAX_VISITS_PER_ARCHIVE, MAX_VISITS_PER_ISSUE,
};

#[derive(Parser, Debug)]
#[command(
    name = "visitlog",
    about = "Validate submitted page-visit logs and aggregate them into reports",
    version,
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Maximum accepted input size in bytes
    #[arg(long, global = true, default_value_t = MAX_ISSUE_SIZE)]
    pub max_input_bytes: usize,

    /// Maximum length of a visit path
    #[arg(long, global = true, default_value_t = MAX_PATH_LENGTH)]
    pub max_path_length: usize,

    /// Maximum length of a referrer
    #[arg(long, global = true, default_value_t = MAX_REFERRER_LENGTH)]
    pub max_referrer_length: usize,

    /// Maximum length of a timestamp
    #[arg(long, global = true, default_value_t = MAX_TIMESTAMP_LENGTH)]
    pub max_timestamp_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract and validate the JSONL block of an issue body, emitting accepted records
    Validate {
        /// Read the issue body from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Maximum number of records in the block
        #[arg(long, default_value_t = MAX_VISITS_PER_ISSUE)]
        max_records: usize,
    },

    /// Aggregate JSONL visit data into a Markdown report and a JSON stats snapshot
    Process {
        /// Read visit data from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Treat the input as an issue body and extract its JSONL block first
        #[arg(long)]
        issue: bool,

        /// Maximum number of records accepted from the input
        #[arg(long, default_value_t = MAX_VISITS_PER_ARCHIVE)]
        max_records: usize,

        /// Report output path
        #[arg(long, default_value = "visit_report.md")]
        report: PathBuf,

        /// Stats snapshot output path
        #[arg(long, default_value = "visit_stats.json")]
        stats: PathBuf,

        /// Directory to archive the raw input into
        #[arg(long)]
        archive_dir: Option<PathBuf>,

        /// File name prefix for archived input
        #[arg(long, default_value = "visits")]
        archive_name: String,

        /// Site name shown in the report
        #[arg(long)]
        site: Option<String>,
    },
}
