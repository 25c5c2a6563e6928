use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "logstats",
    about = "Summarize an access log in Combined Log Format: status breakdown, visited paths and referers",
    version,
    long_about = None
)]
pub struct Args {
    /// Access log file to analyze
    pub log_file: PathBuf,

    /// Number of files and referers to display
    #[arg(short, long)]
    pub top: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
