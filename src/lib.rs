pub mod analyzer;
pub mod args;
pub mod error;
pub mod parser;
pub mod report;
pub mod stats;
pub mod utils;

pub use analyzer::{get_stats, LogAnalyzer};
pub use args::Args;
pub use error::LogStatsError;
pub use parser::{LineParser, LogRecord, ParseOutcome};
pub use stats::{CountStats, DateRange, FileStats, Percentage, RefererStats, StatsReport};
