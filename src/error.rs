use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by [`crate::LogAnalyzer::get_stats`].
///
/// Malformed lines are never reported here; they are only counted.
#[derive(Error, Debug)]
pub enum LogStatsError {
    /// The log file is missing, not readable, or could not be opened.
    #[error("Unable to read file {path:?}: {source}")]
    UnreadableFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was opened but reading it failed part-way through.
    #[error("Error while reading {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, LogStatsError>;
