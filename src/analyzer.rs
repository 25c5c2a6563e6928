use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::error::{LogStatsError, Result};
use crate::parser::{LineParser, ParseOutcome};
use crate::stats::{StatsAccumulator, StatsReport};

/// Reads an access log and aggregates it into a [`StatsReport`].
///
/// Apart from the running count of malformed lines, no state carries over
/// between calls to [`LogAnalyzer::get_stats`].
#[derive(Debug, Default)]
pub struct LogAnalyzer {
    parser: LineParser,
    bad_lines: u64,
}

impl LogAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines rejected by the parser across every call on this instance.
    pub fn bad_lines(&self) -> u64 {
        self.bad_lines
    }

    /// Returns `Ok(None)` when the file holds no valid lines.
    pub fn get_stats(&mut self, filename: impl AsRef<Path>) -> Result<Option<StatsReport>> {
        let path = filename.as_ref();
        let start_time = Instant::now();
        info!(action = "start", component = "log_analysis", file_path = ?path, "Starting access log analysis");

        let file = open_log(path).map_err(|source| LogStatsError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;

        let (acc, lines_read, malformed) = self.read_log(BufReader::new(file), path)?;

        let report = acc.finish();
        let duration_ms = start_time.elapsed().as_millis();

        match &report {
            Some(report) => info!(
                action = "complete",
                component = "log_analysis",
                lines_read,
                valid_lines = report.count.total_count,
                bad_lines = malformed,
                unique_files = report.files.len(),
                unique_referers = report.referers.len(),
                duration_ms,
                "Access log analysis completed"
            ),
            None => warn!(
                action = "complete",
                component = "log_analysis",
                file_path = ?path,
                lines_read,
                bad_lines = malformed,
                duration_ms,
                "Log file was empty or contained no valid lines"
            ),
        }

        Ok(report)
    }

    /// Malformed lines are added to [`LogAnalyzer::bad_lines`] as they are seen, so
    /// a read failure part-way through still leaves them counted.
    fn read_log<R: BufRead>(
        &mut self,
        mut reader: R,
        path: &Path,
    ) -> Result<(StatsAccumulator, u64, u64)> {
        let mut acc = StatsAccumulator::new();
        let mut buf = Vec::new();
        let mut lines_read = 0u64;
        let mut malformed = 0u64;

        loop {
            buf.clear();
            let n = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| LogStatsError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            lines_read += 1;

            // Invalid UTF-8 makes the whole line malformed; it is never decoded lossily.
            let outcome = match std::str::from_utf8(&buf) {
                Ok(line) => self.parser.parse(line),
                Err(_) => ParseOutcome::Malformed,
            };

            match outcome {
                ParseOutcome::Valid(record) => acc.push(&record),
                ParseOutcome::Malformed => {
                    malformed += 1;
                    self.bad_lines += 1;
                    debug!(action = "parse", component = "line_parser", line_number = lines_read, "Skipping malformed line");
                }
            }
        }

        Ok((acc, lines_read, malformed))
    }
}

fn open_log(path: &Path) -> io::Result<File> {
    let file = File::open(path)?;
    // Opening a directory succeeds on unix; reading it does not.
    if file.metadata()?.is_dir() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "path is a directory"));
    }
    Ok(file)
}

/// Convenience wrapper for a one-off analysis with a fresh [`LogAnalyzer`].
pub fn get_stats(filename: impl AsRef<Path>) -> Result<Option<StatsReport>> {
    LogAnalyzer::new().get_stats(filename)
}
