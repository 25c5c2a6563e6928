use chrono::{DateTime, FixedOffset};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

use crate::parser::LogRecord;

/// A share of the total, held in thousandths of a percent.
///
/// Displays and serializes with exactly three decimals, e.g. `66.667`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Percentage(u64);

impl Percentage {
    /// `part * 100 / total`, rounded half-up to three decimals. A zero total yields `0.000`.
    pub fn of(part: u64, total: u64) -> Self {
        if total == 0 {
            return Self(0);
        }
        let (part, total) = (part as u128, total as u128);
        let doubled = part * 100_000 * 2 + total;
        Self((doubled / (2 * total)) as u64)
    }

    pub fn thousandths(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

impl Serialize for Percentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountStats {
    pub total_count: u64,
    pub success: u64,
    pub error: u64,
    pub success_pct: Percentage,
    pub error_pct: Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileStats {
    pub path: String,
    pub visits: u64,
    pub visited_pct: Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefererStats {
    pub referer: String,
    pub requests: u64,
    pub request_pct: Percentage,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub earliest: DateTime<FixedOffset>,
    pub latest: DateTime<FixedOffset>,
}

/// Aggregate traffic statistics for one log file.
///
/// `files` and `referers` are in the order each key was first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsReport {
    pub count: CountStats,
    pub files: Vec<FileStats>,
    pub referers: Vec<RefererStats>,
    pub date_range: Option<DateRange>,
}

/// Exact-match counter that remembers first-seen order.
#[derive(Debug, Default)]
struct OrderedCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
}

impl OrderedCounter {
    fn increment(&mut self, key: &str) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 += 1,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), 1));
            }
        }
    }
}

/// Running totals for a single pass over a log.
#[derive(Debug, Default)]
pub struct StatsAccumulator {
    success: u64,
    error: u64,
    files: OrderedCounter,
    referers: OrderedCounter,
    date_range: Option<DateRange>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.success + self.error
    }

    pub fn push(&mut self, record: &LogRecord) {
        if record.is_success() {
            self.success += 1;
        } else {
            self.error += 1;
        }

        self.files.increment(&record.path);
        self.referers.increment(&record.referer);

        if let Some(ts) = record.timestamp() {
            match &mut self.date_range {
                Some(range) => {
                    if ts < range.earliest {
                        range.earliest = ts;
                    }
                    if ts > range.latest {
                        range.latest = ts;
                    }
                }
                None => {
                    self.date_range = Some(DateRange {
                        earliest: ts,
                        latest: ts,
                    })
                }
            }
        }
    }

    /// Computes the percentages. Returns `None` when nothing was pushed.
    pub fn finish(self) -> Option<StatsReport> {
        let total = self.total();
        if total == 0 {
            return None;
        }

        let files = self
            .files
            .entries
            .into_iter()
            .map(|(path, visits)| FileStats {
                path,
                visits,
                visited_pct: Percentage::of(visits, total),
            })
            .collect();

        let referers = self
            .referers
            .entries
            .into_iter()
            .map(|(referer, requests)| RefererStats {
                referer,
                requests,
                request_pct: Percentage::of(requests, total),
            })
            .collect();

        Some(StatsReport {
            count: CountStats {
                total_count: total,
                success: self.success,
                error: self.error,
                success_pct: Percentage::of(self.success, total),
                error_pct: Percentage::of(self.error, total),
            },
            files,
            referers,
            date_range: self.date_range,
        })
    }
}
