use chrono::{DateTime, FixedOffset};
use regex::Regex;
use serde::Serialize;

/// Combined Log Format, one request per line. Thirteen groups, in field order.
///
/// Digit and whitespace classes are ASCII-only: `١٢:٣٤:٥٦` is not a time.
pub const LINE_PATTERN: &str = concat!(
    r#"^([[:^space:]]+) ([[:^space:]]+) ([[:^space:]]+) "#,
    r#"\[([^:]+):([[:digit:]]+:[[:digit:]]+:[[:digit:]]+) ([^\]]+)\] "#,
    r#""([[:^space:]]+) (.*?) ([[:^space:]]+)" "#,
    r#"([[:^space:]]+) ([[:^space:]]+) (".*?") (".*?")$"#,
);

const TIMESTAMP_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One access-log line split into its raw tokens.
///
/// `referer` and `agent` keep their surrounding double quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub host: String,
    pub identity: String,
    pub user: String,
    pub date: String,
    pub time: String,
    pub timezone: String,
    pub method: String,
    pub path: String,
    pub protocol: String,
    pub status: String,
    pub size: String,
    pub referer: String,
    pub agent: String,
}

impl LogRecord {
    /// Only the first character of the status is looked at: `2xx` counts as success.
    pub fn is_success(&self) -> bool {
        self.status.starts_with('2')
    }

    /// Interprets the raw date, time and timezone tokens, e.g. `10/Oct/2000:13:55:36 -0700`.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let raw = format!("{}:{} {}", self.date, self.time, self.timezone);
        DateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Valid(Box<LogRecord>),
    Malformed,
}

/// Turns raw lines into [`LogRecord`]s using [`LINE_PATTERN`].
#[derive(Debug, Clone)]
pub struct LineParser {
    pattern: Regex,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(LINE_PATTERN).expect("LINE_PATTERN is a valid regex"),
        }
    }

    pub fn parse(&self, raw_line: &str) -> ParseOutcome {
        let line = raw_line.trim_end_matches(['\n', '\r']);

        let Some(caps) = self.pattern.captures(line) else {
            return ParseOutcome::Malformed;
        };

        // Every group is mandatory, so a match always carries all thirteen.
        let field = |i: usize| caps.get(i).map_or_else(String::new, |m| m.as_str().to_string());

        ParseOutcome::Valid(Box::new(LogRecord {
            host: field(1),
            identity: field(2),
            user: field(3),
            date: field(4),
            time: field(5),
            timezone: field(6),
            method: field(7),
            path: field(8),
            protocol: field(9),
            status: field(10),
            size: field(11),
            referer: field(12),
            agent: field(13),
        }))
    }
}
