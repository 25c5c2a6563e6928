//! End-to-end tests for `get_stats` against log files on disk.

use logstats::{get_stats, LogAnalyzer, LogStatsError};
use std::io::Write;
use tempfile::NamedTempFile;

fn line(path: &str, status: &str, referer: &str) -> String {
    format!(
        r#"192.168.1.20 - - [28/Jul/2006:10:27:10 -0300] "GET {path} HTTP/1.1" {status} 3395 "{referer}" "Mozilla/5.0 (X11; Linux x86_64)""#
    )
}

fn write_log(lines: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for l in lines {
        writeln!(file, "{l}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_status_breakdown() {
    let log = write_log(&[
        line("/", "200", "-"),
        line("/missing", "404", "-"),
        line("/", "200", "-"),
    ]);

    let report = get_stats(log.path()).unwrap().unwrap();

    assert_eq!(report.count.total_count, 3);
    assert_eq!(report.count.success, 2);
    assert_eq!(report.count.error, 1);
    assert_eq!(report.count.success_pct.to_string(), "66.667");
    assert_eq!(report.count.error_pct.to_string(), "33.333");
}

#[test]
fn test_files_keep_first_seen_order() {
    let log = write_log(&[
        line("/a", "200", "http://one"),
        line("/b", "200", "http://two"),
        line("/a", "200", "http://one"),
    ]);

    let report = get_stats(log.path()).unwrap().unwrap();

    let files: Vec<_> = report
        .files
        .iter()
        .map(|f| (f.path.as_str(), f.visits, f.visited_pct.to_string()))
        .collect();
    assert_eq!(
        files,
        vec![
            ("/a", 2, "66.667".to_string()),
            ("/b", 1, "33.333".to_string())
        ]
    );

    let referers: Vec<_> = report
        .referers
        .iter()
        .map(|r| (r.referer.as_str(), r.requests))
        .collect();
    assert_eq!(referers, vec![("\"http://one\"", 2), ("\"http://two\"", 1)]);
}

#[test]
fn test_totals_are_consistent() {
    let statuses = ["200", "201", "301", "404", "500", "2", "-", "204"];
    let lines: Vec<_> = statuses
        .iter()
        .enumerate()
        .map(|(i, s)| line(&format!("/p{}", i % 3), s, &format!("r{}", i % 2)))
        .collect();
    let log = write_log(&lines);

    let report = get_stats(log.path()).unwrap().unwrap();
    let count = &report.count;

    assert_eq!(count.total_count, statuses.len() as u64);
    assert_eq!(count.success, 4);
    assert_eq!(count.success + count.error, count.total_count);
    assert_eq!(
        report.files.iter().map(|f| f.visits).sum::<u64>(),
        count.total_count
    );
    assert_eq!(
        report.referers.iter().map(|r| r.requests).sum::<u64>(),
        count.total_count
    );

    let pct_sum = count.success_pct.thousandths() + count.error_pct.thousandths();
    assert!((99_999..=100_001).contains(&pct_sum));

    for pct in report
        .files
        .iter()
        .map(|f| f.visited_pct)
        .chain(report.referers.iter().map(|r| r.request_pct))
    {
        let text = pct.to_string();
        let decimals = text.split('.').nth(1).unwrap();
        assert_eq!(decimals.len(), 3, "{text}");
    }
}

#[test]
fn test_malformed_lines_are_skipped_and_counted() {
    let log = write_log(&[
        line("/", "200", "-"),
        "this is not an access log line".to_string(),
        r#"10.0.0.1 - - [28/Jul/2006:10:27:10 -0300 "GET / HTTP/1.1" 200 1 "-" "x""#.to_string(),
        line("/", "500", "-"),
    ]);

    let mut analyzer = LogAnalyzer::new();
    let report = analyzer.get_stats(log.path()).unwrap().unwrap();

    assert_eq!(report.count.total_count, 2);
    assert_eq!(analyzer.bad_lines(), 2);
}

#[test]
fn test_empty_file_has_no_data() {
    let log = write_log(&[]);
    assert!(get_stats(log.path()).unwrap().is_none());
}

#[test]
fn test_only_malformed_lines_has_no_data() {
    let log = write_log(&["nope".to_string(), "".to_string()]);
    let mut analyzer = LogAnalyzer::new();

    assert!(analyzer.get_stats(log.path()).unwrap().is_none());
    assert_eq!(analyzer.bad_lines(), 2);
}

#[test]
fn test_missing_file_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let result = get_stats(dir.path().join("does-not-exist.log"));

    assert!(matches!(result, Err(LogStatsError::UnreadableFile { .. })));
}

#[test]
fn test_directory_is_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let result = get_stats(dir.path());

    assert!(matches!(result, Err(LogStatsError::UnreadableFile { .. })));
}

#[test]
fn test_crlf_and_missing_final_newline() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "{}\r\n{}",
        line("/a", "200", "-"),
        line("/b", "302", "-")
    )
    .unwrap();
    file.flush().unwrap();

    let report = get_stats(file.path()).unwrap().unwrap();
    assert_eq!(report.count.total_count, 2);
    assert_eq!(report.files[1].path, "/b");
}

#[test]
fn test_state_does_not_leak_between_calls() {
    let first = write_log(&[line("/a", "200", "-"), "junk".to_string()]);
    let second = write_log(&[line("/b", "404", "-")]);

    let mut analyzer = LogAnalyzer::new();
    analyzer.get_stats(first.path()).unwrap();
    let report = analyzer.get_stats(second.path()).unwrap().unwrap();

    assert_eq!(report.count.total_count, 1);
    assert_eq!(report.files.len(), 1);
    assert_eq!(report.files[0].path, "/b");
    // the malformed-line counter is the only thing kept per instance
    assert_eq!(analyzer.bad_lines(), 1);
}

#[test]
fn test_report_serializes_percentages_as_text() {
    let log = write_log(&[line("/a", "200", "-"), line("/b", "500", "-")]);
    let report = get_stats(log.path()).unwrap().unwrap();

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["count"]["success_pct"], "50.000");
    assert_eq!(json["files"][0]["path"], "/a");
    assert_eq!(json["files"][0]["visited_pct"], "50.000");
    assert_eq!(json["referers"][0]["referer"], "\"-\"");
    assert!(json["date_range"]["earliest"].is_string());
}

#[test]
fn test_invalid_utf8_paths_are_not_merged() {
    let mut file = NamedTempFile::new().unwrap();
    for byte in [0xE9u8, 0xE8] {
        file.write_all(br#"10.0.0.1 - - [28/Jul/2006:10:27:10 -0300] "GET /caf"#)
            .unwrap();
        file.write_all(&[byte]).unwrap();
        file.write_all(b" HTTP/1.1\" 200 1 \"-\" \"x\"\n").unwrap();
    }
    writeln!(file, "{}", line("/cafe", "200", "-")).unwrap();
    file.flush().unwrap();

    let mut analyzer = LogAnalyzer::new();
    let report = analyzer.get_stats(file.path()).unwrap().unwrap();

    assert_eq!(analyzer.bad_lines(), 2);
    let paths: Vec<_> = report.files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["/cafe"]);
}
