use anyhow::Result;

use crate::stats::StatsReport;
use crate::utils::format_number;
use crate::Args;

pub fn print_json(report: &StatsReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

pub fn print_report(report: &StatsReport, args: &Args, bad_lines: u64) {
    let count = &report.count;

    println!("\n--- {} ---", args.log_file.display());

    if let Some(range) = &report.date_range {
        println!(
            "Date range: {} to {}",
            range.earliest.format("%B %-d, %Y %H:%M:%S %z"),
            range.latest.format("%B %-d, %Y %H:%M:%S %z")
        );
    }

    println!("Total requests: {}", format_number(count.total_count));
    println!(
        "Successful (2xx): {} ({}%)",
        format_number(count.success),
        count.success_pct
    );
    println!(
        "Errors: {} ({}%)",
        format_number(count.error),
        count.error_pct
    );
    println!("Malformed lines skipped: {}", format_number(bad_lines));

    let limit = args.top.unwrap_or(usize::MAX);

    println!(
        "\nFiles ({} of {}):",
        std::cmp::min(limit, report.files.len()),
        report.files.len()
    );
    for file in report.files.iter().take(limit) {
        println!(
            "- {}: {} visits ({}%)",
            file.path,
            format_number(file.visits),
            file.visited_pct
        );
    }

    println!(
        "\nReferers ({} of {}):",
        std::cmp::min(limit, report.referers.len()),
        report.referers.len()
    );
    for referer in report.referers.iter().take(limit) {
        println!(
            "- {}: {} requests ({}%)",
            referer.referer,
            format_number(referer.requests),
            referer.request_pct
        );
    }
}
