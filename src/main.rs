use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use logstats::{report, utils, Args, LogAnalyzer};

fn run(args: &Args) -> Result<()> {
    let mut analyzer = LogAnalyzer::new();
    let stats = analyzer
        .get_stats(&args.log_file)
        .with_context(|| format!("Failed to analyze {}", args.log_file.display()))?;

    match stats {
        Some(stats) if args.json => report::print_json(&stats)?,
        Some(stats) => report::print_report(&stats, args, analyzer.bad_lines()),
        None => println!("Log file was empty or contained no valid lines."),
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    utils::setup_logging(args.verbose);
    utils::validate_args(&args)?;

    if let Err(e) = run(&args) {
        error!(action = "fail", component = "main", error = %e, "Analysis failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
