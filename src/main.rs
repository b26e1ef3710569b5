use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::error;

use visitlog::pipeline::{run_process, run_validate, ProcessOptions};
use visitlog::utils::{format_number, setup_logging, validate_args};
use visitlog::{Args, Command, Limits};

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn run(args: &Args) -> Result<()> {
    match &args.command {
        Command::Validate { input, max_records } => {
            let limits = Limits::from_args(args, *max_records);
            let body = read_input(input.as_deref())?;

            let stdout = io::stdout();
            let accepted = run_validate(&body, &limits, &mut stdout.lock())?;
            eprintln!("Validated {} visits", accepted);
        }
        Command::Process {
            input,
            issue,
            max_records,
            report,
            stats,
            archive_dir,
            archive_name,
            site,
        } => {
            let options = ProcessOptions {
                limits: Limits::from_args(args, *max_records),
                issue: *issue,
                report: report.clone(),
                stats: stats.clone(),
                archive_dir: archive_dir.clone(),
                archive_name: archive_name.clone(),
                site: site.clone(),
            };
            let content = read_input(input.as_deref())?;

            let Some(summary) = run_process(&content, &options, Utc::now())? else {
                println!("No visits to process");
                return Ok(());
            };

            println!("Report saved to {}", summary.report_path.display());
            println!("Statistics saved to {}", summary.stats_path.display());
            if let Some(archive) = &summary.archive_path {
                println!("Data archived to {}", archive.display());
            }
            println!("\nProcessing complete");
            println!("  Total visits: {}", format_number(summary.total_visits));
            if summary.rejected > 0 {
                println!("  Rejected lines: {}", format_number(summary.rejected as u64));
            }
            println!(
                "  Date range: {} to {}",
                summary.date_range.start.as_deref().unwrap_or("No data available"),
                summary.date_range.end.as_deref().unwrap_or("No data available")
            );
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    validate_args(&args)?;

    if let Err(e) = run(&args) {
        error!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
