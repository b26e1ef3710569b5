use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

use crate::batch::parse_and_validate_visits;
use crate::extract::extract_jsonl_block;
use crate::limits::Limits;
use crate::output::{archive_data, save_report, save_stats};
use crate::report::render_report;
use crate::stats::{aggregate_visits, DateRange};

/// Validate the JSONL block of an issue body and write accepted records to
/// `out`, one compact JSON object per line.
///
/// Nothing is written unless at least one record is accepted. Returns the
/// number of records written.
pub fn run_validate<W: Write>(body: &str, limits: &Limits, out: &mut W) -> Result<usize> {
    let start_time = Instant::now();
    info!(action = "start", component = "validate", input_bytes = body.len(), "Validating visit data");

    let block = extract_jsonl_block(body, limits.max_input_bytes)
        .context("No valid JSONL content found")?;
    if block.is_empty() {
        anyhow::bail!("No valid JSONL content found");
    }

    let batch = parse_and_validate_visits(block, limits).context("Visit batch rejected")?;
    if batch.visits.is_empty() {
        anyhow::bail!("No valid visits found");
    }

    let mut lines = String::new();
    for visit in &batch.visits {
        lines.push_str(&visit.to_json_line()?);
        lines.push('\n');
    }
    out.write_all(lines.as_bytes())
        .context("Failed to write validated visits")?;
    out.flush()?;

    info!(
        action = "complete",
        component = "validate",
        accepted = batch.visits.len(),
        rejected = batch.rejected.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Validation completed"
    );

    Ok(batch.visits.len())
}

#[derive(Debug, Clone)]
pub struct ProcessOptions {
    pub limits: Limits,
    /// Input is an issue body rather than bare JSONL.
    pub issue: bool,
    pub report: PathBuf,
    pub stats: PathBuf,
    pub archive_dir: Option<PathBuf>,
    pub archive_name: String,
    pub site: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSummary {
    pub total_visits: u64,
    pub rejected: usize,
    pub date_range: DateRange,
    pub report_path: PathBuf,
    pub stats_path: PathBuf,
    pub archive_path: Option<PathBuf>,
}

/// Aggregate a batch of visits and write the report, the stats snapshot and
/// optionally an archive copy of the input.
///
/// Returns `None` without touching the filesystem when no valid visit remains.
pub fn run_process(
    input: &str,
    options: &ProcessOptions,
    now: DateTime<Utc>,
) -> Result<Option<ProcessSummary>> {
    let start_time = Instant::now();
    info!(action = "start", component = "process", input_bytes = input.len(), "Processing visits");

    let content = if options.issue {
        extract_jsonl_block(input, options.limits.max_input_bytes)
            .context("No valid JSONL content found")?
    } else {
        input
    };

    let batch =
        parse_and_validate_visits(content, &options.limits).context("Visit batch rejected")?;
    if batch.visits.is_empty() {
        info!(action = "skip", component = "process", "No visits to process");
        return Ok(None);
    }

    let stats = aggregate_visits(&batch.visits);

    let report = render_report(&stats, options.site.as_deref(), now)
        .context("Failed to render report")?;
    save_report(&options.report, &report)?;
    save_stats(&options.stats, &stats, now)?;

    let archive_path = match &options.archive_dir {
        Some(dir) => Some(archive_data(dir, &options.archive_name, content, now)?),
        None => None,
    };

    info!(
        action = "complete",
        component = "process",
        total_visits = stats.total_visits,
        rejected = batch.rejected.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Processing completed"
    );

    Ok(Some(ProcessSummary {
        total_visits: stats.total_visits,
        rejected: batch.rejected.len(),
        date_range: stats.date_range,
        report_path: options.report.clone(),
        stats_path: options.stats.clone(),
        archive_path,
    }))
}
