use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::stats::{AggregateStats, StatsSnapshot};

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {:?}", parent))?;
    }
    Ok(())
}

pub fn save_report(path: &Path, report: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, report).with_context(|| format!("Failed to write report to {:?}", path))?;

    info!(action = "write", component = "report", path = ?path, bytes = report.len(), "Report saved");
    Ok(())
}

/// Overwrite the stats snapshot with `stats` stamped at `updated_at`.
pub fn save_stats(path: &Path, stats: &AggregateStats, updated_at: DateTime<Utc>) -> Result<()> {
    let snapshot = StatsSnapshot {
        stats,
        last_updated: updated_at.to_rfc3339(),
    };
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize stats")?;

    ensure_parent(path)?;
    fs::write(path, json).with_context(|| format!("Failed to write stats to {:?}", path))?;

    info!(action = "write", component = "stats", path = ?path, "Statistics saved");
    Ok(())
}

pub fn archive_data(
    dir: &Path,
    name: &str,
    content: &str,
    archived_at: DateTime<Utc>,
) -> Result<PathBuf> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create archive directory {:?}", dir))?;

    let archive_file = dir.join(format!(
        "{}_{}.jsonl",
        name,
        archived_at.format("%Y%m%d_%H%M%S")
    ));
    fs::write(&archive_file, content)
        .with_context(|| format!("Failed to archive data to {:?}", archive_file))?;

    info!(action = "write", component = "archive", path = ?archive_file, "Data archived");
    Ok(archive_file)
}
