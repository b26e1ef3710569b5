use chrono::{DateTime, Utc};
use std::fmt::Write;

use crate::stats::AggregateStats;
use crate::utils::{capitalize, format_number};

const REPORT_TOP_PAGES: usize = 15;
const REPORT_TOP_REFERRERS: usize = 10;
const REPORT_RECENT_DAYS: usize = 30;

/// Share of `total` as a percentage; zero when there is nothing to divide by.
pub fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Render the Markdown visit report.
pub fn render_report(
    stats: &AggregateStats,
    site: Option<&str>,
    generated_at: DateTime<Utc>,
) -> Result<String, std::fmt::Error> {
    let mut out = String::new();

    match site {
        Some(site) => writeln!(out, "# Website Visit Report - {}", site)?,
        None => writeln!(out, "# Website Visit Report")?,
    }
    writeln!(out)?;
    writeln!(
        out,
        "**Generated**: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    let start = stats.date_range.start.as_deref().unwrap_or("No data available");
    let end = stats.date_range.end.as_deref().unwrap_or("No data available");

    writeln!(out)?;
    writeln!(out, "## Summary")?;
    writeln!(out)?;
    writeln!(out, "- **Total Visits**: {}", format_number(stats.total_visits))?;
    writeln!(out, "- **Unique Days**: {}", stats.unique_dates)?;
    writeln!(out, "- **Date Range**: {} to {}", start, end)?;

    writeln!(out)?;
    writeln!(out, "## Top Pages")?;
    writeln!(out)?;
    writeln!(out, "| Page | Visits |")?;
    writeln!(out, "|------|-------:|")?;
    for (page, count) in stats.by_page.iter().take(REPORT_TOP_PAGES) {
        writeln!(out, "| `{}` | {} |", page, format_number(count))?;
    }

    writeln!(out)?;
    writeln!(out, "## Top Referrers")?;
    writeln!(out)?;
    writeln!(out, "| Referrer | Visits |")?;
    writeln!(out, "|----------|-------:|")?;
    for (referrer, count) in stats.by_referrer.iter().take(REPORT_TOP_REFERRERS) {
        writeln!(out, "| {} | {} |", referrer, format_number(count))?;
    }

    writeln!(out)?;
    writeln!(out, "## Device Distribution")?;
    writeln!(out)?;
    writeln!(out, "| Device | Visits | Percentage |")?;
    writeln!(out, "|--------|-------:|-----------:|")?;
    for (device, count) in stats.by_device.iter() {
        writeln!(
            out,
            "| {} | {} | {:.1}% |",
            capitalize(device),
            format_number(count),
            percentage(count, stats.total_visits)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "## Daily Visits (Last {} Days)", REPORT_RECENT_DAYS)?;
    writeln!(out)?;
    writeln!(out, "| Date | Visits |")?;
    writeln!(out, "|------|-------:|")?;
    let mut dates: Vec<(&str, u64)> = stats.by_date.iter().collect();
    dates.sort_by(|a, b| b.0.cmp(a.0));
    for (date, count) in dates.into_iter().take(REPORT_RECENT_DAYS) {
        writeln!(out, "| {} | {} |", date, format_number(count))?;
    }

    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(out, "*Data collected from {} visits*", site.unwrap_or("site"))?;

    Ok(out)
}
