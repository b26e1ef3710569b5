use serde_json::Value;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

use crate::limits::Limits;
use crate::record::VisitRecord;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error("Too many visits: {count} (max: {max})")]
    TooManyRecords { count: usize, max: usize },
}

/// A line that was dropped from the batch, with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedBatch {
    pub visits: Vec<VisitRecord>,
    pub rejected: Vec<Rejection>,
}

/// Split a JSONL block into validated visit records.
///
/// The whole batch is refused when it holds more non-blank lines than
/// `limits.max_records`. Otherwise lines that fail to decode or validate are
/// skipped and reported individually; accepted records keep input order.
pub fn parse_and_validate_visits(
    content: &str,
    limits: &Limits,
) -> Result<ParsedBatch, BatchError> {
    let start_time = Instant::now();

    let lines: Vec<(usize, &str)> = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    if lines.len() > limits.max_records {
        return Err(BatchError::TooManyRecords {
            count: lines.len(),
            max: limits.max_records,
        });
    }

    let mut batch = ParsedBatch::default();

    for (line_number, line) in lines {
        let outcome = serde_json::from_str::<Value>(line)
            .map_err(|e| format!("Invalid JSON: {}", e))
            .and_then(|value| {
                VisitRecord::from_value(&value, limits).map_err(|e| e.to_string())
            });

        match outcome {
            Ok(visit) => batch.visits.push(visit),
            Err(reason) => {
                error!(
                    action = "reject",
                    component = "batch_parser",
                    line_number,
                    reason = %reason,
                    "Line {}: {}",
                    line_number,
                    reason
                );
                batch.rejected.push(Rejection {
                    line: line_number,
                    reason,
                });
            }
        }
    }

    info!(
        action = "complete",
        component = "batch_parser",
        accepted = batch.visits.len(),
        rejected = batch.rejected.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Batch parsed"
    );

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GOOD: &str = r#"{"path":"/docs","ref":"direct","device":"mobile","ts":"2024-01-01T00:00:00Z","date":"2024-01-01"}"#;

    fn limits(max_records: usize) -> Limits {
        Limits {
            max_records,
            ..Limits::default()
        }
    }

    #[test]
    fn keeps_valid_lines_in_order() {
        let second = GOOD.replace("/docs", "/blog");
        let content = format!("{GOOD}\n\n{second}\n");
        let batch = parse_and_validate_visits(&content, &limits(100)).unwrap();

        let paths: Vec<&str> = batch.visits.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["/docs", "/blog"]);
        assert!(batch.rejected.is_empty());
    }

    #[test]
    fn bad_lines_are_skipped_not_fatal() {
        let content = format!(
            "{GOOD}\nnot json\n{}\n{GOOD}",
            GOOD.replace("mobile", "smarttv")
        );
        let batch = parse_and_validate_visits(&content, &limits(100)).unwrap();

        assert_eq!(batch.visits.len(), 2);
        assert_eq!(batch.rejected.len(), 2);
        assert_eq!(batch.rejected[0].line, 2);
        assert!(batch.rejected[0].reason.starts_with("Invalid JSON: "));
        assert_eq!(
            batch.rejected[1],
            Rejection {
                line: 3,
                reason: "Invalid device: smarttv".into()
            }
        );
    }

    #[test]
    fn line_numbers_count_blank_lines() {
        let content = format!("\n\n{GOOD}\n\n[1,2]");
        let batch = parse_and_validate_visits(&content, &limits(100)).unwrap();
        assert_eq!(batch.rejected[0].line, 5);
    }

    #[test]
    fn too_many_records_fails_closed() {
        let content = vec![GOOD; 101].join("\n");
        assert_eq!(
            parse_and_validate_visits(&content, &limits(100)),
            Err(BatchError::TooManyRecords {
                count: 101,
                max: 100
            })
        );

        let content = vec![GOOD; 100].join("\n");
        let batch = parse_and_validate_visits(&content, &limits(100)).unwrap();
        assert_eq!(batch.visits.len(), 100);
    }

    #[test]
    fn blank_lines_do_not_count_against_ceiling() {
        let content = format!("{GOOD}\n\n\n\n{GOOD}");
        let batch = parse_and_validate_visits(&content, &limits(2)).unwrap();
        assert_eq!(batch.visits.len(), 2);
    }

    #[test]
    fn empty_content_yields_nothing() {
        assert_eq!(
            parse_and_validate_visits("", &limits(100)).unwrap(),
            ParsedBatch::default()
        );
    }
}
