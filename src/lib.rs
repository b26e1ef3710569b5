pub mod args;
pub mod batch;
pub mod extract;
pub mod fields;
pub mod limits;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod stats;
pub mod tally;
pub mod utils;

pub use args::{Args, Command};
pub use batch::{parse_and_validate_visits, BatchError, ParsedBatch, Rejection};
pub use extract::{extract_jsonl_block, ExtractError};
pub use limits::Limits;
pub use pipeline::{run_process, run_validate, ProcessOptions, ProcessSummary};
pub use record::{validate_visit_record, RecordError, VisitRecord};
pub use report::render_report;
pub use stats::{aggregate_visits, AggregateStats, DateRange};
pub use tally::Tally;
