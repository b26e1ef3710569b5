use crate::args::Args;

pub const MAX_ISSUE_SIZE: usize = 1_000_000;
pub const MAX_VISITS_PER_ISSUE: usize = 100;
pub const MAX_VISITS_PER_ARCHIVE: usize = 1_000_000;
pub const MAX_PATH_LENGTH: usize = 500;
pub const MAX_REFERRER_LENGTH: usize = 200;
pub const MAX_TIMESTAMP_LENGTH: usize = 30;

/// Size and count ceilings applied while extracting and validating visit data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_input_bytes: usize,
    pub max_records: usize,
    pub max_path_length: usize,
    pub max_referrer_length: usize,
    pub max_timestamp_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_bytes: MAX_ISSUE_SIZE,
            max_records: MAX_VISITS_PER_ISSUE,
            max_path_length: MAX_PATH_LENGTH,
            max_referrer_length: MAX_REFERRER_LENGTH,
            max_timestamp_length: MAX_TIMESTAMP_LENGTH,
        }
    }
}

impl Limits {
    pub fn from_args(args: &Args, max_records: usize) -> Self {
        Self {
            max_input_bytes: args.max_input_bytes,
            max_records,
            max_path_length: args.max_path_length,
            max_referrer_length: args.max_referrer_length,
            max_timestamp_length: args.max_timestamp_length,
        }
    }
}
