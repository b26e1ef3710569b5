use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static JSONL_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```jsonl\s*\n(.*?)\n```").expect("block pattern compiles"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Input too large: {size} bytes (max: {max})")]
    InputTooLarge { size: usize, max: usize },
    #[error("No JSONL code block found")]
    NoBlock,
}

/// Pull the body of the first ```` ```jsonl ```` fenced block out of free text.
///
/// Input over `max_bytes` is refused before any scanning happens.
pub fn extract_jsonl_block(body: &str, max_bytes: usize) -> Result<&str, ExtractError> {
    if body.len() > max_bytes {
        return Err(ExtractError::InputTooLarge {
            size: body.len(),
            max: max_bytes,
        });
    }

    JSONL_BLOCK
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|block| block.as_str().trim())
        .ok_or(ExtractError::NoBlock)
}
