use time::macros::format_description;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use crate::args::{Args, Command};

/// Logs always go to stderr; stdout is reserved for emitted records and reports.
pub fn setup_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "error" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let timer = UtcTime::new(format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(timer)
        .with_writer(std::io::stderr)
        .init();
}

pub fn format_number(num: u64) -> String {
    let digits = num.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

pub fn validate_args(args: &Args) -> anyhow::Result<()> {
    if args.max_input_bytes == 0 {
        anyhow::bail!("--max-input-bytes must be greater than 0");
    }

    if args.max_path_length == 0 {
        anyhow::bail!("--max-path-length must be greater than 0");
    }

    if args.max_referrer_length == 0 {
        anyhow::bail!("--max-referrer-length must be greater than 0");
    }

    if args.max_timestamp_length == 0 {
        anyhow::bail!("--max-timestamp-length must be greater than 0");
    }

    let max_records = match &args.command {
        Command::Validate { max_records, .. } | Command::Process { max_records, .. } => {
            *max_records
        }
    };
    if max_records == 0 {
        anyhow::bail!("--max-records must be greater than 0");
    }

    if let Command::Process { archive_name, .. } = &args.command {
        if archive_name.is_empty() || archive_name.contains(['/', '\\']) {
            anyhow::bail!("--archive-name must be a plain, non-empty file name");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn formats_thousands() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_000), "1,000");
        assert_eq!(format_number(1_234_567), "1,234,567");
    }

    #[test]
    fn capitalizes_like_a_title() {
        assert_eq!(capitalize("desktop"), "Desktop");
        assert_eq!(capitalize("MOBILE"), "Mobile");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn rejects_zero_limits() {
        let args = Args::parse_from(["visitlog", "validate", "--max-records", "0"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["visitlog", "--max-path-length", "0", "validate"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["visitlog", "process", "--archive-name", "../x"]);
        assert!(validate_args(&args).is_err());

        let args = Args::parse_from(["visitlog", "process"]);
        assert!(validate_args(&args).is_ok());
    }
}
