//! Tempora command line
//!
//! Commands:
//! - now [pattern]: the current time
//! - show <timestamp> [pattern]: a 10-digit (seconds) or 13-digit (ms) timestamp
//! - diff <timestamp> <timestamp>: elapsed time from the second to the first
//! - add <timestamp> <duration>: add a D.HH:MM:SS.mmm duration
//! - parse <text> <pattern>: read an instant from text
//!
//! Each command prints one JSON object on stdout. The default offset and
//! pattern come from TEMPORA_UTC_OFFSET and TEMPORA_PATTERN, logging is
//! controlled by RUST_LOG.

use serde::Serialize;
use serde_json::{json, Value as JsonValue};
use std::env;
use std::io::{self, Write};
use std::process::ExitCode;
use tempora::{Config, Duration, Error, Instant, Pattern};
use tracing::Level;

const USAGE: &str = "usage: tempora <now [pattern] | show <timestamp> [pattern] | \
diff <timestamp> <timestamp> | add <timestamp> <duration> | parse <text> <pattern>>";

#[derive(Debug, Serialize)]
struct CliError {
    code: &'static str,
    message: String,
}

impl CliError {
    fn usage(message: impl Into<String>) -> Self {
        Self { code: "USAGE", message: message.into() }
    }
}

impl From<Error> for CliError {
    fn from(err: Error) -> Self {
        let code = match err {
            Error::Range(_) => "RANGE",
            Error::AmbiguousTimestamp { .. } => "TIMESTAMP",
            Error::Pattern { .. } => "PATTERN",
            Error::Parse { .. } => "PARSE",
            Error::Offset(_) => "OFFSET",
            Error::Duration(_) => "DURATION",
        };
        Self { code, message: err.to_string() }
    }
}

/// RUST_LOG names a level (`error` .. `trace`); unset or unknown means info
fn log_level() -> Level {
    env::var("RUST_LOG")
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(Level::INFO)
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_max_level(log_level())
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = Config::from_env();
    tracing::debug!(offset = %config.offset, pattern = %config.pattern, "tempora started");

    let result = match args.first().map(String::as_str) {
        Some(command) => handle_command(command, &args[1..]),
        None => Err(CliError::usage(USAGE)),
    };

    match result {
        Ok(value) => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = writeln!(stdout, "{}", value) {
                tracing::error!(error = %e, "failed to write output");
                return ExitCode::FAILURE;
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::debug!(code = err.code, "command failed");
            eprintln!("{}", json!({ "error": err }));
            ExitCode::FAILURE
        }
    }
}

fn handle_command(command: &str, args: &[String]) -> Result<JsonValue, CliError> {
    match (command, args) {
        ("now", []) => Ok(describe(&Instant::now())),
        ("now", [pattern]) => Ok(describe(&Instant::now().with_pattern(pattern.parse()?))),
        ("show", [timestamp]) => Ok(describe(&timestamp_arg(timestamp)?)),
        ("show", [timestamp, pattern]) => {
            let pattern: Pattern = pattern.parse()?;
            Ok(describe(&timestamp_arg(timestamp)?.with_pattern(pattern)))
        }
        ("diff", [later, earlier]) => {
            let later = timestamp_arg(later)?;
            let earlier = timestamp_arg(earlier)?;
            Ok(describe_duration(&later.since(&earlier)))
        }
        ("add", [timestamp, duration]) => {
            let start = timestamp_arg(timestamp)?;
            let duration: Duration = duration.parse()?;
            Ok(describe(&start.add(&duration)))
        }
        ("parse", [text, pattern]) => Ok(describe(&Instant::parse(text, pattern)?)),
        ("now" | "show" | "diff" | "add" | "parse", _) => {
            Err(CliError::usage(format!("wrong number of arguments for '{}'\n{}", command, USAGE)))
        }
        _ => Err(CliError::usage(format!("unknown command '{}'\n{}", command, USAGE))),
    }
}

fn timestamp_arg(arg: &str) -> Result<Instant, CliError> {
    let value: i64 = arg
        .trim()
        .parse()
        .map_err(|_| CliError::usage(format!("'{}' is not an integer timestamp", arg)))?;
    Ok(Instant::from_timestamp(value)?)
}

fn describe(instant: &Instant) -> JsonValue {
    json!({
        "text": instant.to_text(),
        "millis": instant.timestamp(),
        "unix": instant.unix_seconds(),
        "offset": instant.offset().to_string(),
        "pattern": instant.pattern().as_str(),
        "leap_year": instant.is_leap_year(),
    })
}

fn describe_duration(duration: &Duration) -> JsonValue {
    json!({
        "text": duration.to_string(),
        "fields": duration,
        "total_seconds": duration.total_seconds(),
        "total_milliseconds": duration.total_milliseconds(),
        "total_hours": duration.total_hours(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_show_timestamp() {
        let out = handle_command("show", &args(&["1700000000000", "yyyy'T'HH"])).unwrap();
        assert_eq!(out["millis"], 1_700_000_000_000i64);
        assert_eq!(out["unix"], 1_700_000_000i64);
        assert_eq!(out["pattern"], "yyyy'T'HH");
    }

    #[test]
    fn test_diff() {
        let out = handle_command("diff", &args(&["1700090061", "1700000000"])).unwrap();
        assert_eq!(out["text"], "1.01:01:01.000");
        assert_eq!(out["total_seconds"], 90_061);
        assert_eq!(out["fields"]["days"], 1);
    }

    #[test]
    fn test_add() {
        let out = handle_command("add", &args(&["1700000000000", "1.00:00:00.001"])).unwrap();
        assert_eq!(out["millis"], 1_700_086_400_001i64);
    }

    #[test]
    fn test_errors() {
        let err = handle_command("show", &args(&["12345"])).unwrap_err();
        assert_eq!(err.code, "TIMESTAMP");
        let err = handle_command("show", &args(&["soon"])).unwrap_err();
        assert_eq!(err.code, "USAGE");
        let err = handle_command("add", &args(&["1700000000"])).unwrap_err();
        assert_eq!(err.code, "USAGE");
        let err = handle_command("tomorrow", &[]).unwrap_err();
        assert_eq!(err.code, "USAGE");
        let err = handle_command("now", &args(&["QQ"])).unwrap_err();
        assert_eq!(err.code, "PATTERN");
    }
}
