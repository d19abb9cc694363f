use std::io::Write;

use chrono::{DateTime, Utc};
use env_logger::{Builder, Env};
use serde::Serialize;

// Re-exported so that `jlog!` callers do not need their own serde_json macro import.
#[doc(hidden)]
pub use serde_json::json as __json;

const DATETIME_FORMAT: &str = "[%Y-%m-%d][%H:%M:%S]";

#[derive(Serialize, Debug)]
struct LogEntry {
    level: String,
    #[serde(serialize_with = "format_datetime")]
    time: DateTime<Utc>,
    target: String,
    message: String,
    #[serde(flatten)]
    meta: Option<serde_json::Value>,
}

fn format_datetime<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&time.format(DATETIME_FORMAT).to_string())
}

/// Writes a single-line JSON log entry that a log shipper can ingest without
/// further parsing.
///
/// `jlog!(Info, "Server started")` produces
/// `{"level": "INFO", "target": "none", "message": "Server started"}`.
/// Metadata can be attached as inline JSON:
/// `jlog!(Warn, "Payment declined", {"registration_id": id})`,
/// and an explicit target can be given as the second argument.
#[macro_export]
macro_rules! jlog {
    ($level:path, $msg:expr) => {{
        $crate::emit($level, None, $msg, None)
    }};
    ($level:path, $msg:expr, $meta:tt) => {{
        $crate::emit($level, None, $msg, Some($crate::__json!($meta)))
    }};
    ($level:path, $target:expr, $msg:expr, $meta:tt) => {{
        $crate::emit($level, Some($target), $msg, Some($crate::__json!($meta)))
    }};
}

pub fn emit(level: log::Level, target: Option<&str>, message: &str, meta: Option<serde_json::Value>) {
    let entry = LogEntry {
        level: level.to_string(),
        time: Utc::now(),
        target: target.unwrap_or("none").to_string(),
        message: message.trim().to_string(),
        meta,
    };
    let line = match serde_json::to_string(&entry) {
        Ok(line) => line,
        Err(err) => format!("Failed to serialize log entry: Error: {:?}, Entry: {:?}", err, entry),
    };
    match target {
        Some(target) => log::log!(target: target, level, "{}", line),
        None => log::log!(level, "{}", line),
    }
}

fn is_json(message: &str) -> bool {
    message.starts_with('{') && message.ends_with('}')
}

/// Installs the process-wide logger. Messages that are already JSON (from
/// `jlog!` or the request logger's JSON format line) pass through untouched;
/// everything else is wrapped in a `LogEntry` so the output stays one JSON
/// object per line.
pub fn setup_logger() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let message = format!("{}", record.args());
            if is_json(&message) {
                writeln!(buf, "{}", message)
            } else {
                let entry = LogEntry {
                    level: record.level().to_string(),
                    time: Utc::now(),
                    target: record.target().to_string(),
                    message: message.trim().to_string(),
                    meta: None,
                };
                match serde_json::to_string(&entry) {
                    Ok(line) => writeln!(buf, "{}", line),
                    Err(err) => writeln!(buf, "Failed to serialize log entry: Error: {:?}, Entry: {:?}", err, entry),
                }
            }
        })
        .init();
}
