//! JSONL file sink for invocation telemetry.
//!
//! Each [`InvocationEvent`] becomes one JSON line carrying `type` and an
//! RFC 3339 `timestamp` next to the payload fields. The file is opened in
//! append mode so successive runs accumulate into one history.

use governor_application::ports::telemetry::{InvocationEvent, InvocationTelemetry};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Telemetry sink writing one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every line and
/// on `Drop`.
pub struct JsonlTelemetryLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTelemetryLogger {
    /// Open (or create) the file at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        debug!(path = %path.display(), "Telemetry log opened");

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn to_record(event: InvocationEvent) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match event.payload {
            Value::Object(map) => map,
            other => {
                let mut map = Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        record.insert("type".to_string(), Value::from(event.event_type));
        record.insert("timestamp".to_string(), Value::from(timestamp));
        Value::Object(record)
    }
}

impl InvocationTelemetry for JsonlTelemetryLogger {
    fn record(&self, event: InvocationEvent) {
        let Ok(line) = serde_json::to_string(&Self::to_record(event)) else {
            return;
        };

        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if let Err(e) = writeln!(writer, "{}", line).and_then(|()| writer.flush()) {
            warn!(path = %self.path.display(), error = %e, "Failed to write telemetry line");
        }
    }
}

impl Drop for JsonlTelemetryLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let logger = JsonlTelemetryLogger::open(&path).unwrap();

        logger.record(InvocationEvent::new(
            "invocation_succeeded",
            json!({"tool_name": "echo", "estimated_tokens": 1448, "actual_tokens": 7}),
        ));
        logger.record(InvocationEvent::new(
            "invocation_failed",
            json!({"tool_name": "divide", "code": "TOOL_ERROR"}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "invocation_succeeded");
        assert_eq!(lines[0]["estimated_tokens"], 1448);
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["code"], "TOOL_ERROR");
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("telemetry.jsonl");

        for _ in 0..2 {
            let logger = JsonlTelemetryLogger::open(&path).unwrap();
            logger.record(InvocationEvent::new("invocation_cancelled", json!({"tool_name": "wait"})));
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("telemetry.jsonl");
        let logger = JsonlTelemetryLogger::open(&path).unwrap();

        logger.record(InvocationEvent::new("note", json!("just a string")));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["type"], "note");
        assert_eq!(lines[0]["data"], "just a string");
    }

    #[test]
    fn test_open_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        assert!(JsonlTelemetryLogger::open(blocker.join("telemetry.jsonl")).is_err());
    }
}
