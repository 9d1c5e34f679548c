//! Logging service - structured application events in logs.jsonl
//!
//! Records what the application did (commands run, pages opened, failures)
//! as one JSON object per line in the data directory. No record contents
//! (names, emails, passwords, request items) are ever logged.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

const LOG_FILE: &str = "logs.jsonl";

/// Counter for generating unique IDs within the same millisecond
static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Current unix timestamp in milliseconds
fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Unique ID based on timestamp + counter
fn generate_id() -> u64 {
    // Lower 48 bits for the timestamp, upper 16 for the counter
    let counter = ID_COUNTER.fetch_add(1, Ordering::Relaxed) & 0xFFFF;
    ((now_ms() as u64) << 16) | counter
}

fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// Entry point for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    Cli,
    Embedded,
}

impl EntryPoint {
    fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Embedded => "embedded",
        }
    }
}

/// A log event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    pub event: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl LogEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            route: None,
            command: None,
            error_message: None,
            error_details: None,
        }
    }

    /// Set the route context (page navigation)
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Set the command context
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    pub fn with_error_details(mut self, details: impl Into<String>) -> Self {
        self.error_details = Some(details.into());
        self
    }
}

/// A log entry as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: u64,
    pub timestamp: i64,
    pub entry_point: String,
    pub app_version: String,
    pub platform: String,
    pub event: String,
    #[serde(default)]
    pub route: Option<String>,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_details: Option<String>,
}

/// Append-only event log with locked writes
pub struct LoggingService {
    log_path: PathBuf,
    entry_point: EntryPoint,
    app_version: String,
    platform: &'static str,
}

impl LoggingService {
    /// Create a logging service writing to `logs.jsonl` in `data_dir`
    pub fn new(data_dir: &Path, entry_point: EntryPoint, app_version: impl Into<String>) -> Result<Self> {
        fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", data_dir))?;
        Ok(Self {
            log_path: data_dir.join(LOG_FILE),
            entry_point,
            app_version: app_version.into(),
            platform: detect_platform(),
        })
    }

    fn open_locked(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        file.lock_exclusive()?;
        Ok(file)
    }

    /// Record an event.
    ///
    /// The entry point, app version and platform are filled in from the
    /// service configuration.
    pub fn log(&self, event: LogEvent) -> Result<()> {
        let entry = LogEntry {
            id: generate_id(),
            timestamp: now_ms(),
            entry_point: self.entry_point.as_str().to_string(),
            app_version: self.app_version.clone(),
            platform: self.platform.to_string(),
            event: event.event,
            route: event.route,
            command: event.command,
            error_message: event.error_message,
            error_details: event.error_details,
        };
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let mut file = self.open_locked()?;
        let result = file.write_all(line.as_bytes());
        let _ = file.unlock();
        result?;
        Ok(())
    }

    /// Every readable entry, oldest first. Malformed lines are skipped.
    fn read_all(&self) -> Result<Vec<LogEntry>> {
        let file = match File::open(&self.log_path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let entries = BufReader::new(file)
            .lines()
            .map_while(|line| line.ok())
            .filter_map(|line| serde_json::from_str::<LogEntry>(&line).ok())
            .collect();
        Ok(entries)
    }

    /// Most recent entries first, up to `limit`
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries = self.read_all()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    /// Most recent error entries first, up to `limit`
    pub fn get_errors(&self, limit: usize) -> Result<Vec<LogEntry>> {
        let mut entries: Vec<LogEntry> = self
            .read_all()?
            .into_iter()
            .filter(|e| e.error_message.is_some())
            .collect();
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }

    pub fn count(&self) -> Result<u64> {
        Ok(self.read_all()?.len() as u64)
    }

    /// Delete entries older than the given timestamp (unix ms)
    pub fn delete_before(&self, timestamp_ms: i64) -> Result<u64> {
        let lock = self.open_locked()?;
        let result = self.rewrite_keeping(|e| e.timestamp >= timestamp_ms);
        let _ = lock.unlock();
        result
    }

    fn rewrite_keeping(&self, keep: impl Fn(&LogEntry) -> bool) -> Result<u64> {
        let entries = self.read_all()?;
        let before = entries.len();

        let dir = self
            .log_path
            .parent()
            .context("Log file has no parent directory")?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        let mut kept = 0usize;
        for entry in entries.iter().filter(|e| keep(e)) {
            serde_json::to_writer(&mut tmp, entry)?;
            tmp.write_all(b"\n")?;
            kept += 1;
        }
        tmp.persist(&self.log_path)?;

        Ok((before - kept) as u64)
    }

    /// Path of the log file
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_log_fills_service_fields() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("test_event")).unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "test_event");
        assert_eq!(entries[0].entry_point, "cli");
        assert_eq!(entries[0].app_version, "1.0.0");
        assert!(service.log_path().exists());
    }

    #[test]
    fn test_log_with_context() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Embedded, "2.0.0").unwrap();

        service
            .log(
                LogEvent::new("page_opened")
                    .with_route("/employees")
                    .with_command("open"),
            )
            .unwrap();

        let entries = service.get_recent(10).unwrap();
        assert_eq!(entries[0].route, Some("/employees".to_string()));
        assert_eq!(entries[0].command, Some("open".to_string()));
        assert_eq!(entries[0].entry_point, "embedded");
    }

    #[test]
    fn test_recent_is_newest_first() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();
        service.log(LogEvent::new("first")).unwrap();
        service.log(LogEvent::new("second")).unwrap();

        let entries = service.get_recent(1).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].event, "second");
    }

    #[test]
    fn test_get_errors_filters() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("ok")).unwrap();
        service
            .log(
                LogEvent::new("save_failed")
                    .with_command("create_department")
                    .with_error("Storage quota exceeded")
                    .with_error_details("needed 10"),
            )
            .unwrap();

        let errors = service.get_errors(10).unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].event, "save_failed");
        assert_eq!(errors[0].error_details, Some("needed 10".to_string()));
    }

    #[test]
    fn test_count_and_delete() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();

        service.log(LogEvent::new("event1")).unwrap();
        service.log(LogEvent::new("event2")).unwrap();
        service.log(LogEvent::new("event3")).unwrap();
        assert_eq!(service.count().unwrap(), 3);

        let deleted = service.delete_before(now_ms() + 1000).unwrap();
        assert_eq!(deleted, 3);
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let dir = tempdir().unwrap();
        let service = LoggingService::new(dir.path(), EntryPoint::Cli, "1.0.0").unwrap();
        service.log(LogEvent::new("good")).unwrap();
        std::fs::OpenOptions::new()
            .append(true)
            .open(service.log_path())
            .unwrap()
            .write_all(b"{garbage\n")
            .unwrap();

        assert_eq!(service.count().unwrap(), 1);
    }
}
