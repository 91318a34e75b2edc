//! Append-only record of every dispatched command.

use crate::error::{FsError, Result, at};
use chrono::{Local, NaiveDateTime};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("Success"),
            Status::Error => f.write_str("Error"),
        }
    }
}

/// One line of the command log.
///
/// Renders as `<timestamp> - Command: <name>, Status: <status>[, Error: <message>]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: NaiveDateTime,
    pub command: String,
    pub status: Status,
    pub error: Option<String>,
}

impl LogEntry {
    pub fn success(command: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            command: command.into(),
            status: Status::Success,
            error: None,
        }
    }

    pub fn error(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now().naive_local(),
            command: command.into(),
            status: Status::Error,
            error: Some(message.into()),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Command: {}, Status: {}",
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.command,
            self.status
        )?;
        match self.error.as_deref() {
            Some(message) if !message.is_empty() => write!(f, ", Error: {}", message),
            _ => Ok(()),
        }
    }
}

/// Destination for [`LogEntry`] lines.
pub trait LogSink {
    /// Append one entry.
    fn append(&mut self, entry: &LogEntry) -> Result<()>;

    /// Everything recorded so far, or `None` when nothing was ever recorded.
    fn contents(&self) -> Result<Option<String>>;
}

/// Log file opened in append mode for every entry.
#[derive(Debug, Clone)]
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LogSink for FileLog {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(at(&self.path))?;
        // Single write per entry; concurrent appenders must not interleave.
        let line = format!("{}\n", entry);
        file.write_all(line.as_bytes()).map_err(at(&self.path))
    }

    fn contents(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FsError::io(&self.path, e)),
        }
    }
}

/// Keeps rendered lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    pub lines: Vec<String>,
}

impl LogSink for MemoryLog {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.lines.push(entry.to_string());
        Ok(())
    }

    fn contents(&self) -> Result<Option<String>> {
        if self.lines.is_empty() {
            return Ok(None);
        }
        let mut text = self.lines.join("\n");
        text.push('\n');
        Ok(Some(text))
    }
}
