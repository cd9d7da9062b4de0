//! JSON-lines file logger behind the `log` facade.
//!
//! The terminal owns stdout/stderr while a game runs, so log records go to a
//! file instead: one JSON object per line, appended.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use log::{LevelFilter, Log, Metadata, Record};
use serde::Serialize;

/// One log line on disk
#[derive(Debug, Serialize)]
pub struct LogLine<'a> {
    pub ts_ms: u64,
    pub level: &'a str,
    pub target: &'a str,
    pub msg: String,
}

impl<'a> LogLine<'a> {
    pub fn from_record(record: &Record<'a>, ts_ms: u64) -> Self {
        Self {
            ts_ms,
            level: record.level().as_str(),
            target: record.target(),
            msg: record.args().to_string(),
        }
    }
}

/// Appends serialized [`LogLine`]s to any writer
pub struct JsonLinesLogger<W: Write + Send> {
    level: LevelFilter,
    out: Mutex<W>,
}

impl<W: Write + Send> JsonLinesLogger<W> {
    pub fn new(out: W, level: LevelFilter) -> Self {
        Self {
            level,
            out: Mutex::new(out),
        }
    }

    /// Consume the logger and hand back the writer
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Log for JsonLinesLogger<W> {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = LogLine::from_record(record, now_ms());
        let mut buf = match serde_json::to_vec(&line) {
            Ok(buf) => buf,
            Err(_) => return,
        };
        buf.push(b'\n');

        if let Ok(mut out) = self.out.lock() {
            // Logging must never take the game down.
            let _ = out.write_all(&buf);
        }
    }

    fn flush(&self) {
        if let Ok(mut out) = self.out.lock() {
            let _ = out.flush();
        }
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

/// Install a file logger as the global `log` backend.
pub fn init_file(path: &str, level: LevelFilter) -> Result<()> {
    let file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {path}"))?;

    log::set_boxed_logger(Box::new(JsonLinesLogger::new(file, level)))
        .context("a logger is already installed")?;
    log::set_max_level(level);
    Ok(())
}
