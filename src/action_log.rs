//! Action Log
//!
//! Append-only record of dispatched commands. The file starts with a
//! fixed header line followed by one JSON object per line:
//!
//! ```text
//! # vfs-shell action log
//! {"timestamp":"2026-10-16T09:12:01.532Z","action":"ls","path":"/tmp/vfs"}
//! ```

use std::fs::{File, OpenOptions};
use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const LOG_HEADER: &str = "# vfs-shell action log";

#[derive(Error, Debug)]
pub enum LogError {
    #[error("cannot open action log {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write action log: {0}")]
    Write(#[from] io::Error),

    #[error("cannot encode log entry: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub action: String,
    pub path: String,
}

impl LogEntry {
    /// Stamp an action with the current UTC time.
    pub fn now(action: &str, path: &Path) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            action: action.to_string(),
            path: path.display().to_string(),
        }
    }
}

/// Owns the log sink for the life of the process.
/// The handle is closed when the logger is dropped.
pub struct ActionLogger {
    path: PathBuf,
    writer: Box<dyn Write + Send>,
}

impl fmt::Debug for ActionLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionLogger").field("path", &self.path).finish_non_exhaustive()
    }
}

/// Whole line in one `write_all`, then flush. Nothing is held back
/// between calls, so a failed write cannot bleed into the next line.
fn write_line(writer: &mut dyn Write, line: &str) -> io::Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.flush()
}

impl ActionLogger {
    /// Create or truncate the log and write the header.
    pub fn init(path: &Path) -> Result<Self, LogError> {
        let open_err = |source| LogError::Open { path: path.to_path_buf(), source };
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(open_err)?;
        write_line(&mut file, &format!("{}\n", LOG_HEADER)).map_err(open_err)?;
        Ok(Self { path: path.to_path_buf(), writer: Box::new(file) })
    }

    /// Log to an arbitrary sink. `path` is only used in diagnostics.
    pub fn with_writer(path: &Path, mut writer: Box<dyn Write + Send>) -> Result<Self, LogError> {
        write_line(writer.as_mut(), &format!("{}\n", LOG_HEADER))?;
        Ok(Self { path: path.to_path_buf(), writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write one entry as a single line and flush it.
    pub fn append(&mut self, entry: &LogEntry) -> Result<(), LogError> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        write_line(self.writer.as_mut(), &line)?;
        Ok(())
    }
}

/// In-memory sink whose writes can be switched to fail.
#[cfg(test)]
pub(crate) mod testing {
    use std::io::{self, Write};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    pub(crate) struct FlakyWriter {
        pub buffer: Arc<Mutex<Vec<u8>>>,
        pub failing: Arc<AtomicBool>,
    }

    impl FlakyWriter {
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn contents(&self) -> String {
            String::from_utf8(self.buffer.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for FlakyWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(io::Error::other("disk full"));
            }
            self.buffer.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(io::Error::other("disk full"));
            }
            Ok(())
        }
    }
}

/// Read back every entry of a log, skipping the header.
pub fn read_entries(path: &Path) -> Result<Vec<LogEntry>, LogError> {
    let file = File::open(path).map_err(|source| LogError::Open { path: path.to_path_buf(), source })?;
    let mut entries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.is_empty() || line == LOG_HEADER {
            continue;
        }
        entries.push(serde_json::from_str(&line)?);
    }
    Ok(entries)
}
