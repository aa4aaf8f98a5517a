//! Startup script replay
//!
//! Feeds each non-blank line of a script to a [`Shell`] before interactive
//! use begins. A missing script is not an error.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::engine::Shell;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplayStatus {
    /// No script configured, or it could not be opened.
    Skipped,
    Completed,
    /// The script stopped at an `exit` line.
    Exited,
    /// Reading the script failed partway; the rest was not run.
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayReport {
    pub status: ReplayStatus,
    pub executed: usize,
}

/// Replay `script` through `shell`, echoing each line and its result to `sink`.
pub fn replay(script: Option<&Path>, shell: &mut dyn Shell, sink: &mut dyn Write) -> ReplayReport {
    let skipped = ReplayReport { status: ReplayStatus::Skipped, executed: 0 };

    let Some(path) = script else {
        info!("no startup script configured");
        return skipped;
    };
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            info!(script = %path.display(), error = %e, "startup script not available, skipping");
            return skipped;
        }
    };

    let mut executed = 0;
    for line in BufReader::new(file).lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!(script = %path.display(), error = %e, executed, "startup script read failed");
                return ReplayReport { status: ReplayStatus::Aborted(e.to_string()), executed };
            }
        };
        let command = line.trim();
        if command.is_empty() {
            continue;
        }

        let prompt = shell.prompt();
        let output = shell.execute(command);
        executed += 1;
        if let Err(e) = writeln!(sink, "{}{}\n{}", prompt, command, output) {
            warn!(error = %e, "cannot write startup output");
        }

        if command == "exit" {
            info!(script = %path.display(), executed, "startup script ended the session");
            return ReplayReport { status: ReplayStatus::Exited, executed };
        }
    }

    info!(script = %path.display(), executed, "startup script finished");
    ReplayReport { status: ReplayStatus::Completed, executed }
}
