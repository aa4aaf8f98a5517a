//! Command Engine
//!
//! Main entry point for the shell. Ties together the mounted filesystem,
//! the session and the action log behind the narrow [`Shell`] interface
//! every frontend talks to.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::action_log::{ActionLogger, LogEntry};
use crate::commands::cd_cmd::handle_cd;
use crate::commands::du_cmd::handle_du;
use crate::commands::exit_cmd::handle_exit;
use crate::commands::ls::handle_ls;
use crate::commands::rev_cmd::handle_rev;
use crate::commands::rmdir_cmd::handle_rmdir;
use crate::commands::{Command, CommandResult};
use crate::fs::VirtualFilesystem;
use crate::session::{Identity, Session};

/// What a frontend (terminal loop, script runner, GUI panel) may call.
pub trait Shell {
    /// Run one line and return the text to display. Never fails.
    fn execute(&mut self, line: &str) -> String;

    /// The prompt to show before the next line.
    fn prompt(&self) -> String;
}

/// Executes commands one at a time against a mounted filesystem.
///
/// The engine assumes a single caller. Frontends that drive it from several
/// threads must serialize calls themselves, e.g. behind a `Mutex`.
pub struct CommandEngine {
    fs: Arc<VirtualFilesystem>,
    logger: ActionLogger,
    session: Session,
}

impl CommandEngine {
    /// A new session starting at the mount root.
    pub fn new(fs: Arc<VirtualFilesystem>, logger: ActionLogger, identity: Identity) -> Self {
        let session = Session::new(fs.root().to_path_buf(), identity);
        Self { fs, logger, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn has_exited(&self) -> bool {
        self.session.has_exited()
    }

    fn dispatch(&mut self, command: &Command) -> CommandResult {
        match command {
            Command::List => handle_ls(&self.session, &self.fs),
            Command::ChangeDir(target) => handle_cd(&mut self.session, &self.fs, target),
            Command::Reverse(file) => handle_rev(&self.session, &self.fs, file),
            Command::DiskUsage => handle_du(&self.session, &self.fs),
            Command::RemoveDir(dir) => handle_rmdir(&self.session, &self.fs, dir),
            Command::Exit => handle_exit(&mut self.session),
            Command::Unknown(raw) => CommandResult::error(format!("Unknown command: {}", raw)),
        }
    }

    /// Log a successful dispatch. Log trouble is reported, never returned.
    fn record(&mut self, action: &str) {
        let entry = LogEntry::now(action, self.session.current_path());
        if let Err(e) = self.logger.append(&entry) {
            warn!(error = %e, log = %self.logger.path().display(), action, "failed to record action");
        }
    }
}

impl Shell for CommandEngine {
    fn execute(&mut self, line: &str) -> String {
        let Some(command) = Command::parse(line) else {
            return String::new();
        };

        let result = self.dispatch(&command);
        if result.is_success() {
            let action = match command {
                Command::Exit => "exit",
                _ => line.trim(),
            };
            self.record(action);
        } else {
            debug!(command = command.name(), stderr = %result.stderr, "command failed");
        }

        result.into_output()
    }

    fn prompt(&self) -> String {
        self.session.prompt()
    }
}
