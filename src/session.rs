//! Session state
//!
//! The current directory of one running shell plus the identity shown in
//! its prompt. Owned by a single `CommandEngine`; handlers borrow it.

use std::path::{Path, PathBuf};

/// Display identity rendered in the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            user: "user".to_string(),
            host: "computer".to_string(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    current_path: PathBuf,
    identity: Identity,
    exited: bool,
}

impl Session {
    pub fn new(start: PathBuf, identity: Identity) -> Self {
        Self { current_path: start, identity, exited: false }
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    /// Only `cd` moves the session, and only to a resolved, existing directory.
    pub(crate) fn change_dir(&mut self, target: PathBuf) {
        self.current_path = target;
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn has_exited(&self) -> bool {
        self.exited
    }

    pub(crate) fn mark_exited(&mut self) {
        self.exited = true;
    }

    /// `<user>@<host>:<current path>$ `
    pub fn prompt(&self) -> String {
        format!(
            "{}@{}:{}$ ",
            self.identity.user,
            self.identity.host,
            self.current_path.display()
        )
    }
}
