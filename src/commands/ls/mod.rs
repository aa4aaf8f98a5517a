// src/commands/ls/mod.rs
use crate::commands::CommandResult;
use crate::fs::VirtualFilesystem;
use crate::session::Session;

/// Shown instead of an empty listing.
pub const EMPTY_MARKER: &str = "(empty)";

pub fn handle_ls(session: &Session, fs: &VirtualFilesystem) -> CommandResult {
    match fs.list_directory(session.current_path()) {
        Ok(names) if names.is_empty() => CommandResult::success(EMPTY_MARKER.to_string()),
        Ok(names) => CommandResult::success(names.join("\n")),
        Err(e) => CommandResult::error(format!("ls: cannot open directory: {}", e)),
    }
}
