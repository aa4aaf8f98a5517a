use crate::commands::CommandResult;
use crate::fs::{VfsError, VirtualFilesystem};
use crate::session::Session;

/// Remove an empty directory. The current directory, its ancestors and the
/// mount root itself are never removed.
pub fn handle_rmdir(session: &Session, fs: &VirtualFilesystem, dir: &str) -> CommandResult {
    if dir.is_empty() {
        return CommandResult::error("rmdir: missing operand".to_string());
    }

    let full_path = match fs.resolve(session.current_path(), dir) {
        Ok(path) => path,
        Err(VfsError::PathEscape { .. }) => {
            return CommandResult::error(format!(
                "rmdir: failed to remove '{}': Permission denied (outside the mount root)",
                dir
            ));
        }
        Err(e) => return CommandResult::error(format!("rmdir: failed to remove '{}': {}", dir, e)),
    };

    if session.current_path().starts_with(&full_path) {
        return CommandResult::error(format!(
            "rmdir: failed to remove '{}': Device or resource busy",
            dir
        ));
    }

    let reason = match fs.remove_empty_directory(&full_path) {
        Ok(()) => return CommandResult::success(format!("Directory '{}' removed", dir)),
        Err(VfsError::NotFound { .. }) => "No such file or directory".to_string(),
        Err(VfsError::NotDirectory { .. }) => "Not a directory".to_string(),
        Err(VfsError::NotEmpty { .. }) => "Directory not empty".to_string(),
        Err(e) => e.to_string(),
    };
    CommandResult::error(format!("rmdir: failed to remove '{}': {}", dir, reason))
}
