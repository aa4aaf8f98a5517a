use crate::commands::CommandResult;
use crate::fs::{VfsError, VirtualFilesystem};
use crate::session::Session;

fn reverse_string(s: &str) -> String {
    s.chars().rev().collect()
}

/// Reverse every line characterwise, dropping trailing whitespace first.
fn process_content(content: &str) -> String {
    content
        .lines()
        .map(|line| reverse_string(line.trim_end()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn handle_rev(session: &Session, fs: &VirtualFilesystem, file: &str) -> CommandResult {
    if file.is_empty() {
        return CommandResult::error("rev: missing operand".to_string());
    }

    let file_path = match fs.resolve(session.current_path(), file) {
        Ok(path) => path,
        Err(VfsError::PathEscape { .. }) => {
            return CommandResult::error(format!(
                "rev: {}: Permission denied (outside the mount root)",
                file
            ));
        }
        Err(e) => return CommandResult::error(format!("rev: {}: {}", file, e)),
    };

    match fs.read_file(&file_path) {
        Ok(content) => CommandResult::success(process_content(&content)),
        Err(VfsError::NotFound { .. }) => {
            CommandResult::error(format!("rev: {}: No such file or directory", file))
        }
        Err(VfsError::NotFile { .. }) => {
            CommandResult::error(format!("rev: {}: Not a regular file", file))
        }
        Err(e) => CommandResult::error(format!("rev: {}: {}", file, e)),
    }
}
