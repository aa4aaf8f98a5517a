use crate::commands::CommandResult;
use crate::fs::VirtualFilesystem;
use crate::session::Session;

fn human_readable(bytes: u64) -> Option<String> {
    if bytes < 1024 {
        None
    } else if bytes < 1024 * 1024 {
        Some(format!("{:.1}K", bytes as f64 / 1024.0))
    } else if bytes < 1024 * 1024 * 1024 {
        Some(format!("{:.1}M", bytes as f64 / (1024.0 * 1024.0)))
    } else {
        Some(format!("{:.1}G", bytes as f64 / (1024.0 * 1024.0 * 1024.0)))
    }
}

fn format_size(bytes: u64) -> String {
    match human_readable(bytes) {
        Some(short) => format!("Total size: {} bytes ({})", bytes, short),
        None => format!("Total size: {} bytes", bytes),
    }
}

/// Recursive byte count of the current directory.
pub fn handle_du(session: &Session, fs: &VirtualFilesystem) -> CommandResult {
    match fs.size_recursive(session.current_path()) {
        Ok(total) => CommandResult::success(format_size(total)),
        Err(e) => CommandResult::error(format!("du: {}", e)),
    }
}
