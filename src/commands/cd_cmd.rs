//! cd - Change directory
//!
//! Moves the session to an existing directory under the mount root.
//! Targets outside the root are refused, never clamped.

use crate::commands::CommandResult;
use crate::fs::{VfsError, VirtualFilesystem};
use crate::session::Session;

pub fn handle_cd(session: &mut Session, fs: &VirtualFilesystem, target: &str) -> CommandResult {
    if target.is_empty() {
        return CommandResult::error("cd: missing operand".to_string());
    }

    let new_dir = match fs.resolve(session.current_path(), target) {
        Ok(path) => path,
        Err(VfsError::PathEscape { .. }) => {
            return CommandResult::error(format!(
                "cd: {}: Permission denied (outside the mount root)",
                target
            ));
        }
        Err(e) => return CommandResult::error(format!("cd: {}: {}", target, e)),
    };

    if !new_dir.exists() {
        return CommandResult::error(format!("cd: {}: No such file or directory", target));
    }
    if !fs.is_directory(&new_dir) {
        return CommandResult::error(format!("cd: {}: Not a directory", target));
    }

    session.change_dir(new_dir);
    CommandResult::success(format!(
        "Current directory: {}",
        session.current_path().display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::fixture;

    #[test]
    fn test_cd_into_directory() {
        let mut fx = fixture();
        let result = handle_cd(&mut fx.session, &fx.fs, "docs");
        assert!(result.is_success());
        let expected = fx.fs.root().join("docs");
        assert_eq!(fx.session.current_path(), expected.as_path());
        assert!(result.stdout.contains(&expected.display().to_string()));
    }

    #[test]
    fn test_cd_nested_and_back() {
        let mut fx = fixture();
        assert!(handle_cd(&mut fx.session, &fx.fs, "docs/empty").is_success());
        assert!(handle_cd(&mut fx.session, &fx.fs, "../..").is_success());
        assert_eq!(fx.session.current_path(), fx.fs.root());
        assert!(handle_cd(&mut fx.session, &fx.fs, "/docs").is_success());
        assert_eq!(fx.session.current_path(), fx.fs.root().join("docs").as_path());
    }

    #[test]
    fn test_cd_missing_target_keeps_state() {
        let mut fx = fixture();
        let before = fx.session.current_path().to_path_buf();
        let result = handle_cd(&mut fx.session, &fx.fs, "nowhere");
        assert_eq!(result.exit_code, 1);
        assert!(result.stderr.contains("nowhere"));
        assert_eq!(fx.session.current_path(), before.as_path());
    }

    #[test]
    fn test_cd_into_file() {
        let mut fx = fixture();
        let result = handle_cd(&mut fx.session, &fx.fs, "notes.txt");
        assert_eq!(result.stderr, "cd: notes.txt: Not a directory");
        assert_eq!(fx.session.current_path(), fx.fs.root());
    }

    // The interactive shell this replaces let `cd ..` walk from the mount
    // root into the host filesystem. Here it is refused and the session stays put.
    #[test]
    fn test_cd_above_mount_root_is_refused() {
        let mut fx = fixture();
        let result = handle_cd(&mut fx.session, &fx.fs, "..");
        assert_eq!(result.exit_code, 1);
        assert!(result.stderr.contains("outside the mount root"));
        assert_eq!(fx.session.current_path(), fx.fs.root());

        assert!(handle_cd(&mut fx.session, &fx.fs, "docs").is_success());
        let result = handle_cd(&mut fx.session, &fx.fs, "../../..");
        assert!(result.stderr.contains("../../.."));
        assert_eq!(fx.session.current_path(), fx.fs.root().join("docs").as_path());
    }

    #[test]
    fn test_cd_missing_operand() {
        let mut fx = fixture();
        assert_eq!(handle_cd(&mut fx.session, &fx.fs, "").stderr, "cd: missing operand");
    }
}
