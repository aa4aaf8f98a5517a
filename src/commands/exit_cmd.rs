//! exit - End the session
//!
//! Marks the session as finished. The engine still answers later calls;
//! it is up to the frontend to stop reading input.

use crate::commands::CommandResult;
use crate::session::Session;

pub fn handle_exit(session: &mut Session) -> CommandResult {
    session.mark_exited();
    CommandResult::success("Exiting shell.".to_string())
}
