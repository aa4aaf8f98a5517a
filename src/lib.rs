//! vfs-shell - A small command shell over an archive-backed filesystem
//!
//! The archive is unpacked into a mount root, and every command runs
//! against that tree with paths confined to it. Frontends talk to the
//! engine only through [`Shell`]: one line in, one string out.

pub mod action_log;
pub mod commands;
pub mod config;
pub mod engine;
pub mod fs;
pub mod logging;
pub mod session;
pub mod startup;

pub use action_log::{ActionLogger, LogEntry};
pub use config::Config;
pub use engine::{CommandEngine, Shell};
pub use fs::VirtualFilesystem;
pub use startup::{replay, ReplayReport, ReplayStatus};
