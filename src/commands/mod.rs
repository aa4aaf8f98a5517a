// src/commands/mod.rs
pub mod cd_cmd;
pub mod du_cmd;
pub mod exit_cmd;
pub mod ls;
pub mod rev_cmd;
pub mod rmdir_cmd;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use types::{Command, CommandResult};
