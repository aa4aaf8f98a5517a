//! File System Module
//!
//! The shell's namespace: a directory tree unpacked from an archive,
//! with every path confined to the mount root.

pub mod archive;
pub mod mounted_fs;
pub mod types;

pub use mounted_fs::VirtualFilesystem;
pub use types::*;
