//! Mounted File System
//!
//! A real directory tree extracted from a packaged archive. Every path that
//! reaches the host filesystem goes through [`VirtualFilesystem::resolve`],
//! which keeps it inside the mount root.

use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::archive::{decode_archive, ArchiveEntry, EntryKind};
use super::types::{MountError, VfsError};

#[derive(Debug)]
pub struct VirtualFilesystem {
    root: PathBuf,
}

/// Turn an archive entry path into a path relative to the mount root.
/// Returns `None` for entries naming the root itself (`./`).
fn sanitize_entry_path(entry: &str) -> Result<Option<PathBuf>, MountError> {
    let mut relative = PathBuf::new();
    for component in Path::new(entry).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(MountError::UnsafeEntry { entry: entry.to_string() });
            }
        }
    }
    Ok(if relative.as_os_str().is_empty() { None } else { Some(relative) })
}

fn extract_entry(root: &Path, relative: &Path, entry: &ArchiveEntry) -> Result<(), MountError> {
    let target = root.join(relative);
    let extract_err = |source| MountError::Extract { path: target.clone(), source };

    match &entry.kind {
        EntryKind::Directory => fs::create_dir_all(&target).map_err(extract_err),
        EntryKind::File => {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(extract_err)?;
            }
            fs::write(&target, &entry.content).map_err(extract_err)
        }
        EntryKind::Symlink(link) => {
            warn!(entry = %entry.path, target = %link, "skipping symlink entry");
            Ok(())
        }
        EntryKind::Other(flag) => {
            warn!(entry = %entry.path, type_flag = %(*flag as char), "skipping unsupported entry type");
            Ok(())
        }
    }
}

impl VirtualFilesystem {
    /// Extract `archive` (zip, tar or tar.gz) into a fresh `mount_dir`,
    /// wiping whatever was there.
    ///
    /// The archive is fully decoded and every entry path checked before the
    /// old mount is touched, so a bad archive leaves no partial state behind.
    pub fn mount(archive: &Path, mount_dir: &Path) -> Result<Self, MountError> {
        if !archive.is_file() {
            return Err(MountError::ArchiveMissing { path: archive.to_path_buf() });
        }
        let raw = fs::read(archive).map_err(|source| MountError::ArchiveRead {
            path: archive.to_path_buf(),
            source,
        })?;
        let entries = decode_archive(&raw)
            .map_err(|source| MountError::Corrupt { path: archive.to_path_buf(), source })?;

        let mut plan = Vec::with_capacity(entries.len());
        for entry in &entries {
            if let Some(relative) = sanitize_entry_path(&entry.path)? {
                plan.push((relative, entry));
            }
        }

        let prepare = |source| MountError::Prepare { path: mount_dir.to_path_buf(), source };
        match fs::symlink_metadata(mount_dir) {
            Ok(meta) if meta.is_dir() => fs::remove_dir_all(mount_dir).map_err(prepare)?,
            Ok(_) => fs::remove_file(mount_dir).map_err(prepare)?,
            Err(_) => {}
        }
        fs::create_dir_all(mount_dir).map_err(prepare)?;
        let root = mount_dir.canonicalize().map_err(prepare)?;

        for (relative, entry) in &plan {
            extract_entry(&root, relative, entry)?;
        }

        info!(archive = %archive.display(), root = %root.display(), entries = plan.len(), "mounted archive");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Join `input` onto `current` and keep the result inside the root.
    ///
    /// A leading `/` in `input` starts from the mount root. Any `..` that
    /// would climb above the root fails with `PathEscape`. Existing targets
    /// are canonicalized and checked again, so symlinks cannot lead out.
    pub fn resolve(&self, current: &Path, input: &str) -> Result<PathBuf, VfsError> {
        let escape = || VfsError::PathEscape { path: input.to_string() };

        let mut stack: Vec<OsString> = Vec::new();
        if !input.starts_with('/') {
            let relative = current.strip_prefix(&self.root).map_err(|_| escape())?;
            for component in relative.components() {
                if let Component::Normal(part) = component {
                    stack.push(part.to_os_string());
                }
            }
        }

        for component in Path::new(input).components() {
            match component {
                Component::Normal(part) => stack.push(part.to_os_string()),
                Component::ParentDir => {
                    stack.pop().ok_or_else(escape)?;
                }
                Component::CurDir | Component::RootDir | Component::Prefix(_) => {}
            }
        }

        let mut resolved = self.root.clone();
        resolved.extend(&stack);

        match resolved.canonicalize() {
            Ok(canonical) if canonical.starts_with(&self.root) => Ok(canonical),
            Ok(canonical) => {
                debug!(input, target = %canonical.display(), "symlink leads outside mount root");
                Err(escape())
            }
            // Missing targets stay lexical; callers report them as not found.
            Err(_) => Ok(resolved),
        }
    }

    /// Entry names of a directory, sorted. An empty directory gives an empty list.
    pub fn list_directory(&self, path: &Path) -> Result<Vec<String>, VfsError> {
        if !path.exists() {
            return Err(VfsError::NotFound { path: path.display().to_string() });
        }
        if !path.is_dir() {
            return Err(VfsError::NotDirectory { path: path.display().to_string() });
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| VfsError::io(path, e))? {
            let entry = entry.map_err(|e| VfsError::io(path, e))?;
            names.push(entry.file_name().to_string_lossy().to_string());
        }
        names.sort();
        Ok(names)
    }

    pub fn is_directory(&self, path: &Path) -> bool {
        path.is_dir()
    }

    pub fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    /// File contents as text; invalid UTF-8 is replaced rather than rejected.
    pub fn read_file(&self, path: &Path) -> Result<String, VfsError> {
        if !path.exists() {
            return Err(VfsError::NotFound { path: path.display().to_string() });
        }
        if !path.is_file() {
            return Err(VfsError::NotFile { path: path.display().to_string() });
        }
        let bytes = fs::read(path).map_err(|e| VfsError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Total size in bytes of every regular file under `path`. Symlinks are not followed.
    pub fn size_recursive(&self, path: &Path) -> Result<u64, VfsError> {
        let mut total = 0u64;
        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.map_err(|e| VfsError::io(path, e.into()))?;
            if entry.file_type().is_file() {
                let meta = entry.metadata().map_err(|e| VfsError::io(entry.path(), e.into()))?;
                total += meta.len();
            }
        }
        Ok(total)
    }

    pub fn remove_empty_directory(&self, path: &Path) -> Result<(), VfsError> {
        if !path.exists() {
            return Err(VfsError::NotFound { path: path.display().to_string() });
        }
        if !path.is_dir() {
            return Err(VfsError::NotDirectory { path: path.display().to_string() });
        }
        let mut entries = fs::read_dir(path).map_err(|e| VfsError::io(path, e))?;
        if entries.next().is_some() {
            return Err(VfsError::NotEmpty { path: path.display().to_string() });
        }
        fs::remove_dir(path).map_err(|e| VfsError::io(path, e))
    }

    /// Path as seen from inside the mount, e.g. `/docs/readme.txt`.
    pub fn display_path(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(relative) => format!("/{}", relative.display()),
            Err(_) => path.display().to_string(),
        }
    }
}
