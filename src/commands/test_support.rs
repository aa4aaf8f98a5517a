// Shared fixture for handler tests: a small archive mounted into a temp dir.

use std::fs;

use tempfile::TempDir;

use crate::fs::archive::writer::create_archive;
use crate::fs::archive::ArchiveEntry;
use crate::fs::VirtualFilesystem;
use crate::session::{Identity, Session};

pub(crate) struct Fixture {
    pub fs: VirtualFilesystem,
    pub session: Session,
    // Dropped last; removes the mount.
    pub _tmp: TempDir,
}

pub(crate) fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let archive = tmp.path().join("fs.tar");
    let data = create_archive(&[
        ArchiveEntry::directory("docs"),
        ArchiveEntry::file("docs/a.txt", b"abc"),
        ArchiveEntry::file("docs/b.txt", b"1234567"),
        ArchiveEntry::directory("docs/empty"),
        ArchiveEntry::directory("empty"),
        ArchiveEntry::file("notes.txt", b"sample\n"),
        ArchiveEntry::file("poem.txt", b"roses are red  \nviolets\t\n\nblue\n"),
        ArchiveEntry::file("ls extra", b"not a command\n"),
    ]);
    fs::write(&archive, data).unwrap();

    let fs = VirtualFilesystem::mount(&archive, &tmp.path().join("mnt")).unwrap();
    let session = Session::new(fs.root().to_path_buf(), Identity::default());
    Fixture { fs, session, _tmp: tmp }
}
