// src/fs/archive.rs

use flate2::read::GzDecoder;
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

const BLOCK_SIZE: usize = 512;
const USTAR_MAGIC: &[u8] = b"ustar";
const S_IFMT: u32 = 0o170000;
const S_IFLNK: u32 = 0o120000;

/// Archive decoding errors
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("archive is empty")]
    Empty,

    #[error("archive length {len} is not a multiple of {BLOCK_SIZE} bytes")]
    Misaligned { len: usize },

    #[error("not a tar or zip archive (no ustar magic at offset {offset})")]
    BadMagic { offset: usize },

    #[error("invalid header checksum at offset {offset}")]
    Checksum { offset: usize },

    #[error("unexpected end of archive while reading '{path}'")]
    Truncated { path: String },

    #[error("missing end-of-archive marker")]
    Unterminated,

    #[error("zip: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// What an archive entry describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink(String),
    /// Hard links, devices, fifos and anything else we do not materialize.
    Other(u8),
}

/// One decoded entry, independent of the container format.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    pub path: String,
    pub content: Vec<u8>,
    pub kind: EntryKind,
}

impl ArchiveEntry {
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Decode a zip, gzip-compressed tar, or plain tar, picked by magic bytes.
pub fn decode_archive(data: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    if is_zip(data) {
        parse_zip(data)
    } else if is_gzip(data) {
        parse_archive(&decompress_gzip(data)?)
    } else {
        parse_archive(data)
    }
}

/// Sum of all header bytes, with the checksum field (148..156) counted as spaces.
fn calculate_checksum(header: &[u8; BLOCK_SIZE]) -> u32 {
    header
        .iter()
        .enumerate()
        .map(|(i, &b)| if (148..156).contains(&i) { 0x20 } else { b as u32 })
        .sum()
}

/// Read a null-terminated string from a fixed-size field.
fn read_string(header: &[u8], offset: usize, len: usize) -> String {
    let slice = &header[offset..offset + len];
    let end = slice.iter().position(|&b| b == 0).unwrap_or(len);
    String::from_utf8_lossy(&slice[..end]).to_string()
}

/// Read an octal ASCII value from a fixed-size field.
fn read_octal(header: &[u8], offset: usize, len: usize) -> u64 {
    let s = read_string(header, offset, len);
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0;
    }
    u64::from_str_radix(trimmed, 8).unwrap_or(0)
}

fn is_zero_block(block: &[u8]) -> bool {
    block.iter().all(|&b| b == 0)
}

fn verify_checksum(header: &[u8; BLOCK_SIZE]) -> bool {
    read_octal(header, 148, 8) as u32 == calculate_checksum(header)
}

/// Pull the `path` record out of a pax extended header body.
/// Records look like `"<len> <key>=<value>\n"`.
fn pax_path(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    text.lines().find_map(|record| {
        let (_, kv) = record.split_once(' ')?;
        kv.strip_prefix("path=").map(str::to_string)
    })
}

/// Parse a tar archive into entries.
///
/// The input must be whole 512-byte blocks, start with a ustar header and
/// end with at least one zero block.
pub fn parse_archive(data: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    if data.is_empty() {
        return Err(ArchiveError::Empty);
    }
    if data.len() % BLOCK_SIZE != 0 {
        return Err(ArchiveError::Misaligned { len: data.len() });
    }

    let mut entries = Vec::new();
    let mut offset = 0;
    let mut zero_blocks = 0;
    let mut seen_header = false;
    let mut long_name: Option<String> = None;

    while offset + BLOCK_SIZE <= data.len() {
        let block = &data[offset..offset + BLOCK_SIZE];

        if is_zero_block(block) {
            zero_blocks += 1;
            offset += BLOCK_SIZE;
            if zero_blocks >= 2 {
                break;
            }
            continue;
        }
        zero_blocks = 0;

        let mut header = [0u8; BLOCK_SIZE];
        header.copy_from_slice(block);

        if !verify_checksum(&header) {
            return Err(ArchiveError::Checksum { offset });
        }
        if !seen_header && &header[257..262] != USTAR_MAGIC {
            return Err(ArchiveError::BadMagic { offset });
        }
        seen_header = true;

        let name = read_string(&header, 0, 100);
        let prefix = read_string(&header, 345, 155);
        let header_path = if prefix.is_empty() {
            name
        } else {
            format!("{}/{}", prefix, name)
        };

        let size = read_octal(&header, 124, 12) as usize;
        let type_flag = header[156];

        offset += BLOCK_SIZE;

        let end = offset + size;
        if end > data.len() {
            return Err(ArchiveError::Truncated { path: header_path });
        }
        let body = &data[offset..end];
        offset += size.div_ceil(BLOCK_SIZE) * BLOCK_SIZE;

        let kind = match type_flag {
            b'L' => {
                let end = body.iter().position(|&b| b == 0).unwrap_or(body.len());
                long_name = Some(String::from_utf8_lossy(&body[..end]).to_string());
                continue;
            }
            b'x' => {
                if let Some(path) = pax_path(body) {
                    long_name = Some(path);
                }
                continue;
            }
            b'g' => continue,
            b'0' | 0 | b'7' => EntryKind::File,
            b'5' => EntryKind::Directory,
            b'2' => EntryKind::Symlink(read_string(&header, 157, 100)),
            other => EntryKind::Other(other),
        };

        let content = if kind == EntryKind::File {
            body.to_vec()
        } else {
            Vec::new()
        };

        entries.push(ArchiveEntry {
            path: long_name.take().unwrap_or(header_path),
            content,
            kind,
        });
    }

    if zero_blocks == 0 {
        return Err(ArchiveError::Unterminated);
    }

    Ok(entries)
}

/// Parse a zip archive into entries. Symlinks are recognized from the
/// unix mode bits; their stored content is the link target.
pub fn parse_zip(data: &[u8]) -> Result<Vec<ArchiveEntry>, ArchiveError> {
    let mut archive = ZipArchive::new(Cursor::new(data))?;
    let mut entries = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let path = file.name().to_string();

        if file.is_dir() {
            entries.push(ArchiveEntry { path, content: Vec::new(), kind: EntryKind::Directory });
            continue;
        }

        let mut content = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut content)?;

        let is_symlink = file.unix_mode().is_some_and(|mode| mode & S_IFMT == S_IFLNK);
        let entry = if is_symlink {
            let target = String::from_utf8_lossy(&content).into_owned();
            ArchiveEntry { path, content: Vec::new(), kind: EntryKind::Symlink(target) }
        } else {
            ArchiveEntry { path, content, kind: EntryKind::File }
        };
        entries.push(entry);
    }

    Ok(entries)
}

/// Decompress gzip data.
pub fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let mut decoder = GzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(decompressed)
}

/// Check if data is gzip compressed (magic bytes 0x1f 0x8b).
pub fn is_gzip(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0x1f && data[1] == 0x8b
}

/// Check for a zip local file header, or the end record of an empty zip.
pub fn is_zip(data: &[u8]) -> bool {
    data.starts_with(b"PK\x03\x04") || data.starts_with(b"PK\x05\x06")
}

/// Archive builders for tests.
#[cfg(test)]
pub(crate) mod writer {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    impl ArchiveEntry {
        pub fn file(path: &str, content: &[u8]) -> Self {
            Self { path: path.to_string(), content: content.to_vec(), kind: EntryKind::File }
        }

        pub fn directory(path: &str) -> Self {
            Self { path: path.to_string(), content: Vec::new(), kind: EntryKind::Directory }
        }
    }

    fn write_string(header: &mut [u8], offset: usize, len: usize, s: &str) {
        let bytes = s.as_bytes();
        let copy_len = bytes.len().min(len);
        header[offset..offset + copy_len].copy_from_slice(&bytes[..copy_len]);
    }

    fn write_octal(header: &mut [u8], offset: usize, len: usize, value: u64) {
        let s = format!("{:0>width$o}", value, width = len - 1);
        let bytes = s.as_bytes();
        let start = bytes.len().saturating_sub(len - 1);
        let slice = &bytes[start..];
        header[offset..offset + slice.len()].copy_from_slice(slice);
        header[offset + slice.len()] = 0;
    }

    /// Split into ustar (prefix, name); prefix max 155, name max 100.
    fn split_path(path: &str) -> Option<(String, String)> {
        if path.len() <= 100 {
            return Some((String::new(), path.to_string()));
        }
        for (i, c) in path.char_indices() {
            if c == '/' && i <= 155 && path.len() - i - 1 <= 100 {
                return Some((path[..i].to_string(), path[i + 1..].to_string()));
            }
        }
        None
    }

    fn build_header(path: &str, entry: &ArchiveEntry, type_flag: u8, size: u64) -> [u8; BLOCK_SIZE] {
        let mut header = [0u8; BLOCK_SIZE];
        let (prefix, name) = split_path(path).unwrap_or_else(|| {
            let mut cut = 100.min(path.len());
            while !path.is_char_boundary(cut) {
                cut -= 1;
            }
            (String::new(), path[..cut].to_string())
        });
        let mode = if entry.is_directory() { 0o755 } else { 0o644 };

        write_string(&mut header, 0, 100, &name);
        write_octal(&mut header, 100, 8, mode);
        write_octal(&mut header, 108, 8, 0);
        write_octal(&mut header, 116, 8, 0);
        write_octal(&mut header, 124, 12, size);
        write_octal(&mut header, 136, 12, 0);
        header[148..156].copy_from_slice(b"        ");
        header[156] = type_flag;
        if let EntryKind::Symlink(target) = &entry.kind {
            write_string(&mut header, 157, 100, target);
        }
        header[257..263].copy_from_slice(b"ustar\0");
        header[263..265].copy_from_slice(b"00");
        write_string(&mut header, 345, 155, &prefix);

        let checksum = calculate_checksum(&header);
        let cksum_str = format!("{:06o}\0 ", checksum);
        header[148..156].copy_from_slice(&cksum_str.as_bytes()[..8]);
        header
    }

    fn push_padded(archive: &mut Vec<u8>, content: &[u8]) {
        archive.extend_from_slice(content);
        let remainder = content.len() % BLOCK_SIZE;
        if remainder != 0 {
            archive.resize(archive.len() + BLOCK_SIZE - remainder, 0);
        }
    }

    /// Build a ustar archive. Paths that do not fit the name/prefix fields
    /// go behind a GNU long-name record.
    pub fn create_archive(entries: &[ArchiveEntry]) -> Vec<u8> {
        let mut archive = Vec::new();

        for entry in entries {
            let mut path = entry.path.clone();
            if entry.is_directory() && !path.ends_with('/') {
                path.push('/');
            }

            if split_path(&path).is_none() {
                let long = ArchiveEntry::file("././@LongLink", path.as_bytes());
                let mut name = path.as_bytes().to_vec();
                name.push(0);
                archive.extend_from_slice(&build_header("././@LongLink", &long, b'L', name.len() as u64));
                push_padded(&mut archive, &name);
            }

            let (type_flag, size) = match &entry.kind {
                EntryKind::File => (b'0', entry.content.len() as u64),
                EntryKind::Directory => (b'5', 0),
                EntryKind::Symlink(_) => (b'2', 0),
                EntryKind::Other(flag) => (*flag, 0),
            };
            archive.extend_from_slice(&build_header(&path, entry, type_flag, size));

            if entry.kind == EntryKind::File {
                push_padded(&mut archive, &entry.content);
            }
        }

        archive.resize(archive.len() + BLOCK_SIZE * 2, 0);
        archive
    }

    /// Build a deflated zip. Directory names get a trailing `/`.
    pub fn create_zip(entries: &[ArchiveEntry]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for entry in entries {
            match &entry.kind {
                EntryKind::Directory => writer.add_directory(entry.path.as_str(), options).unwrap(),
                _ => {
                    writer.start_file(entry.path.as_str(), options).unwrap();
                    writer.write_all(&entry.content).unwrap();
                }
            }
        }
        writer.finish().unwrap().into_inner()
    }

    pub fn compress_gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::new(6));
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }
}
