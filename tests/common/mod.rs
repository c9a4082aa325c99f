//! Hand-assembled ZIP archives for the integration tests.

#![allow(dead_code)]

use std::io::Write;

use flate2::Compression;
use flate2::write::DeflateEncoder;

/// 2024-03-15 13:45:30 in DOS format.
pub const DOS_DATE: u16 = ((2024 - 1980) << 9) | (3 << 5) | 15;
pub const DOS_TIME: u16 = (13 << 11) | (45 << 5) | 15;

pub struct FileSpec {
    pub name: String,
    pub method: u16,
    pub flags: u16,
    pub data: Vec<u8>,
    pub payload: Vec<u8>,
    pub local_extra: Vec<u8>,
    pub central_extra: Vec<u8>,
    pub comment: Vec<u8>,
    pub crc32: u32,
}

/// Builds archives the way a regular ZIP writer lays them out:
/// local headers and data, then the central directory, then the trailer.
#[derive(Default)]
pub struct ZipBuilder {
    files: Vec<FileSpec>,
    comment: Vec<u8>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, 0, data, data.to_vec())
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.raw(name, 8, data, deflate(data))
    }

    pub fn directory(self, name: &str) -> Self {
        self.raw(name, 0, b"", Vec::new())
    }

    /// Add an entry with an explicit method code and payload bytes.
    pub fn raw(mut self, name: &str, method: u16, data: &[u8], payload: Vec<u8>) -> Self {
        self.files.push(FileSpec {
            name: name.to_string(),
            method,
            flags: 0,
            data: data.to_vec(),
            payload,
            local_extra: Vec::new(),
            central_extra: Vec::new(),
            comment: Vec::new(),
            crc32: crc32fast::hash(data),
        });
        self
    }

    /// Adjust the most recently added entry.
    pub fn with_last(mut self, f: impl FnOnce(&mut FileSpec)) -> Self {
        if let Some(last) = self.files.last_mut() {
            f(last);
        }
        self
    }

    pub fn comment(mut self, comment: &[u8]) -> Self {
        self.comment = comment.to_vec();
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut offsets = Vec::new();

        for file in &self.files {
            offsets.push(out.len() as u32);
            put(&mut out, b"PK\x03\x04");
            put(&mut out, &20u16.to_le_bytes());
            put(&mut out, &file.flags.to_le_bytes());
            put(&mut out, &file.method.to_le_bytes());
            put(&mut out, &DOS_TIME.to_le_bytes());
            put(&mut out, &DOS_DATE.to_le_bytes());
            put(&mut out, &file.crc32.to_le_bytes());
            put(&mut out, &(file.payload.len() as u32).to_le_bytes());
            put(&mut out, &(file.data.len() as u32).to_le_bytes());
            put(&mut out, &(file.name.len() as u16).to_le_bytes());
            put(&mut out, &(file.local_extra.len() as u16).to_le_bytes());
            put(&mut out, file.name.as_bytes());
            put(&mut out, &file.local_extra);
            put(&mut out, &file.payload);
        }

        let cd_offset = out.len() as u32;
        for (file, offset) in self.files.iter().zip(offsets) {
            put(&mut out, b"PK\x01\x02");
            put(&mut out, &20u16.to_le_bytes());
            put(&mut out, &20u16.to_le_bytes());
            put(&mut out, &file.flags.to_le_bytes());
            put(&mut out, &file.method.to_le_bytes());
            put(&mut out, &DOS_TIME.to_le_bytes());
            put(&mut out, &DOS_DATE.to_le_bytes());
            put(&mut out, &file.crc32.to_le_bytes());
            put(&mut out, &(file.payload.len() as u32).to_le_bytes());
            put(&mut out, &(file.data.len() as u32).to_le_bytes());
            put(&mut out, &(file.name.len() as u16).to_le_bytes());
            put(&mut out, &(file.central_extra.len() as u16).to_le_bytes());
            put(&mut out, &(file.comment.len() as u16).to_le_bytes());
            put(&mut out, &0u16.to_le_bytes());
            put(&mut out, &0u16.to_le_bytes());
            put(&mut out, &0u32.to_le_bytes());
            put(&mut out, &offset.to_le_bytes());
            put(&mut out, file.name.as_bytes());
            put(&mut out, &file.central_extra);
            put(&mut out, &file.comment);
        }
        let cd_size = out.len() as u32 - cd_offset;

        let count = self.files.len() as u16;
        put(&mut out, b"PK\x05\x06");
        put(&mut out, &0u16.to_le_bytes());
        put(&mut out, &0u16.to_le_bytes());
        put(&mut out, &count.to_le_bytes());
        put(&mut out, &count.to_le_bytes());
        put(&mut out, &cd_size.to_le_bytes());
        put(&mut out, &cd_offset.to_le_bytes());
        put(&mut out, &(self.comment.len() as u16).to_le_bytes());
        put(&mut out, &self.comment);

        out
    }
}

pub fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn put(out: &mut Vec<u8>, bytes: &[u8]) {
    out.extend_from_slice(bytes);
}

/// The three-file flat archive used across tests.
pub fn flat_archive() -> Vec<u8> {
    ZipBuilder::new()
        .stored("file1.txt", b"Hello, World!\n")
        .stored("file2.txt", b"This is file number 2")
        .deflated("file3.txt", b"Line 1\nLine 2\nLine 3\n")
        .build()
}

/// A directory entry plus one file inside it.
pub fn nested_archive() -> Vec<u8> {
    ZipBuilder::new()
        .directory("subdir/")
        .stored("subdir/nested.txt", b"Nested file content\n")
        .build()
}
