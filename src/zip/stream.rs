//! Lazy, single-pass readers over an entry's data.

use std::fmt;
use std::io::{self, Read};

use crc32fast::Hasher;
use flate2::bufread::DeflateDecoder;

use super::error::{ZipError, ZipResult};
use super::structures::{CompressionMethod, ZipFileEntry};

/// Default chunk size for [`EntryReader::chunks`].
pub const DEFAULT_CHUNK_SIZE: usize = 8 * 1024;

enum Body<'a> {
    Stored(&'a [u8]),
    Deflate(DeflateDecoder<&'a [u8]>),
}

/// Decompressing reader for one archive entry.
///
/// Borrows the archive buffer, so it cannot outlive the
/// [`ZipArchive`](super::ZipArchive) it came from. Output is produced on
/// demand and only once: reading the entry again means calling
/// [`extract`](super::ZipArchive::extract) again. Dropping a partially
/// read reader is always safe.
///
/// When the data ends, the byte count and CRC-32 are checked against the
/// central directory; a mismatch is reported as the final error.
pub struct EntryReader<'a> {
    entry: &'a ZipFileEntry,
    body: Body<'a>,
    hasher: Hasher,
    produced: u64,
    finished: bool,
}

impl fmt::Debug for EntryReader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryReader")
            .field("name", &self.entry.file_name)
            .field("method", &self.entry.compression_method)
            .field("produced", &self.produced)
            .finish_non_exhaustive()
    }
}

impl<'a> EntryReader<'a> {
    /// Wrap the raw data slice of `entry`.
    ///
    /// # Errors
    ///
    /// [`ZipError::UnsupportedMethod`] for anything but stored or deflate.
    pub(crate) fn new(entry: &'a ZipFileEntry, raw: &'a [u8]) -> ZipResult<Self> {
        let body = match entry.compression_method {
            CompressionMethod::Stored => Body::Stored(raw),
            CompressionMethod::Deflate => Body::Deflate(DeflateDecoder::new(raw)),
            CompressionMethod::Unknown(method) => return Err(ZipError::UnsupportedMethod(method)),
        };

        Ok(Self {
            entry,
            body,
            hasher: Hasher::new(),
            produced: 0,
            finished: false,
        })
    }

    /// The entry being read.
    pub fn entry(&self) -> &'a ZipFileEntry {
        self.entry
    }

    /// Bytes produced so far.
    pub fn produced(&self) -> u64 {
        self.produced
    }

    /// Fill `buf` with the next output bytes; `Ok(0)` means end of data.
    pub fn read_chunk(&mut self, buf: &mut [u8]) -> ZipResult<usize> {
        if self.finished || buf.is_empty() {
            return Ok(0);
        }

        let result = match &mut self.body {
            Body::Stored(data) => data.read(buf),
            Body::Deflate(decoder) => decoder.read(buf),
        };
        let n = match result {
            Ok(n) => n,
            Err(e) => {
                self.finished = true;
                return Err(ZipError::format(format!(
                    "corrupt deflate stream in '{}': {}",
                    self.entry.file_name, e
                )));
            }
        };

        if n == 0 {
            self.finished = true;
            return self.verify().map(|_| 0);
        }

        self.hasher.update(&buf[..n]);
        self.produced += n as u64;
        if self.produced > self.entry.uncompressed_size {
            self.finished = true;
            return Err(self.size_mismatch());
        }

        Ok(n)
    }

    /// Drain the rest of the entry into a vector.
    pub fn read_to_vec(mut self) -> ZipResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.entry.uncompressed_size.min(1 << 20) as usize);
        let mut buf = [0u8; DEFAULT_CHUNK_SIZE];
        loop {
            match self.read_chunk(&mut buf)? {
                0 => return Ok(out),
                n => out.extend_from_slice(&buf[..n]),
            }
        }
    }

    /// Turn the reader into a pull iterator of chunks of at most
    /// `chunk_size` bytes.
    pub fn chunks(self, chunk_size: usize) -> Chunks<'a> {
        Chunks {
            reader: self,
            chunk_size: chunk_size.max(1),
            done: false,
        }
    }

    fn verify(&self) -> ZipResult<()> {
        if self.produced != self.entry.uncompressed_size {
            return Err(self.size_mismatch());
        }

        let actual = self.hasher.clone().finalize();
        if actual != self.entry.crc32 {
            return Err(ZipError::ChecksumMismatch {
                name: self.entry.file_name.clone(),
                expected: self.entry.crc32,
                actual,
            });
        }

        Ok(())
    }

    fn size_mismatch(&self) -> ZipError {
        ZipError::SizeMismatch {
            name: self.entry.file_name.clone(),
            expected: self.entry.uncompressed_size,
            actual: self.produced,
        }
    }
}

impl Read for EntryReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_chunk(buf)?)
    }
}

/// Iterator returned by [`EntryReader::chunks`].
///
/// Yields `Ok` chunks until the data ends, or a single `Err` after which
/// it is exhausted.
#[derive(Debug)]
pub struct Chunks<'a> {
    reader: EntryReader<'a>,
    chunk_size: usize,
    done: bool,
}

impl Iterator for Chunks<'_> {
    type Item = ZipResult<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buf = vec![0u8; self.chunk_size];
        match self.reader.read_chunk(&mut buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(n) => {
                buf.truncate(n);
                Some(Ok(buf))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Chunks<'_> {}
