//! ZIP archive parsing and extraction.
//!
//! This module reads ZIP archives that are already fully resident in
//! memory: the central directory is parsed up front, and entry data is
//! decompressed lazily on request.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from raw bytes
//! - [`extractor`]: [`ZipArchive`], the high-level API for end users
//! - [`stream`]: [`EntryReader`], the lazy per-entry output stream
//! - [`error`]: [`ZipError`] and its format/unsupported classification
//!
//! ## ZIP Format Overview
//!
//! A ZIP file consists of:
//! 1. Local file headers and compressed data for each file
//! 2. Central Directory with metadata for all files
//! 3. End of Central Directory (EOCD) record at the end
//!
//! ## Supported Features
//!
//! - STORED (no compression) method
//! - DEFLATE compression method
//! - CRC-32 and size verification of extracted data
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No ZIP64 extensions
//! - No BZIP2, LZMA, or other compression methods

mod error;
mod extractor;
mod parser;
mod stream;
mod structures;

pub use error::{ZipError, ZipResult};
pub use extractor::ZipArchive;
pub use parser::ZipParser;
pub use stream::{Chunks, DEFAULT_CHUNK_SIZE, EntryReader};
pub use structures::*;
