//! # memunzip
//!
//! An in-memory ZIP archive reader with lazy per-entry extraction.
//!
//! The whole archive is handed over as one byte buffer. Opening it locates
//! the end of central directory record and parses every central directory
//! entry up front; extracting an entry re-reads its local file header and
//! streams the stored or deflated bytes out of the shared buffer.
//!
//! ## Features
//!
//! - Parse archives held in a `Vec<u8>` or borrowed `&[u8]`
//! - STORED (uncompressed) and DEFLATE entries
//! - Lazy, single-pass [`EntryReader`] with CRC-32 and size checks
//! - Load archives from the local filesystem or over HTTP(S)
//!
//! ## Example
//!
//! ```no_run
//! use memunzip::ZipArchive;
//!
//! fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("archive.zip")?;
//!     let archive = ZipArchive::new(bytes)?;
//!
//!     for entry in archive.list_entries() {
//!         println!("{} ({} bytes)", entry.file_name, entry.uncompressed_size);
//!     }
//!
//!     if let Some(reader) = archive.extract("readme.txt")? {
//!         let text = reader.read_to_vec()?;
//!         println!("{}", String::from_utf8_lossy(&text));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod io;
pub mod logger;
pub mod zip;

pub use cli::Cli;
pub use io::{ArchiveSource, HttpSource, LocalFileSource};
pub use zip::{EntryReader, ZipArchive, ZipError, ZipFileEntry};
