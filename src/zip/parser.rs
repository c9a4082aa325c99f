//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures
//! directly out of an in-memory buffer.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) near the buffer's end
//! 2. Walk the Central Directory to get metadata for all files
//! 3. For extraction, re-read each file's Local File Header to find
//!    where its data starts
//!
//! Every read is bounds-checked against the buffer; running off the end
//! surfaces as [`ZipError::Truncated`] rather than a panic.

use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::ops::Range;

use super::error::{ZipError, ZipResult};
use super::structures::*;

/// Low-level ZIP parser borrowing the archive bytes.
///
/// Typically used through [`ZipArchive`](super::ZipArchive) rather than
/// directly.
///
/// ## Example
///
/// ```ignore
/// let parser = ZipParser::new(&bytes);
/// let (entries, _comment) = parser.list_files()?;
/// for entry in &entries {
///     let range = parser.data_range(entry)?;
///     // Slice the entry payload out of `bytes`...
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ZipParser<'a> {
    /// The whole archive
    data: &'a [u8],
}

impl<'a> ZipParser<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// Scans backward from `len - 22` down to `len - 22 - 65535` (or the
    /// start of the buffer) and takes the first signature match. The
    /// comment length is not checked against the bytes that follow.
    ///
    /// # Returns
    ///
    /// A tuple of (EOCD record, offset of EOCD in the buffer).
    ///
    /// # Errors
    ///
    /// [`ZipError::Format`] if no signature is found in the window.
    pub fn find_eocd(&self) -> ZipResult<(EndOfCentralDirectory, usize)> {
        let size = EndOfCentralDirectory::SIZE;
        if self.data.len() < size {
            return Err(ZipError::format("buffer too small for end of central directory"));
        }

        let last = self.data.len() - size;
        let first = last.saturating_sub(MAX_COMMENT_SIZE);

        for i in (first..=last).rev() {
            if &self.data[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                let eocd = EndOfCentralDirectory::from_bytes(&self.data[i..i + size])?;
                log::debug!(
                    "found end of central directory at {} ({} entries)",
                    i,
                    eocd.total_entries
                );
                return Ok((eocd, i));
            }
        }

        Err(ZipError::format("end of central directory not found"))
    }

    /// List all files in the ZIP archive.
    ///
    /// Walks exactly `total_entries` Central Directory records starting at
    /// the declared offset. The declared directory size is not used to
    /// bound the walk.
    ///
    /// # Returns
    ///
    /// The entries in directory order, and the archive comment.
    ///
    /// # Errors
    ///
    /// [`ZipError::Format`] on a signature mismatch,
    /// [`ZipError::Truncated`] when a record runs past the buffer.
    pub fn list_files(&self) -> ZipResult<(Vec<ZipFileEntry>, String)> {
        let (eocd, eocd_offset) = self.find_eocd()?;

        let comment_start = eocd_offset + EndOfCentralDirectory::SIZE;
        let comment_end = (comment_start + eocd.comment_len as usize).min(self.data.len());
        let comment = String::from_utf8_lossy(&self.data[comment_start..comment_end]).into_owned();

        let mut cursor = Cursor::new(self.data);
        cursor.set_position(eocd.cd_offset as u64);

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        for _ in 0..eocd.total_entries {
            entries.push(self.parse_cdfh(&mut cursor)?);
        }

        log::debug!(
            "parsed {} central directory entries (offset {}, size {})",
            entries.len(),
            eocd.cd_offset,
            eocd.cd_size
        );

        Ok((entries, comment))
    }

    /// Parse a Central Directory File Header from a cursor.
    ///
    /// Leaves the cursor at the start of the next record, i.e. advanced by
    /// `46 + name + extra + comment` bytes.
    fn parse_cdfh(&self, cursor: &mut Cursor<&'a [u8]>) -> ZipResult<ZipFileEntry> {
        let record_offset = cursor.position();

        // Read and verify the signature (PK\x01\x02)
        let mut sig = [0u8; 4];
        cursor.read_exact(&mut sig)?;
        if sig != CDFH_SIGNATURE {
            return Err(ZipError::format(format!(
                "invalid central directory file header at offset {}",
                record_offset
            )));
        }

        let _version_made_by = cursor.read_u16::<LittleEndian>()?;
        let _version_needed = cursor.read_u16::<LittleEndian>()?;
        let flags = cursor.read_u16::<LittleEndian>()?;
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        let last_mod_time = cursor.read_u16::<LittleEndian>()?;
        let last_mod_date = cursor.read_u16::<LittleEndian>()?;
        let crc32 = cursor.read_u32::<LittleEndian>()?;
        let compressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let uncompressed_size = cursor.read_u32::<LittleEndian>()? as u64;
        let file_name_length = cursor.read_u16::<LittleEndian>()?;
        let extra_field_length = cursor.read_u16::<LittleEndian>()?;
        let file_comment_length = cursor.read_u16::<LittleEndian>()?;
        let _disk_number_start = cursor.read_u16::<LittleEndian>()?;
        let _internal_attrs = cursor.read_u16::<LittleEndian>()?;
        let _external_attrs = cursor.read_u32::<LittleEndian>()?;
        let lfh_offset = cursor.read_u32::<LittleEndian>()? as u64;

        let mut file_name_bytes = vec![0u8; file_name_length as usize];
        cursor.read_exact(&mut file_name_bytes)?;
        // Lossy so that non-UTF-8 names still list
        let file_name = String::from_utf8_lossy(&file_name_bytes).into_owned();

        // Extra fields carry nothing this reader uses
        cursor.set_position(cursor.position() + extra_field_length as u64);

        let mut comment_bytes = vec![0u8; file_comment_length as usize];
        cursor.read_exact(&mut comment_bytes)?;
        let comment = String::from_utf8_lossy(&comment_bytes).into_owned();

        let is_directory = file_name.ends_with('/');

        Ok(ZipFileEntry {
            file_name,
            comment,
            encrypted: flags & FLAG_ENCRYPTED != 0,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            uncompressed_size,
            crc32,
            lfh_offset,
            last_mod_time,
            last_mod_date,
            last_modified: dos_datetime(last_mod_date, last_mod_time),
            is_directory,
        })
    }

    /// Get the byte range of an entry's stored (possibly compressed) data.
    ///
    /// The Local File Header has its own filename and extra field lengths,
    /// which may differ from the Central Directory copy, so it is re-read
    /// here on every call.
    ///
    /// # Errors
    ///
    /// [`ZipError::Format`] if the LFH signature is wrong or the data
    /// range lies outside the buffer.
    pub fn data_range(&self, entry: &ZipFileEntry) -> ZipResult<Range<usize>> {
        let lfh_offset = usize::try_from(entry.lfh_offset)
            .map_err(|_| ZipError::format("local header offset out of range"))?;
        let lfh = self
            .data
            .get(lfh_offset..)
            .and_then(|rest| rest.get(..LFH_SIZE))
            .ok_or_else(|| {
                ZipError::format(format!(
                    "local file header for '{}' lies outside the archive",
                    entry.file_name
                ))
            })?;

        // Verify LFH signature (PK\x03\x04)
        if &lfh[0..4] != LFH_SIGNATURE {
            return Err(ZipError::format(format!(
                "invalid local file header for '{}' at offset {}",
                entry.file_name, lfh_offset
            )));
        }

        let mut cursor = Cursor::new(lfh);
        cursor.set_position(26); // Offset to filename length field
        let file_name_length = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_field_length = cursor.read_u16::<LittleEndian>()? as usize;

        // Data starts after: LFH (30 bytes) + filename + extra field
        let start = lfh_offset + LFH_SIZE + file_name_length + extra_field_length;
        let end = usize::try_from(entry.compressed_size)
            .ok()
            .and_then(|len| start.checked_add(len))
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                ZipError::format(format!(
                    "data for '{}' extends past the end of the archive",
                    entry.file_name
                ))
            })?;

        Ok(start..end)
    }

    /// The bytes this parser reads from.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }
}
