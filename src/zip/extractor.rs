use super::error::{ZipError, ZipResult};
use super::parser::ZipParser;
use super::stream::EntryReader;
use super::structures::ZipFileEntry;

/// An archive held entirely in memory.
///
/// The central directory is parsed once in [`ZipArchive::new`]; entries are
/// then extracted lazily, any number of times, from the shared read-only
/// buffer. `B` can be an owned `Vec<u8>` or a borrowed `&[u8]`.
#[derive(Debug, Clone)]
pub struct ZipArchive<B: AsRef<[u8]> = Vec<u8>> {
    data: B,
    entries: Vec<ZipFileEntry>,
    comment: String,
}

impl<B: AsRef<[u8]>> ZipArchive<B> {
    /// Parse the central directory of `data`.
    ///
    /// # Errors
    ///
    /// Any [`ZipError`] format variant; no partial archive is returned.
    pub fn new(data: B) -> ZipResult<Self> {
        let (entries, comment) = ZipParser::new(data.as_ref()).list_files()?;
        Ok(Self {
            data,
            entries,
            comment,
        })
    }

    /// All entries in central directory order.
    pub fn list_entries(&self) -> &[ZipFileEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Archive comment from the end of central directory record.
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// First entry whose name matches exactly.
    ///
    /// Duplicate names are possible; later ones are shadowed.
    pub fn by_name(&self, name: &str) -> Option<&ZipFileEntry> {
        self.entries.iter().find(|e| e.file_name == name)
    }

    /// Open a reader for the entry called `name`.
    ///
    /// Returns `Ok(None)` when there is no such entry.
    pub fn extract(&self, name: &str) -> ZipResult<Option<EntryReader<'_>>> {
        match self.by_name(name) {
            Some(entry) => self.extract_entry(entry).map(Some),
            None => Ok(None),
        }
    }

    /// Open a reader for `entry`.
    ///
    /// Re-reads the local file header on every call; nothing is cached.
    ///
    /// # Errors
    ///
    /// * [`ZipError::Encrypted`] if the entry is encrypted
    /// * [`ZipError::Format`] if the local header is missing or corrupt
    /// * [`ZipError::UnsupportedMethod`] for methods other than stored/deflate
    pub fn extract_entry<'a>(&'a self, entry: &'a ZipFileEntry) -> ZipResult<EntryReader<'a>> {
        if entry.encrypted {
            return Err(ZipError::Encrypted(entry.file_name.clone()));
        }

        let data = self.data.as_ref();
        let range = ZipParser::new(data).data_range(entry)?;
        EntryReader::new(entry, &data[range])
    }

    /// Extract `name` fully into memory.
    pub fn read_to_vec(&self, name: &str) -> ZipResult<Option<Vec<u8>>> {
        match self.extract(name)? {
            Some(reader) => reader.read_to_vec().map(Some),
            None => Ok(None),
        }
    }

    /// The raw archive bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_ref()
    }

    pub fn into_inner(self) -> B {
        self.data
    }
}
