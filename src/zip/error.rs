//! Error type for archive parsing and entry extraction.

use std::io;

/// Result alias used throughout the [`zip`](super) module.
pub type ZipResult<T> = Result<T, ZipError>;

/// Errors produced while opening an archive or extracting an entry.
///
/// Variants fall into two groups:
///
/// | Group | Variants | Effect |
/// |-------|----------|--------|
/// | Format | [`Format`][Self::Format], [`Truncated`][Self::Truncated], [`ChecksumMismatch`][Self::ChecksumMismatch], [`SizeMismatch`][Self::SizeMismatch] | The bytes are corrupt |
/// | Unsupported | [`UnsupportedMethod`][Self::UnsupportedMethod], [`Encrypted`][Self::Encrypted] | Well-formed, but not handled |
///
/// A missing entry is not an error: lookups return `Ok(None)`.
#[derive(Debug, thiserror::Error)]
pub enum ZipError {
    /// A record is missing or carries the wrong signature.
    #[error("not a valid archive: {0}")]
    Format(String),

    /// A fixed-size read ran past the end of the buffer.
    #[error("not a valid archive: truncated record ({0})")]
    Truncated(#[from] io::Error),

    /// The produced bytes do not hash to the declared CRC-32.
    #[error("checksum mismatch for '{name}': expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    /// The produced byte count differs from the declared uncompressed size.
    #[error("size mismatch for '{name}': expected {expected} bytes, got {actual}")]
    SizeMismatch {
        name: String,
        expected: u64,
        actual: u64,
    },

    /// Compression method other than stored (0) or deflate (8).
    #[error("unsupported compression method: {0}")]
    UnsupportedMethod(u16),

    /// The entry has the encryption flag set.
    #[error("encrypted entries not supported: '{0}'")]
    Encrypted(String),
}

impl ZipError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ZipError::Format(msg.into())
    }

    /// Returns true for structural corruption of any kind.
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            ZipError::Format(_)
                | ZipError::Truncated(_)
                | ZipError::ChecksumMismatch { .. }
                | ZipError::SizeMismatch { .. }
        )
    }

    /// Returns true for well-formed entries that use a feature this reader lacks.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, ZipError::UnsupportedMethod(_) | ZipError::Encrypted(_))
    }
}

impl From<ZipError> for io::Error {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Truncated(inner) => inner,
            ZipError::UnsupportedMethod(_) | ZipError::Encrypted(_) => {
                io::Error::new(io::ErrorKind::Unsupported, err)
            }
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}
