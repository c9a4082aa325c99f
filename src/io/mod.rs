mod http;
mod local;

pub use http::HttpSource;
pub use local::LocalFileSource;

use anyhow::Result;
use async_trait::async_trait;

/// A place a whole archive can be fetched from.
///
/// The archive reader needs the complete buffer before parsing, so sources
/// only offer an all-at-once load.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Fetch every byte of the archive
    async fn load(&self) -> Result<Vec<u8>>;

    /// Human readable location, used in messages
    fn describe(&self) -> &str;
}
