use std::path::Path;

use super::{download_file, DownloadError};

/// Transport used to bring one archive onto disk.
///
/// The installer only talks to the network through this trait.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` and writes the whole body to `dest`.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError>;
}

/// [`Fetcher`] performing one HTTP GET per archive.
#[derive(Debug, Default)]
pub struct HttpFetcher;

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<(), DownloadError> {
        download_file(dest, url).await
    }
}
