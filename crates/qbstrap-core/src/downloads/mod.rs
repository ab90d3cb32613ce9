pub use fetcher::{Fetcher, HttpFetcher};

use std::path::{Path, PathBuf};

use futures_util::stream::StreamExt;
use reqwest::Client;
use tokio::{io::AsyncWriteExt, task::JoinError};
use tracing::debug;

pub mod fetcher;

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("DownloadError:\nurl: {url}\npath: {path}\nerror: {error:#?}")]
    Error {
        url: String,
        path: PathBuf,
        error: String,
    },

    #[error("{0}")]
    JoinError(#[from] JoinError),
}

pub(crate) async fn download_file(
    path: impl AsRef<Path>,
    url: impl Into<String>,
) -> Result<(), DownloadError> {
    let url = url.into();
    let path = path.as_ref();

    let error = |error: String| DownloadError::Error {
        url: url.clone(),
        path: path.to_path_buf(),
        error,
    };

    if let Some(dir) = path.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|err| error(err.to_string()))?;
    }

    let response = Client::new()
        .get(&url)
        .send()
        .await
        .map_err(|err| error(err.to_string()))?;

    if !response.status().is_success() {
        return Err(error(format!("server answered with {}", response.status())));
    }

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|err| error(err.to_string()))?;

    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|err| error(err.to_string()))?;

        file.write_all(&chunk)
            .await
            .map_err(|err| error(err.to_string()))?;
    }

    debug!("Downloaded successfully {}", path.to_string_lossy());

    Ok(())
}
