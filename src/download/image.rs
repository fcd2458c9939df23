use futures::StreamExt;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

use crate::download::StickerClient;
use crate::error::FetchError;

/// A sticker image written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub path: PathBuf,
    pub bytes: u64,
    pub sha256: [u8; 32],
}

/// Removes a half-written sticker unless the download completed, including
/// when the download future is dropped mid-stream.
struct PartialFile<'a> {
    path: &'a Path,
    done: bool,
}

impl<'a> PartialFile<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, done: false }
    }
}

impl Drop for PartialFile<'_> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Err(e) = std::fs::remove_file(self.path) {
            debug!(path = %self.path.display(), "could not remove partial file: {e}");
        }
    }
}

impl StickerClient {
    /// Streams the body at `url` into `path`, truncating any existing file.
    ///
    /// Nothing is written unless the server answers with a success status,
    /// and a download that fails or is cancelled part way leaves no file.
    pub async fn download_image(
        &self,
        url: &str,
        path: &Path,
    ) -> Result<DownloadedFile, FetchError> {
        let url = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        debug!(%url, path = %path.display(), "downloading image");

        let response = self
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_send("doing download request", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let mut dest = tokio::fs::File::create(path)
            .await
            .map_err(|e| FetchError::io("creating image file", path, e))?;
        let mut partial = PartialFile::new(path);
        let mut hasher = Sha256::new();
        let mut written = 0u64;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| FetchError::Transport {
                context: "reading image body",
                source,
            })?;
            dest.write_all(&chunk)
                .await
                .map_err(|e| FetchError::io("writing image file", path, e))?;
            hasher.update(&chunk);
            written += chunk.len() as u64;
        }
        dest.flush()
            .await
            .map_err(|e| FetchError::io("writing image file", path, e))?;
        dest.sync_all()
            .await
            .map_err(|e| FetchError::io("syncing image file", path, e))?;
        partial.done = true;

        Ok(DownloadedFile {
            path: path.to_path_buf(),
            bytes: written,
            sha256: hasher.finalize().into(),
        })
    }
}
