use futures::StreamExt;
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

use crate::download::progress::ProgressTracker;
use crate::download::utils::{self, INDEX_FILE_NAME};
use crate::download::{DownloadedFile, StickerClient};
use crate::error::FetchError;
use crate::model::StickerPackIndex;

/// What to do when one sticker fails to download.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Abort the pack on the first failure.
    #[default]
    Stop,
    /// Keep downloading and report every failure at the end.
    Continue,
}

#[derive(Debug, Clone)]
pub struct PackOptions {
    /// Parent of the pack directory.
    pub output_dir: PathBuf,
    /// Maximum number of sticker downloads in flight.
    pub jobs: NonZeroUsize,
    pub on_error: ErrorPolicy,
    pub interrupted: Arc<AtomicBool>,
}

impl Default for PackOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            jobs: NonZeroUsize::MIN,
            on_error: ErrorPolicy::Stop,
            interrupted: Arc::new(AtomicBool::new(false)),
        }
    }
}

#[derive(Debug)]
pub struct DownloadedSticker {
    pub position: usize,
    pub file_name: String,
    pub file: DownloadedFile,
}

#[derive(Debug)]
pub struct StickerFailure {
    pub position: usize,
    pub file_name: String,
    pub error: FetchError,
}

#[derive(Debug)]
pub struct PackReport {
    pub directory: PathBuf,
    pub index: StickerPackIndex,
    /// Successful downloads, in manifest order.
    pub downloaded: Vec<DownloadedSticker>,
    /// Only ever non-empty under [`ErrorPolicy::Continue`].
    pub failed: Vec<StickerFailure>,
}

/// Fetches the manifest of `pack_id`, writes it next to the stickers and
/// downloads every sticker into `{output_dir}/{pack_id} - {name}`.
pub async fn download_pack<P: ProgressTracker>(
    client: &StickerClient,
    pack_id: &str,
    options: &PackOptions,
    progress: &P,
) -> Result<PackReport, FetchError> {
    let interrupted = options.interrupted.as_ref();
    info!(pack_id, "downloading index");
    let index = utils::until_interrupted(interrupted, client.fetch_index(pack_id)).await?;
    info!(
        name = %index.name,
        stickers = index.stickers.len(),
        "pack located"
    );

    let directory = options
        .output_dir
        .join(utils::pack_dir_name(pack_id, &index.name));
    match tokio::fs::create_dir(&directory).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!(directory = %directory.display(), "pack directory already exists");
        }
        Err(e) => return Err(FetchError::io("creating pack directory", &directory, e)),
    }
    write_index(&directory, &index).await?;

    progress.begin(index.stickers.len());
    let jobs = options.jobs.get();
    let pack_dir = directory.as_path();
    let pack = &index;

    let mut results = futures::stream::iter(index.stickers.iter().enumerate())
        .map(move |(position, sticker)| async move {
            let outcome: Result<DownloadedFile, FetchError> = async {
                if interrupted.load(Ordering::SeqCst) {
                    return Err(FetchError::Interrupted);
                }
                let path = utils::sticker_path(pack_dir, &sticker.file_name)?;
                progress.start(position, position % jobs);
                debug!(file_name = %sticker.file_name, "downloading sticker");
                let url = pack.sticker_url(sticker);
                let download = client.download_image(&url, &path);
                utils::until_interrupted(interrupted, download).await
            }
            .await;
            (position, sticker, outcome)
        })
        .buffer_unordered(jobs);

    let mut downloaded = Vec::with_capacity(index.stickers.len());
    let mut failed = Vec::new();
    while let Some((position, sticker, outcome)) = results.next().await {
        match outcome {
            Ok(file) => {
                progress.complete(position, file.bytes);
                downloaded.push(DownloadedSticker {
                    position,
                    file_name: sticker.file_name.clone(),
                    file,
                });
            }
            Err(FetchError::Interrupted) => {
                progress.abandon("Download interrupted.");
                return Err(FetchError::Interrupted);
            }
            Err(error) => {
                progress.fail(position);
                warn!(file_name = %sticker.file_name, %error, "failed to download sticker");
                match options.on_error {
                    ErrorPolicy::Stop => {
                        progress.abandon(&format!("Failed on {}.", sticker.file_name));
                        return Err(error);
                    }
                    ErrorPolicy::Continue => failed.push(StickerFailure {
                        position,
                        file_name: sticker.file_name.clone(),
                        error,
                    }),
                }
            }
        }
    }
    drop(results);

    downloaded.sort_by_key(|d| d.position);
    failed.sort_by_key(|f| f.position);
    progress.finish(&format!(
        "Downloaded {}/{} stickers.",
        downloaded.len(),
        index.stickers.len()
    ));

    Ok(PackReport {
        directory,
        index,
        downloaded,
        failed,
    })
}

/// Writes the manifest as two-space indented JSON.
async fn write_index(directory: &Path, index: &StickerPackIndex) -> Result<(), FetchError> {
    let path = directory.join(INDEX_FILE_NAME);
    let mut json = serde_json::to_vec_pretty(index)
        .map_err(|e| FetchError::io("encoding index", &path, e.into()))?;
    json.push(b'\n');
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| FetchError::io("writing index file", &path, e))
}
