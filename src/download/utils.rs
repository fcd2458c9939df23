use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::time::{Duration, interval};

use crate::error::FetchError;

pub const INDEX_FILE_NAME: &str = "index.json";

const INTERRUPT_POLL: Duration = Duration::from_millis(500);

/// Drives `task` to completion unless `interrupted` is raised first, in which
/// case `task` is dropped and [`FetchError::Interrupted`] returned.
pub async fn until_interrupted<T>(
    interrupted: &AtomicBool,
    task: impl Future<Output = Result<T, FetchError>>,
) -> Result<T, FetchError> {
    let mut interrupt_interval = interval(INTERRUPT_POLL);
    tokio::pin!(task);
    loop {
        tokio::select! {
            result = &mut task => return result,
            _ = interrupt_interval.tick() => {
                if interrupted.load(Ordering::SeqCst) {
                    return Err(FetchError::Interrupted);
                }
            }
        }
    }
}

/// `{pack_id} - {name}`, with path separators replaced so the pack always
/// maps to a single directory.
pub fn pack_dir_name(pack_id: &str, name: &str) -> String {
    format!("{} - {}", pack_id, name).replace(['/', '\\'], "_")
}

/// Joins a sticker file name onto the pack directory, refusing anything that
/// would land outside of it.
pub fn sticker_path(pack_dir: &Path, file_name: &str) -> Result<PathBuf, FetchError> {
    let escapes = file_name.is_empty()
        || file_name == "."
        || file_name == ".."
        || file_name.contains(['/', '\\', '\0']);
    if escapes {
        return Err(FetchError::InvalidFileName(file_name.to_string()));
    }
    Ok(pack_dir.join(file_name))
}
