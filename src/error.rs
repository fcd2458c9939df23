use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("building request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected response from {url}: HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("decoding index: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API error {code}: {message} (trace id {trace_id:?})")]
    Api {
        code: String,
        message: String,
        trace_id: String,
    },

    #[error("index response for pack {0:?} carried no manifest")]
    MissingManifest(String),

    #[error("refusing to write sticker with file name {0:?}")]
    InvalidFileName(String),

    #[error("{context} {}: {source}", .path.display())]
    Io {
        context: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("download interrupted")]
    Interrupted,
}

impl FetchError {
    pub(crate) fn io(
        context: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        FetchError::Io {
            context,
            path: path.into(),
            source,
        }
    }

    /// Classifies a `reqwest` failure as construction or transport.
    pub(crate) fn from_send(context: &'static str, source: reqwest::Error) -> Self {
        if source.is_builder() {
            FetchError::Request(source)
        } else {
            FetchError::Transport { context, source }
        }
    }
}
