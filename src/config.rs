use std::time::Duration;

use url::Url;

use crate::error::FetchError;

pub const DEFAULT_API_BASE: &str = "http://api.sticker.ly/v3.1/";
pub const DEFAULT_USER_AGENT: &str = "androidapp.stickerly/1.13.3 (G011A; U; Android 22; pt-BR; br;)";
pub const DEFAULT_HOST: &str = "api.sticker.ly";

/// Endpoint and header settings shared by index and sticker requests.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: Url,
    pub user_agent: String,
    /// Sent as the `Host` header of index requests when set.
    pub host: Option<String>,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default API base is a valid URL"),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            host: Some(DEFAULT_HOST.to_string()),
            timeout: None,
        }
    }
}

impl ClientConfig {
    /// `{api_base}/stickerPack/{pack_id}`, with the id as one encoded segment.
    pub fn index_url(&self, pack_id: &str) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                url: self.api_base.to_string(),
                reason: "cannot be used as a base".into(),
            })?
            .pop_if_empty()
            .push("stickerPack")
            .push(pack_id);
        Ok(url)
    }
}
