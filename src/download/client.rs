use reqwest::header::HOST;
use url::Url;

use crate::config::ClientConfig;
use crate::error::FetchError;

/// HTTP client for the sticker API and its resource CDN.
///
/// Every request carries the configured `User-Agent`. The configured `Host`
/// only goes to the index endpoint; sticker downloads keep the CDN's own.
#[derive(Debug, Clone)]
pub struct StickerClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl StickerClient {
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(FetchError::Request)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn get(&self, url: Url) -> reqwest::RequestBuilder {
        self.http.get(url)
    }

    pub(crate) fn get_index(&self, url: Url) -> reqwest::RequestBuilder {
        let request = self.get(url);
        match &self.config.host {
            Some(host) => request.header(HOST, host.as_str()),
            None => request,
        }
    }
}
