use tracing::debug;

use crate::download::StickerClient;
use crate::error::FetchError;
use crate::model::{StickerIndexResult, StickerPackIndex};

impl StickerClient {
    /// Resolves `pack_id` into its manifest.
    ///
    /// The body is decoded before the status is looked at, so an error
    /// envelope is reported as [`FetchError::Api`] whatever the status, and
    /// an empty or garbled body as [`FetchError::Decode`].
    pub async fn fetch_index(&self, pack_id: &str) -> Result<StickerPackIndex, FetchError> {
        let url = self.config().index_url(pack_id)?;
        debug!(%url, "requesting index");

        let response = self
            .get_index(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_send("doing index request", e))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Transport {
                context: "reading index response",
                source,
            })?;
        debug!(%status, bytes = body.len(), "index response received");

        let envelope: StickerIndexResult = serde_json::from_slice(&body)?;
        if let Some(err) = envelope.api_error() {
            return Err(FetchError::Api {
                code: err.error_code.clone(),
                message: err.error_message.clone(),
                trace_id: err.internal_trace_id.clone(),
            });
        }
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        envelope
            .result
            .ok_or_else(|| FetchError::MissingManifest(pack_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, DEFAULT_USER_AGENT};
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    fn client_for(server: &MockServer) -> StickerClient {
        StickerClient::new(ClientConfig {
            api_base: Url::parse(&server.url("/v3.1/")).unwrap(),
            host: None,
            ..ClientConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn returns_manifest_from_envelope() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v3.1/stickerPack/abc123")
                    .header("user-agent", DEFAULT_USER_AGENT);
                then.status(200).json_body(json!({
                    "result": {
                        "packId": "abc123",
                        "name": "Funny Cats",
                        "resourceUrlPrefix": "https://cdn.example.com/abc123/",
                        "stickers": [{"fileName": "0.webp"}, {"fileName": "1.webp"}]
                    },
                    "error": null
                }));
            })
            .await;

        let index = client_for(&server).fetch_index("abc123").await.unwrap();
        mock.assert_async().await;
        assert_eq!(index.name, "Funny Cats");
        assert_eq!(index.stickers.len(), 2);
        assert_eq!(index.stickers[1].file_name, "1.webp");
    }

    #[tokio::test]
    async fn error_envelope_is_an_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v3.1/stickerPack/missing");
                then.status(404).json_body(json!({
                    "result": null,
                    "error": {
                        "errorCode": "PACK_NOT_FOUND",
                        "errorMessage": "sticker pack not found",
                        "internalTraceId": "trace-9",
                        "timestamp": 1700000000000u64
                    }
                }));
            })
            .await;

        match client_for(&server).fetch_index("missing").await {
            Err(FetchError::Api {
                code,
                message,
                trace_id,
            }) => {
                assert_eq!(code, "PACK_NOT_FOUND");
                assert_eq!(message, "sticker pack not found");
                assert_eq!(trace_id, "trace-9");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_error_body_is_a_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v3.1/stickerPack/abc123");
                then.status(500);
            })
            .await;

        let result = client_for(&server).fetch_index("abc123").await;
        assert!(matches!(result, Err(FetchError::Decode(_))), "{result:?}");
    }

    #[tokio::test]
    async fn non_success_without_error_payload_reports_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v3.1/stickerPack/abc123");
                then.status(503).body("{}");
            })
            .await;

        match client_for(&server).fetch_index("abc123").await {
            Err(FetchError::Status { status, url }) => {
                assert_eq!(status.as_u16(), 503);
                assert!(url.ends_with("/v3.1/stickerPack/abc123"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn null_result_is_missing_manifest() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v3.1/stickerPack/abc123");
                then.status(200)
                    .body(r#"{"result": null, "error": {"errorCode": "", "errorMessage": ""}}"#);
            })
            .await;

        let result = client_for(&server).fetch_index("abc123").await;
        assert!(
            matches!(result, Err(FetchError::MissingManifest(ref id)) if id == "abc123"),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let client = StickerClient::new(ClientConfig {
            api_base: Url::parse("http://127.0.0.1:1/v3.1/").unwrap(),
            host: None,
            ..ClientConfig::default()
        })
        .unwrap();

        let result = client.fetch_index("abc123").await;
        assert!(matches!(result, Err(FetchError::Transport { .. })), "{result:?}");
    }
}
