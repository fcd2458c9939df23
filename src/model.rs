use serde::{Deserialize, Serialize};

/// One entry of a pack manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sticker {
    pub liked: bool,
    pub tags: Vec<String>,
    /// Appended to the pack's resource prefix to build the download URL, and
    /// used verbatim as the local file name.
    pub file_name: String,
    pub sid: String,
    pub animated: bool,
    pub view_count: i64,
    pub is_animated: bool,
}

/// Manifest of a single sticker pack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StickerPackIndex {
    pub stickers: Vec<Sticker>,
    pub pack_id: String,
    pub animated: bool,
    pub tray_index: i64,
    pub view_count: i64,
    pub author_name: String,
    pub export_count: i64,
    pub is_animated: bool,
    pub share_url: String,
    pub resource_url_prefix: String,
    pub resource_version: i64,
    pub resource_zip: String,
    pub updated: u64,
    pub owner: String,
    pub name: String,
}

impl StickerPackIndex {
    /// Download location of `sticker`.
    pub fn sticker_url(&self, sticker: &Sticker) -> String {
        format!("{}{}", self.resource_url_prefix, sticker.file_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiError {
    pub error_code: String,
    pub error_message: String,
    pub internal_trace_id: String,
    pub timestamp: u64,
}

impl ApiError {
    /// The API sends a zeroed error object alongside successful results.
    pub fn is_empty(&self) -> bool {
        self.error_code.is_empty() && self.error_message.is_empty()
    }
}

/// Response envelope of the index endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StickerIndexResult {
    pub result: Option<StickerPackIndex>,
    pub error: Option<ApiError>,
}

impl StickerIndexResult {
    pub fn api_error(&self) -> Option<&ApiError> {
        self.error.as_ref().filter(|e| !e.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_camel_case_envelope() {
        let body = r#"{
            "result": {
                "packId": "abc123",
                "name": "Funny Cats",
                "authorName": "meow",
                "resourceUrlPrefix": "https://cdn.example.com/abc123/",
                "updated": 1700000000000,
                "stickers": [
                    {"fileName": "0.webp", "sid": "s0", "tags": ["cat"], "isAnimated": true, "viewCount": 12},
                    {"fileName": "1.webp"}
                ]
            },
            "error": null
        }"#;
        let envelope: StickerIndexResult = serde_json::from_str(body).unwrap();
        assert!(envelope.api_error().is_none());

        let index = envelope.result.unwrap();
        assert_eq!(index.pack_id, "abc123");
        assert_eq!(index.author_name, "meow");
        assert_eq!(index.updated, 1_700_000_000_000);
        assert_eq!(index.stickers.len(), 2);
        assert_eq!(index.stickers[0].tags, vec!["cat".to_string()]);
        assert!(index.stickers[0].is_animated);
        assert!(!index.stickers[0].animated);
        assert_eq!(index.stickers[1], Sticker {
            file_name: "1.webp".into(),
            ..Default::default()
        });
        assert_eq!(
            index.sticker_url(&index.stickers[1]),
            "https://cdn.example.com/abc123/1.webp"
        );
    }

    #[test]
    fn zeroed_error_object_is_not_an_api_error() {
        let body = r#"{"result": null, "error": {"errorCode": "", "errorMessage": "", "timestamp": 0}}"#;
        let envelope: StickerIndexResult = serde_json::from_str(body).unwrap();
        assert!(envelope.api_error().is_none());

        let body = r#"{"error": {"errorCode": "NOT_FOUND", "errorMessage": "no such pack", "internalTraceId": "t-1"}}"#;
        let envelope: StickerIndexResult = serde_json::from_str(body).unwrap();
        let err = envelope.api_error().unwrap();
        assert_eq!(err.error_code, "NOT_FOUND");
        assert_eq!(err.internal_trace_id, "t-1");
    }

    #[test]
    fn serializes_with_api_field_names() {
        let index = StickerPackIndex {
            pack_id: "p".into(),
            resource_url_prefix: "https://x/".into(),
            stickers: vec![Sticker {
                file_name: "a.webp".into(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let value = serde_json::to_value(&index).unwrap();
        assert_eq!(value["packId"], "p");
        assert_eq!(value["resourceUrlPrefix"], "https://x/");
        assert_eq!(value["stickers"][0]["fileName"], "a.webp");
        assert_eq!(value["stickers"][0]["isAnimated"], false);
    }
}
