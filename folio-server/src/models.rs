/// Request and response bodies

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Successful `POST /api/shorten` response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    /// Full short URL, `<origin>/shorten/<id>`
    pub short_url: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Pulls the `url` string out of a shorten request body.
///
/// Fails with `InvalidJson` when the body is not JSON at all; a JSON body
/// without a string `url` field yields `Ok(None)`.
pub fn extract_url(body: &[u8]) -> Result<Option<String>, ApiError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|_| ApiError::InvalidJson)?;
    Ok(value
        .get("url")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_field_names() {
        let body = serde_json::to_value(ShortenResponse {
            short_url: "http://x.test/shorten/abc".into(),
            id: "abc".into(),
        })
        .unwrap();
        assert_eq!(body["shortUrl"], "http://x.test/shorten/abc");
        assert_eq!(body["id"], "abc");
    }

    #[test]
    fn test_extract_url() {
        assert_eq!(
            extract_url(br#"{"url":"https://a.test"}"#),
            Ok(Some("https://a.test".to_string()))
        );
        assert_eq!(extract_url(br#"{"url":42}"#), Ok(None));
        assert_eq!(extract_url(br#"{}"#), Ok(None));
        assert_eq!(extract_url(br#"["https://a.test"]"#), Ok(None));
        assert_eq!(extract_url(b"url=https://a.test"), Err(ApiError::InvalidJson));
        assert_eq!(extract_url(b""), Err(ApiError::InvalidJson));
    }
}
