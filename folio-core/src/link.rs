//! Short link records, id generation and URL validation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Characters used in generated ids.
pub const ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
    'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z',
];

pub const ID_LENGTH: usize = 8;

/// Upper bound on ids accepted by [`ShortId::parse`].
pub const MAX_ID_LENGTH: usize = 64;

/// Generates a random id of `len` characters drawn uniformly from [`ALPHABET`].
pub fn generate_id(len: usize) -> ShortId {
    ShortId(nanoid::nanoid!(len, &ALPHABET))
}

/// Identifier of a stored link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShortId(String);

impl ShortId {
    /// Accepts a non-empty id made only of [`ALPHABET`] characters.
    pub fn parse(id: &str) -> Result<Self> {
        if id.is_empty() {
            return Err(Error::InvalidArgument("missing id".to_string()));
        }
        if id.len() > MAX_ID_LENGTH {
            return Err(Error::InvalidArgument(format!(
                "id longer than {} characters",
                MAX_ID_LENGTH
            )));
        }
        if !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidArgument(format!("malformed id: {}", id)));
        }
        Ok(Self(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trims `input` and checks it is an absolute http(s) URL. Returns the
/// trimmed text, which is what gets stored.
pub fn validate_url(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty url".to_string()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(Error::InvalidUrl(format!("unsupported scheme: {}", other))),
    }
}

/// A persisted short link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortLink {
    pub id: ShortId,
    pub url: String,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
}

impl ShortLink {
    pub fn new(id: ShortId, url: String) -> Self {
        Self {
            id,
            url,
            created_at: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn test_generated_ids_match_alphabet() {
        let re = Regex::new("^[0-9a-zA-Z]{8}$").unwrap();
        for _ in 0..200 {
            let id = generate_id(ID_LENGTH);
            assert!(re.is_match(id.as_str()), "bad id {}", id);
        }
    }

    #[test]
    fn test_validate_url() {
        assert_eq!(
            validate_url("  https://example.com/page ").unwrap(),
            "https://example.com/page"
        );
        assert!(validate_url("http://localhost:3000").is_ok());

        for bad in ["", "   ", "not a url", "ftp://example.com", "javascript:alert(1)", "/relative"] {
            let err = validate_url(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidUrl(_)), "{:?} -> {:?}", bad, err);
        }
    }

    #[test]
    fn test_parse_short_id() {
        assert_eq!(ShortId::parse("aB3dE5gH").unwrap().as_str(), "aB3dE5gH");
        assert!(ShortId::parse("").is_err());
        assert!(ShortId::parse("has-dash").is_err());
        assert!(ShortId::parse("ünïcode").is_err());
        assert!(ShortId::parse(&"a".repeat(65)).is_err());
    }

    #[test]
    fn test_link_timestamp_is_recent() {
        let link = ShortLink::new(generate_id(ID_LENGTH), "https://a.test".into());
        assert!((chrono::Utc::now().timestamp() - link.created_at).abs() < 5);
    }
}
