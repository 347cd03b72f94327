/// Short-link creation and resolution tests
///
/// Covers id shape, URL validation, unknown ids and collision handling
/// against both storage backends.

use folio_core::{Error, LinkStore, MemoryStore, ShortId, ShortLink, Shortener, ShortenerConfig};
use folio_test_utils::{TestStore, UrlGenerator};
use proptest::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;

#[test]
fn test_create_returns_well_formed_id() {
    let shortener = Shortener::new(Arc::new(MemoryStore::new()));
    let id_re = Regex::new("^[0-9a-zA-Z]{8}$").unwrap();

    let link = shortener.create("https://example.com/page").unwrap();
    assert!(id_re.is_match(link.id.as_str()));
    assert_eq!(
        shortener.resolve(link.id.as_str()).unwrap(),
        Some("https://example.com/page".to_string())
    );
}

#[test]
fn test_rejected_urls_write_nothing() {
    let test_store = TestStore::new();
    let shortener = test_store.shortener();
    let size_before = std::fs::metadata(&test_store.path).unwrap().len();

    for bad in ["ftp://example.com", "not a url", "", "mailto:me@example.com"] {
        let err = shortener.create(bad).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)), "{:?} gave {:?}", bad, err);
        assert!(err.is_invalid_input());
    }

    assert_eq!(test_store.store.len().unwrap(), 0);
    assert_eq!(std::fs::metadata(&test_store.path).unwrap().len(), size_before);
}

#[test]
fn test_unknown_id_is_not_found() {
    let shortener = Shortener::new(Arc::new(MemoryStore::new()));
    shortener.create("https://a.test").unwrap();
    assert_eq!(shortener.resolve("zzzzzzzz").unwrap(), None);
}

#[test]
fn test_same_url_gets_independent_ids() {
    let shortener = Shortener::new(Arc::new(MemoryStore::new()));
    let a = shortener.create("https://same.test").unwrap();
    let b = shortener.create("https://same.test").unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(shortener.list().unwrap().len(), 2);
}

#[test]
fn test_many_links_have_unique_ids() {
    let test_store = TestStore::new();
    let shortener = test_store.shortener();
    let mut urls = UrlGenerator::new();

    let mut ids = HashSet::new();
    for _ in 0..500 {
        let link = shortener.create(&urls.next_url()).unwrap();
        assert!(ids.insert(link.id));
    }
    assert_eq!(test_store.store.len().unwrap(), 500);
}

/// Store whose inserts always collide
struct FullStore;

impl LinkStore for FullStore {
    fn insert(&self, link: ShortLink) -> folio_core::Result<()> {
        Err(Error::AlreadyExists(link.id.to_string()))
    }

    fn get(&self, _id: &ShortId) -> folio_core::Result<Option<ShortLink>> {
        Ok(None)
    }

    fn list(&self) -> folio_core::Result<Vec<ShortLink>> {
        Ok(Vec::new())
    }

    fn len(&self) -> folio_core::Result<usize> {
        Ok(0)
    }
}

#[test]
fn test_collisions_exhaust_attempts() {
    let shortener = Shortener::with_config(
        Arc::new(FullStore),
        ShortenerConfig::new().with_max_id_attempts(4),
    );
    let err = shortener.create("https://a.test").unwrap_err();
    assert!(matches!(err, Error::ResourceExhausted(_)));
    assert!(err.is_retryable());
    assert_eq!(err.code(), "RESOURCE_EXHAUSTED");
}

#[test]
fn test_existing_id_is_regenerated() {
    let store = Arc::new(MemoryStore::new());
    let taken = ShortLink {
        id: ShortId::parse("Taken123").unwrap(),
        url: "https://first.test".to_string(),
        created_at: 1,
    };
    store.insert(taken.clone()).unwrap();

    let err = store.insert(taken).unwrap_err();
    assert_eq!(err.code(), "ALREADY_EXISTS");

    let shortener = Shortener::new(store.clone());
    let link = shortener.create("https://second.test").unwrap();
    assert_ne!(link.id.as_str(), "Taken123");
    assert_eq!(
        shortener.resolve("Taken123").unwrap().as_deref(),
        Some("https://first.test")
    );
}

proptest! {
    #[test]
    fn created_links_resolve_to_trimmed_url(
        host in "[a-z]{1,12}",
        path in "[a-zA-Z0-9/_-]{0,24}",
        https in any::<bool>(),
        pad in " {0,3}",
    ) {
        let scheme = if https { "https" } else { "http" };
        let url = format!("{}://{}.test/{}", scheme, host, path);
        let shortener = Shortener::new(Arc::new(MemoryStore::new()));

        let link = shortener.create(&format!("{}{}{}", pad, url, pad)).unwrap();
        prop_assert_eq!(&link.url, &url);
        prop_assert_eq!(shortener.resolve(link.id.as_str()).unwrap(), Some(url));
    }

    #[test]
    fn non_http_schemes_are_rejected(scheme in "(ftp|file|data|ws|gopher)") {
        let shortener = Shortener::new(Arc::new(MemoryStore::new()));
        let result = shortener.create(&format!("{}://example.com/x", scheme));
        prop_assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }
}
