/// Test utilities and helpers for Folio testing
///
/// Temporary link logs with reopen support, and a generator for URLs.

use folio_core::{AppType, LinkStore, LogStore, Shortener, WindowOp};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

/// Link log in a temporary directory that lives as long as this value
pub struct TestStore {
    pub store: Arc<LogStore>,
    pub path: PathBuf,
    _temp_dir: TempDir,
}

impl TestStore {
    /// Create a new empty log in a fresh temporary directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("links.log");
        let store = LogStore::create(&path).expect("Failed to create link log");

        Self {
            store: Arc::new(store),
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Shortener writing to this log
    pub fn shortener(&self) -> Shortener {
        Shortener::new(self.store.clone() as Arc<dyn LinkStore>)
    }

    /// Close and reopen the log (for testing persistence)
    pub fn reopen(self) -> Self {
        let Self {
            store,
            path,
            _temp_dir,
        } = self;
        drop(store);
        let store = LogStore::open(&path).expect("Failed to reopen link log");

        Self {
            store: Arc::new(store),
            path,
            _temp_dir,
        }
    }
}

impl Default for TestStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Deterministic URL generator for testing
pub struct UrlGenerator {
    counter: u64,
}

impl UrlGenerator {
    pub fn new() -> Self {
        Self { counter: 0 }
    }

    pub fn next_url(&mut self) -> String {
        self.counter += 1;
        let scheme = if self.counter % 2 == 0 { "https" } else { "http" };
        format!("{}://site{}.test/page/{}?ref=folio", scheme, self.counter % 7, self.counter)
    }
}

impl Default for UrlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Window operations exercised by property tests
pub const STACK_OPS: [WindowOp; 5] = [
    WindowOp::Open,
    WindowOp::Close,
    WindowOp::Minimize,
    WindowOp::Restore,
    WindowOp::BringToFront,
];

/// All app types, for building strategies
pub fn all_apps() -> Vec<AppType> {
    AppType::ALL.to_vec()
}
