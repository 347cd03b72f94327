pub mod error;
pub mod types;
pub mod config;
pub mod window;
pub mod geometry;
pub mod desktop;
pub mod terminal;
pub mod link;
pub mod store;
pub mod log_store; // append-only file backend
pub mod shortener;

pub use error::{Error, Result};
pub use types::*;
pub use config::ShortenerConfig;
pub use desktop::{Desktop, DesktopAction};
pub use link::{ShortId, ShortLink};
pub use log_store::LogStore;
pub use shortener::Shortener;
pub use store::{LinkStore, MemoryStore};
pub use window::{WindowManager, WindowOp};
