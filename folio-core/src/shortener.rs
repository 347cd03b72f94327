use crate::config::ShortenerConfig;
use crate::link::{generate_id, validate_url, ShortId, ShortLink};
use crate::store::LinkStore;
use crate::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Creates and resolves short links on top of a [`LinkStore`].
#[derive(Clone)]
pub struct Shortener {
    store: Arc<dyn LinkStore>,
    config: ShortenerConfig,
}

impl Shortener {
    pub fn new(store: Arc<dyn LinkStore>) -> Self {
        Self::with_config(store, ShortenerConfig::default())
    }

    pub fn with_config(store: Arc<dyn LinkStore>, config: ShortenerConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &Arc<dyn LinkStore> {
        &self.store
    }

    pub fn config(&self) -> &ShortenerConfig {
        &self.config
    }

    /// Validates `url` and stores it under a fresh random id.
    ///
    /// Id collisions are retried with a new id up to `max_id_attempts`
    /// times, after which `ResourceExhausted` is returned.
    pub fn create(&self, url: &str) -> Result<ShortLink> {
        let url = validate_url(url)?;

        for attempt in 1..=self.config.max_id_attempts {
            let link = ShortLink::new(generate_id(self.config.id_length), url.clone());
            match self.store.insert(link.clone()) {
                Ok(()) => {
                    info!(id = %link.id, url = %link.url, "created short link");
                    return Ok(link);
                }
                Err(Error::AlreadyExists(id)) => {
                    warn!(%id, attempt, "short id collision, regenerating");
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::ResourceExhausted(format!(
            "no free short id after {} attempts",
            self.config.max_id_attempts
        )))
    }

    /// Looks up the url stored under `id`. Unknown and malformed ids are
    /// both reported as `None`.
    pub fn resolve(&self, id: &str) -> Result<Option<String>> {
        let id = match ShortId::parse(id) {
            Ok(id) => id,
            Err(_) => {
                debug!(id, "rejecting malformed short id");
                return Ok(None);
            }
        };
        Ok(self.store.get(&id)?.map(|link| link.url))
    }

    pub fn list(&self) -> Result<Vec<ShortLink>> {
        self.store.list()
    }
}
