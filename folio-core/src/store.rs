use crate::link::{ShortId, ShortLink};
use crate::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Storage for short links. Implementations enforce id uniqueness.
pub trait LinkStore: Send + Sync {
    /// Persists `link`. Fails with `AlreadyExists` if the id is taken.
    fn insert(&self, link: ShortLink) -> Result<()>;

    fn get(&self, id: &ShortId) -> Result<Option<ShortLink>>;

    /// All links ordered by creation time, then id.
    fn list(&self) -> Result<Vec<ShortLink>>;

    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

pub(crate) fn sorted_links<'a>(links: impl Iterator<Item = &'a ShortLink>) -> Vec<ShortLink> {
    let mut out: Vec<ShortLink> = links.cloned().collect();
    out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    out
}

/// In-process store; contents are lost when dropped.
#[derive(Default)]
pub struct MemoryStore {
    links: RwLock<HashMap<ShortId, ShortLink>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LinkStore for MemoryStore {
    fn insert(&self, link: ShortLink) -> Result<()> {
        let mut links = self.links.write();
        if links.contains_key(&link.id) {
            return Err(Error::AlreadyExists(link.id.to_string()));
        }
        links.insert(link.id.clone(), link);
        Ok(())
    }

    fn get(&self, id: &ShortId) -> Result<Option<ShortLink>> {
        Ok(self.links.read().get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ShortLink>> {
        Ok(sorted_links(self.links.read().values()))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.links.read().len())
    }
}
