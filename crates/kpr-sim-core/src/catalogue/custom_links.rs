use crate::catalogue::files::SalesFile;
use crate::storage::{load_or_default, save, KeyValueStore, CUSTOM_LINKS_KEY};
use crate::KprSimResult;

/// Locally saved links, newest first, persisted under [`CUSTOM_LINKS_KEY`].
pub struct CustomLinks<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> CustomLinks<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    pub fn list(&self) -> KprSimResult<Vec<SalesFile>> {
        load_or_default(self.store, CUSTOM_LINKS_KEY)
    }

    pub fn add(&self, link: SalesFile) -> KprSimResult<()> {
        let mut links = self.list()?;
        links.retain(|l| l.id != link.id);
        links.insert(0, link);
        save(self.store, CUSTOM_LINKS_KEY, &links)
    }

    /// Remove a link; returns whether it existed.
    pub fn remove(&self, id: &str) -> KprSimResult<bool> {
        let mut links = self.list()?;
        let before = links.len();
        links.retain(|l| l.id != id);
        if links.len() == before {
            return Ok(false);
        }
        save(self.store, CUSTOM_LINKS_KEY, &links)?;
        Ok(true)
    }
}
