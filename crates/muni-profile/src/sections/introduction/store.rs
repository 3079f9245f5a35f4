use std::collections::HashMap;
use std::sync::Mutex;

use super::domain::{MunicipalityId, SectionContent, SectionParams};
use super::fingerprint::Fingerprint;

/// Cache key: the municipality plus every build parameter that affects
/// assembly output.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildKey {
    pub municipality: MunicipalityId,
    pub params: SectionParams,
}

/// Cached entry pairing assembled content with the fingerprint of the
/// source state it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSection {
    pub fingerprint: Fingerprint,
    pub content: SectionContent,
}

/// Version-aware cache abstraction. An in-process map suffices for one
/// service instance; a distributed backing store is a drop-in substitute
/// as long as `store` publishes fully assembled entries atomically.
pub trait ContentStore: Send + Sync {
    fn lookup(&self, key: &BuildKey) -> Result<Option<StoredSection>, StoreError>;
    fn store(&self, key: BuildKey, entry: StoredSection) -> Result<(), StoreError>;
    fn invalidate(&self, key: &BuildKey) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("content store mutex poisoned")]
    Poisoned,
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

/// Bounded in-memory store with least-recently-used eviction. Readers see
/// either no entry or a fully assembled one; entries are cloned out, never
/// handed back by reference.
#[derive(Debug)]
pub struct InMemoryContentStore {
    inner: Mutex<StoreInner>,
    capacity: usize,
}

#[derive(Debug, Default)]
struct StoreInner {
    entries: HashMap<BuildKey, StoredSection>,
    recency: Vec<BuildKey>,
}

impl InMemoryContentStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            capacity: capacity.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.entries.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryContentStore {
    /// Default capacity of 256 built sections.
    fn default() -> Self {
        Self::new(256)
    }
}

impl StoreInner {
    fn touch(&mut self, key: &BuildKey) {
        self.recency.retain(|existing| existing != key);
        self.recency.push(key.clone());
    }
}

impl ContentStore for InMemoryContentStore {
    fn lookup(&self, key: &BuildKey) -> Result<Option<StoredSection>, StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        let hit = inner.entries.get(key).cloned();
        if hit.is_some() {
            inner.touch(key);
        }
        Ok(hit)
    }

    fn store(&self, key: BuildKey, entry: StoredSection) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.entries.insert(key.clone(), entry);
        inner.touch(&key);
        while inner.entries.len() > self.capacity {
            let evicted = inner.recency.remove(0);
            inner.entries.remove(&evicted);
        }
        Ok(())
    }

    fn invalidate(&self, key: &BuildKey) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().map_err(|_| StoreError::Poisoned)?;
        inner.entries.remove(key);
        inner.recency.retain(|existing| existing != key);
        Ok(())
    }
}
