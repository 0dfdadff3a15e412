//! Shared, swappable reference to the current knowledge store.

use super::KnowledgeStore;
use std::sync::{Arc, PoisonError, RwLock};

/// Cheaply clonable handle to the active store.
///
/// Readers take an `Arc` to the store current at that moment and keep using
/// it even if a rebuilt store is swapped in meanwhile.
#[derive(Debug, Clone)]
pub struct StoreHandle {
    inner: Arc<RwLock<Arc<KnowledgeStore>>>,
}

impl StoreHandle {
    pub fn new(store: KnowledgeStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(store))),
        }
    }

    /// The store current at the time of the call.
    pub fn current(&self) -> Arc<KnowledgeStore> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Swap in a new store, returning the previous one.
    pub fn replace(&self, store: KnowledgeStore) -> Arc<KnowledgeStore> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(
            "Replacing knowledge store ({} -> {} entries)",
            guard.len(),
            store.len()
        );
        std::mem::replace(&mut *guard, Arc::new(store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Category, KnowledgeEntry};

    #[test]
    fn test_readers_keep_their_snapshot() {
        let handle = StoreHandle::new(KnowledgeStore::empty("MachDatum", "https://a.example/"));
        let before = handle.current();

        let rebuilt = KnowledgeStore::new(
            "MachDatum",
            "https://a.example/",
            vec![KnowledgeEntry::new(1, "Rebuilt entry", Category::General, vec![1.0])],
            None,
        )
        .unwrap();
        let previous = handle.replace(rebuilt);

        assert!(before.is_empty());
        assert!(Arc::ptr_eq(&before, &previous));
        assert_eq!(handle.current().len(), 1);
    }

    #[test]
    fn test_clones_share_the_store() {
        let handle = StoreHandle::new(KnowledgeStore::empty("A", "https://a.example/"));
        let clone = handle.clone();
        clone.replace(KnowledgeStore::empty("B", "https://b.example/"));
        assert_eq!(handle.current().company_name(), "B");
    }
}
