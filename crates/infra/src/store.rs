use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use catalogo_core::Entity;

/// Keyed record store used by the resource collaborators.
pub trait Store: Send + Sync {
    type Record: Entity;

    fn get(&self, id: &<Self::Record as Entity>::Id) -> Option<Self::Record>;
    /// Insert or replace the record under its own id.
    fn save(&self, record: Self::Record);
    /// All records, ordered by id.
    fn list(&self) -> Vec<Self::Record>;
    fn remove(&self, id: &<Self::Record as Entity>::Id) -> Option<Self::Record>;

    fn contains(&self, id: &<Self::Record as Entity>::Id) -> bool {
        self.get(id).is_some()
    }
}

impl<S> Store for Arc<S>
where
    S: Store + ?Sized,
{
    type Record = S::Record;

    fn get(&self, id: &<Self::Record as Entity>::Id) -> Option<Self::Record> {
        (**self).get(id)
    }

    fn save(&self, record: Self::Record) {
        (**self).save(record)
    }

    fn list(&self) -> Vec<Self::Record> {
        (**self).list()
    }

    fn remove(&self, id: &<Self::Record as Entity>::Id) -> Option<Self::Record> {
        (**self).remove(id)
    }
}

/// In-memory store for dev/tests. Contents are lost on restart.
#[derive(Debug)]
pub struct InMemoryStore<V: Entity> {
    inner: RwLock<BTreeMap<V::Id, V>>,
}

impl<V: Entity> InMemoryStore<V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
        }
    }

    // Every mutation is a single insert or remove, so a poisoned map is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<V::Id, V>> {
        self.inner.read().unwrap_or_else(|poisoned| {
            tracing::warn!("store lock poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<V::Id, V>> {
        self.inner.write().unwrap_or_else(|poisoned| {
            tracing::warn!("store lock poisoned; recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

impl<V: Entity> Default for InMemoryStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Store for InMemoryStore<V>
where
    V: Entity + Clone + Send + Sync + 'static,
    V::Id: Send + Sync,
{
    type Record = V;

    fn get(&self, id: &V::Id) -> Option<V> {
        self.read().get(id).cloned()
    }

    fn save(&self, value: V) {
        self.write().insert(value.id(), value);
    }

    fn list(&self) -> Vec<V> {
        self.read().values().cloned().collect()
    }

    fn remove(&self, id: &V::Id) -> Option<V> {
        self.write().remove(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        label: &'static str,
    }

    impl Entity for Item {
        type Id = u32;

        fn id(&self) -> u32 {
            self.id
        }
    }

    #[test]
    fn save_replaces_by_id() {
        let store = InMemoryStore::new();
        store.save(Item { id: 1, label: "a" });
        store.save(Item { id: 1, label: "b" });

        assert_eq!(store.list(), vec![Item { id: 1, label: "b" }]);
    }

    #[test]
    fn list_is_ordered_by_id() {
        let store = InMemoryStore::new();
        store.save(Item { id: 3, label: "c" });
        store.save(Item { id: 1, label: "a" });
        store.save(Item { id: 2, label: "b" });

        let ids: Vec<u32> = store.list().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn remove_returns_previous_value() {
        let store: Arc<InMemoryStore<Item>> = Arc::new(InMemoryStore::new());
        store.save(Item { id: 7, label: "x" });

        assert!(store.contains(&7));
        assert_eq!(store.remove(&7), Some(Item { id: 7, label: "x" }));
        assert_eq!(store.remove(&7), None);
        assert!(!store.contains(&7));
    }

    #[test]
    fn writes_survive_a_poisoned_lock() {
        let store: Arc<InMemoryStore<Item>> = Arc::new(InMemoryStore::new());
        store.save(Item { id: 1, label: "a" });

        let poisoner = Arc::clone(&store);
        let joined = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("poison the store lock");
        })
        .join();
        assert!(joined.is_err());
        assert!(store.inner.is_poisoned());

        store.save(Item { id: 2, label: "b" });
        assert_eq!(store.get(&2), Some(Item { id: 2, label: "b" }));
        assert_eq!(store.list().len(), 2);
        assert_eq!(store.remove(&1), Some(Item { id: 1, label: "a" }));
    }
}
