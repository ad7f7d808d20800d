use crate::entities::Record;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

/// State message of a collection whose fetch was abandoned mid-request.
pub const LOAD_CANCELLED: &str = "Requisição cancelada.";

/// Where a cached collection is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Unloaded,
    Loading,
    Loaded,
    /// The last fetch failed; items from before the failure are kept
    Failed(String),
}

/// Cached copy of a server collection, kept in server order.
///
/// Lookups are a linear scan by id; collections here are a few hundred rows at most.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    items: Vec<T>,
    loading: bool,
    state: LoadState,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            state: LoadState::Unloaded,
        }
    }
}

impl<T: Record + Clone + std::fmt::Debug> Collection<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn state(&self) -> &LoadState {
        &self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.state = LoadState::Loading;
    }

    /// Replaces everything with the server's collection.
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.state = LoadState::Loaded;
        trace!("collection now contains: {:?}", self.items);
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.state = LoadState::Failed(message.into());
    }

    /// Ends a fetch that never settled. Items are kept.
    pub fn cancel_load(&mut self) {
        if self.loading {
            self.loading = false;
            self.state = LoadState::Failed(LOAD_CANCELLED.to_string());
        }
    }

    pub fn append(&mut self, item: T) {
        self.items.push(item);
    }

    /// Replaces the cached record with the same id. Returns `false`, leaving the
    /// cache untouched, when no such record is cached.
    pub fn upsert(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|cached| cached.id() == item.id()) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Removes the record with `id`, keeping the order of the rest.
    pub fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(index))
    }
}

type Release<S> = Box<dyn FnOnce(&mut S) + Send>;

/// Lowers a loading flag in `state` when dropped, unless disarmed first.
///
/// Actions arm one right after raising the flag, so a caller that drops the action
/// future mid-request never leaves the store loading.
pub(crate) struct LoadGuard<S: Send + Sync + 'static> {
    state: Arc<RwLock<S>>,
    release: Option<Release<S>>,
}

impl<S: Send + Sync + 'static> LoadGuard<S> {
    pub(crate) fn new(state: &Arc<RwLock<S>>, release: impl FnOnce(&mut S) + Send + 'static) -> Self {
        Self {
            state: Arc::clone(state),
            release: Some(Box::new(release)),
        }
    }

    /// The action settled and lowers the flag itself.
    pub(crate) fn disarm(mut self) {
        self.release = None;
    }
}

impl<S: Send + Sync + 'static> Drop for LoadGuard<S> {
    fn drop(&mut self) {
        let Some(release) = self.release.take() else {
            return;
        };
        debug!("Action dropped mid-request; releasing loading flag.");
        if let Ok(mut state) = self.state.try_write() {
            release(&mut *state);
            return;
        }
        // Lock is busy: release from a task once it frees up.
        let state = Arc::clone(&self.state);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    release(&mut *state.write().await);
                });
            }
            Err(_) => warn!("No runtime to release the loading flag of a dropped action."),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        label: &'static str,
    }

    impl Record for Row {
        fn id(&self) -> i64 {
            self.id
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row { id: 1, label: "a" },
            Row { id: 2, label: "b" },
            Row { id: 3, label: "c" },
        ]
    }

    #[test]
    fn test_load_cycle() {
        let mut cache: Collection<Row> = Collection::default();
        assert_eq!(cache.state(), &LoadState::Unloaded);

        cache.begin_load();
        assert!(cache.is_loading());
        assert_eq!(cache.state(), &LoadState::Loading);

        cache.replace(rows());
        assert!(!cache.is_loading());
        assert_eq!(cache.state(), &LoadState::Loaded);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_failure_keeps_previous_items() {
        let mut cache = Collection::default();
        cache.replace(rows());
        cache.begin_load();
        cache.fail("HTTP 500");

        assert!(!cache.is_loading());
        assert_eq!(cache.state(), &LoadState::Failed("HTTP 500".to_string()));
        assert_eq!(cache.items(), rows().as_slice());
    }

    #[test]
    fn test_upsert_changes_only_matching_record() {
        let mut cache = Collection::default();
        cache.replace(rows());

        assert!(cache.upsert(Row { id: 2, label: "B" }));
        assert_eq!(cache.get(2).unwrap().label, "B");
        assert_eq!(cache.get(1).unwrap().label, "a");
        assert_eq!(cache.get(3).unwrap().label, "c");

        assert!(!cache.upsert(Row { id: 9, label: "z" }));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut cache = Collection::default();
        cache.replace(rows());

        assert_eq!(cache.remove(2), Some(Row { id: 2, label: "b" }));
        assert_eq!(cache.remove(2), None);
        let ids: Vec<i64> = cache.items().iter().map(Record::id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_cancel_load_only_ends_pending_fetch() {
        let mut cache = Collection::default();
        cache.replace(rows());
        cache.cancel_load();
        assert_eq!(cache.state(), &LoadState::Loaded);

        cache.begin_load();
        cache.cancel_load();
        assert!(!cache.is_loading());
        assert_eq!(cache.state(), &LoadState::Failed(LOAD_CANCELLED.to_string()));
        assert_eq!(cache.len(), 3);
    }

    #[tokio::test]
    async fn test_dropped_guard_releases_flag() {
        let state = Arc::new(RwLock::new(Collection::<Row>::default()));
        state.write().await.begin_load();

        drop(LoadGuard::new(&state, Collection::cancel_load));
        assert!(!state.read().await.is_loading());
    }

    #[tokio::test]
    async fn test_disarmed_guard_leaves_flag() {
        let state = Arc::new(RwLock::new(Collection::<Row>::default()));
        state.write().await.begin_load();

        LoadGuard::new(&state, Collection::cancel_load).disarm();
        assert!(state.read().await.is_loading());
    }

    #[tokio::test]
    async fn test_guard_releases_after_busy_lock() {
        let state = Arc::new(RwLock::new(Collection::<Row>::default()));
        state.write().await.begin_load();

        let reader = state.read().await;
        drop(LoadGuard::new(&state, Collection::cancel_load));
        assert!(reader.is_loading());
        drop(reader);

        tokio::task::yield_now().await;
        assert!(!state.read().await.is_loading());
    }
}
