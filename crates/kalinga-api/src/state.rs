use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;

use kalinga_storage::state::save_snapshot;
use kalinga_storage::store::RecordStore;

use crate::error::ApiError;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<RecordStore>>,
    pub snapshot: Option<Arc<PathBuf>>,
}

impl AppState {
    pub fn new(store: RecordStore, snapshot: Option<PathBuf>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            snapshot: snapshot.map(Arc::new),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(RecordStore::new(), None)
    }

    /// Run a mutation under the store lock.
    ///
    /// With a snapshot configured the mutation is applied to a copy, and the
    /// copy replaces the live store only once the snapshot is on disk. A
    /// failed write leaves the store as it was.
    pub async fn commit<T>(
        &self,
        apply: impl FnOnce(&mut RecordStore) -> Result<T, ApiError>,
    ) -> Result<T, ApiError> {
        let mut store = self.store.lock().await;
        let Some(path) = &self.snapshot else {
            return apply(&mut *store);
        };

        let mut candidate = store.clone();
        let out = apply(&mut candidate)?;
        save_snapshot(path, &candidate)?;
        *store = candidate;
        Ok(out)
    }
}
