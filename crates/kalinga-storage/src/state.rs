use std::path::Path;

use crate::error::StorageError;
use crate::store::RecordStore;

/// Load a store snapshot. A missing file is a fresh, empty store.
pub fn load_snapshot(path: &Path) -> Result<RecordStore, StorageError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no snapshot found, starting fresh");
        return Ok(RecordStore::new());
    }
    let json = std::fs::read(path)?;
    let store: RecordStore = serde_json::from_slice(&json)?;
    tracing::info!(path = %path.display(), "snapshot loaded");
    Ok(store)
}

/// Write a store snapshot atomically (tmp + rename).
pub fn save_snapshot(path: &Path, store: &RecordStore) -> Result<(), StorageError> {
    let json = serde_json::to_vec_pretty(store)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, &json)?;
    std::fs::rename(&tmp_path, path)?;

    tracing::debug!(path = %path.display(), "snapshot saved");
    Ok(())
}
