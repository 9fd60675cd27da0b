//! Registry persistence backends.
//!
//! The registry is authoritative in memory; persistence is a snapshot taken
//! after each successful mutation. The default backend is memory-only, which
//! makes the volatility of the user set an explicit configuration choice
//! rather than an accident.

use super::Registry;
use crate::error::PanelError;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Plain-JSON file snapshot of the registry.
pub struct FileStore {
    storage_path: PathBuf,
}

impl FileStore {
    /// Create a file store writing to the given path.
    pub fn new(storage_path: PathBuf) -> Self {
        Self { storage_path }
    }

    /// Save the registry snapshot.
    pub async fn save(&self, registry: &Registry) -> Result<(), PanelError> {
        let data = serde_json::to_vec_pretty(registry)?;

        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PanelError::Storage(e.to_string()))?;
        }

        // Write atomically using temp file + rename
        let temp_path = self.storage_path.with_extension("tmp");
        fs::write(&temp_path, &data)
            .await
            .map_err(|e| PanelError::Storage(e.to_string()))?;
        fs::rename(&temp_path, &self.storage_path)
            .await
            .map_err(|e| PanelError::Storage(e.to_string()))?;

        debug!(path = ?self.storage_path, bytes = data.len(), "Saved registry snapshot");
        Ok(())
    }

    /// Load the registry snapshot.
    ///
    /// Returns an empty registry if the file does not exist yet.
    pub async fn load(&self) -> Result<Registry, PanelError> {
        if !self.storage_path.exists() {
            info!(
                path = ?self.storage_path,
                "Registry snapshot not found, starting with empty registry"
            );
            return Ok(Registry::new());
        }

        let data = fs::read(&self.storage_path)
            .await
            .map_err(|e| PanelError::Storage(e.to_string()))?;
        let registry: Registry =
            serde_json::from_slice(&data).map_err(|e| PanelError::Storage(e.to_string()))?;

        info!(
            path = ?self.storage_path,
            users = registry.count(),
            "Loaded registry snapshot"
        );
        Ok(registry)
    }
}

/// In-memory only backend: persistence is a no-op.
pub struct MemoryStore;

impl MemoryStore {
    /// "Save" does nothing for the memory store.
    pub async fn save(&self, _registry: &Registry) -> Result<(), PanelError> {
        debug!("Memory store: save is a no-op");
        Ok(())
    }

    /// "Load" returns an empty registry.
    pub async fn load(&self) -> Result<Registry, PanelError> {
        debug!("Memory store: returning empty registry");
        Ok(Registry::new())
    }
}

/// Storage backend for the registry.
pub enum Store {
    /// JSON file snapshot
    File(FileStore),
    /// In-memory only (users are lost on restart)
    Memory(MemoryStore),
}

impl Store {
    /// File-backed store.
    pub fn file(storage_path: PathBuf) -> Self {
        Store::File(FileStore::new(storage_path))
    }

    /// Memory-only store.
    pub fn memory() -> Self {
        Store::Memory(MemoryStore)
    }

    /// Save the registry.
    pub async fn save(&self, registry: &Registry) -> Result<(), PanelError> {
        match self {
            Store::File(s) => s.save(registry).await,
            Store::Memory(s) => s.save(registry).await,
        }
    }

    /// Load the registry.
    pub async fn load(&self) -> Result<Registry, PanelError> {
        match self {
            Store::File(s) => s.load().await,
            Store::Memory(s) => s.load().await,
        }
    }
}
