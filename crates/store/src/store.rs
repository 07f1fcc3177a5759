use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::backend::FragmentBackend;
use crate::durable::{DurableBackend, ObjectStoreConfig};
use crate::error::Result;
use crate::memory::MemoryBackend;
use crate::record::{FragmentList, FragmentRecord};

/// Which backend pair a process runs with.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// Volatile in-memory maps
    #[default]
    Memory,

    /// SQLite metadata + object storage payloads
    Durable {
        /// Path to the SQLite database, in-memory if not set
        #[serde(default)]
        sqlite_path: Option<PathBuf>,
        /// Where payloads are stored
        #[serde(default)]
        objects: ObjectStoreConfig,
    },
}

/// The storage facade.
///
/// Wraps exactly one [`FragmentBackend`]; clones share it. Every failure is
/// logged here with its owner/id context before being returned.
#[derive(Debug, Clone)]
pub struct Store {
    backend: Arc<dyn FragmentBackend>,
}

impl Store {
    pub fn new(backend: impl FragmentBackend) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// A store over a fresh [`MemoryBackend`].
    pub fn memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    /// Build the backend selected by `config`.
    pub async fn from_config(config: &StoreConfig) -> Result<Self> {
        let store = match config {
            StoreConfig::Memory => Self::memory(),
            StoreConfig::Durable {
                sqlite_path: Some(path),
                objects,
            } => Self::new(DurableBackend::new(path, objects).await?),
            StoreConfig::Durable {
                sqlite_path: None,
                objects,
            } => Self::new(DurableBackend::in_memory(objects).await?),
        };
        info!(backend = store.backend_name(), "fragment store ready");
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Upsert a fragment's metadata.
    pub async fn write_fragment(&self, record: &FragmentRecord) -> Result<()> {
        debug!(owner_id = %record.owner_id, id = %record.id, size = record.size, "write_fragment");
        self.backend.write_fragment(record).await.inspect_err(|e| {
            error!(
                owner_id = %record.owner_id,
                id = %record.id,
                backend = self.backend_name(),
                error = %e,
                "failed to write fragment metadata"
            )
        })
    }

    /// Read a fragment's metadata, `None` if it does not exist.
    pub async fn read_fragment(&self, owner_id: &str, id: &str) -> Result<Option<FragmentRecord>> {
        debug!(owner_id, id, "read_fragment");
        self.backend
            .read_fragment(owner_id, id)
            .await
            .inspect_err(|e| {
                error!(owner_id, id, backend = self.backend_name(), error = %e, "failed to read fragment metadata")
            })
    }

    /// Upsert a fragment's payload.
    pub async fn write_fragment_data(&self, owner_id: &str, id: &str, data: Bytes) -> Result<()> {
        debug!(owner_id, id, size = data.len(), "write_fragment_data");
        self.backend
            .write_fragment_data(owner_id, id, data)
            .await
            .inspect_err(|e| {
                error!(owner_id, id, backend = self.backend_name(), error = %e, "failed to write fragment data")
            })
    }

    /// Read a fragment's payload, `None` if none was ever written.
    pub async fn read_fragment_data(&self, owner_id: &str, id: &str) -> Result<Option<Bytes>> {
        debug!(owner_id, id, "read_fragment_data");
        self.backend
            .read_fragment_data(owner_id, id)
            .await
            .inspect_err(|e| {
                error!(owner_id, id, backend = self.backend_name(), error = %e, "failed to read fragment data")
            })
    }

    /// List one owner's fragment ids, or full records when `expand` is set.
    pub async fn list_fragments(&self, owner_id: &str, expand: bool) -> Result<FragmentList> {
        debug!(owner_id, expand, "list_fragments");
        self.backend
            .list_fragments(owner_id, expand)
            .await
            .inspect_err(|e| {
                error!(owner_id, backend = self.backend_name(), error = %e, "failed to list fragments")
            })
    }

    /// Remove a fragment's metadata and payload.
    pub async fn delete_fragment(&self, owner_id: &str, id: &str) -> Result<()> {
        debug!(owner_id, id, "delete_fragment");
        self.backend
            .delete_fragment(owner_id, id)
            .await
            .inspect_err(|e| {
                error!(owner_id, id, backend = self.backend_name(), error = %e, "failed to delete fragment")
            })
    }
}
