//! Durable backend: SQLite metadata table + object storage payloads.

mod database;
mod storage;

use std::path::Path;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::backend::FragmentBackend;
use crate::error::Result;
use crate::record::{FragmentList, FragmentRecord};

use database::Database;
use storage::Storage;

pub use storage::ObjectStoreConfig;

/// Backend pairing a SQLite metadata table with an object store for payloads.
#[derive(Debug, Clone)]
pub struct DurableBackend {
    db: Database,
    storage: Storage,
}

impl DurableBackend {
    /// Create a backend with a file-based SQLite database.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file (created if missing)
    /// * `objects` - Object storage configuration (S3, MinIO, local, or memory)
    pub async fn new(db_path: &Path, objects: &ObjectStoreConfig) -> Result<Self> {
        let db = Database::new(db_path).await?;
        let storage = Storage::new(objects).await?;
        Ok(Self { db, storage })
    }

    /// Create a backend with an in-memory SQLite database.
    pub async fn in_memory(objects: &ObjectStoreConfig) -> Result<Self> {
        let db = Database::in_memory().await?;
        let storage = Storage::new(objects).await?;
        Ok(Self { db, storage })
    }

    /// Create a backend rooted in a local directory.
    ///
    /// The database lands at `data_dir/db.sqlite`, payloads under `data_dir/objects/`.
    pub async fn new_local(data_dir: &Path) -> Result<Self> {
        let db_path = data_dir.join("db.sqlite");
        let objects = ObjectStoreConfig::Local {
            path: data_dir.join("objects"),
        };
        Self::new(&db_path, &objects).await
    }

    /// Create a fully ephemeral backend (in-memory DB + in-memory object storage).
    ///
    /// Data is lost when the backend is dropped. Useful for testing.
    pub async fn new_ephemeral() -> Result<Self> {
        Self::in_memory(&ObjectStoreConfig::Memory).await
    }
}

#[async_trait]
impl FragmentBackend for DurableBackend {
    fn name(&self) -> &'static str {
        "durable"
    }

    async fn write_fragment(&self, record: &FragmentRecord) -> Result<()> {
        self.db.upsert_fragment(record).await
    }

    async fn read_fragment(&self, owner_id: &str, id: &str) -> Result<Option<FragmentRecord>> {
        self.db.get_fragment(owner_id, id).await
    }

    async fn write_fragment_data(&self, owner_id: &str, id: &str, data: Bytes) -> Result<()> {
        self.storage.put_data(owner_id, id, data).await
    }

    async fn read_fragment_data(&self, owner_id: &str, id: &str) -> Result<Option<Bytes>> {
        self.storage.get_data(owner_id, id).await
    }

    async fn list_fragments(&self, owner_id: &str, expand: bool) -> Result<FragmentList> {
        if expand {
            Ok(FragmentList::Records(self.db.list_records(owner_id).await?))
        } else {
            Ok(FragmentList::Ids(self.db.list_ids(owner_id).await?))
        }
    }

    /// Both deletes are issued concurrently and awaited together. A failure on
    /// one side does not roll back the other.
    async fn delete_fragment(&self, owner_id: &str, id: &str) -> Result<()> {
        let (metadata, data) = tokio::join!(
            self.db.delete_fragment(owner_id, id),
            self.storage.delete_data(owner_id, id)
        );
        let removed = metadata?;
        data?;
        debug!(owner_id, id, removed, "durable delete finished");
        Ok(())
    }
}
