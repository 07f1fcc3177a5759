use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::record::{FragmentList, FragmentRecord};

/// A metadata store paired with a data store, both keyed by `(owner_id, id)`.
///
/// Implementations must translate their own failures into
/// [`StoreError`](crate::StoreError) and must report "not found" as `None`
/// rather than as an error.
#[async_trait]
pub trait FragmentBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Upsert a fragment's metadata record
    ///
    /// # Arguments
    /// * `record` - The full record; its `owner_id` and `id` form the key
    async fn write_fragment(&self, record: &FragmentRecord) -> Result<()>;

    /// Read a fragment's metadata record
    ///
    /// # Returns
    /// * `Ok(Some(record))` - The record exists
    /// * `Ok(None)` - No record is stored under this key
    /// * `Err(StoreError)` - The metadata store failed
    async fn read_fragment(&self, owner_id: &str, id: &str) -> Result<Option<FragmentRecord>>;

    /// Upsert a fragment's payload
    async fn write_fragment_data(&self, owner_id: &str, id: &str, data: Bytes) -> Result<()>;

    /// Read a fragment's payload
    ///
    /// # Returns
    /// * `Ok(Some(bytes))` - The payload exists
    /// * `Ok(None)` - No payload was ever written under this key
    /// * `Err(StoreError)` - The data store failed
    async fn read_fragment_data(&self, owner_id: &str, id: &str) -> Result<Option<Bytes>>;

    /// List every fragment belonging to `owner_id`
    ///
    /// # Arguments
    /// * `owner_id` - The owner partition to scan
    /// * `expand` - Return full records instead of bare ids
    async fn list_fragments(&self, owner_id: &str, expand: bool) -> Result<FragmentList>;

    /// Remove both the metadata record and the payload
    ///
    /// Deleting a fragment that does not exist (or was already deleted) succeeds.
    async fn delete_fragment(&self, owner_id: &str, id: &str) -> Result<()>;
}
