use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;

use crate::backend::FragmentBackend;
use crate::error::Result;
use crate::record::{FragmentList, FragmentRecord};

/// Ordered map keyed by `(owner_id, id)`.
///
/// Ordering by owner first lets a listing be a range scan over one owner's
/// partition, so ids from other owners can never leak into it.
#[derive(Debug)]
struct MemoryDb<V> {
    entries: BTreeMap<(String, String), V>,
}

impl<V> Default for MemoryDb<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: Clone> MemoryDb<V> {
    fn get(&self, owner_id: &str, id: &str) -> Option<V> {
        self.entries
            .get(&(owner_id.to_string(), id.to_string()))
            .cloned()
    }

    fn put(&mut self, owner_id: &str, id: &str, value: V) {
        self.entries
            .insert((owner_id.to_string(), id.to_string()), value);
    }

    fn query<'a>(&'a self, owner_id: &'a str) -> impl Iterator<Item = (&'a str, &'a V)> + 'a {
        self.entries
            .range((owner_id.to_string(), String::new())..)
            .take_while(move |((owner, _), _)| owner == owner_id)
            .map(|((_, id), value)| (id.as_str(), value))
    }

    fn del(&mut self, owner_id: &str, id: &str) -> bool {
        self.entries
            .remove(&(owner_id.to_string(), id.to_string()))
            .is_some()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

#[derive(Debug, Default)]
struct MemoryBackendInner {
    metadata: MemoryDb<FragmentRecord>,
    data: MemoryDb<Bytes>,
}

/// Volatile backend holding metadata and payloads in process memory.
///
/// Cloning shares the same maps; the state is dropped with the last clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<RwLock<MemoryBackendInner>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored (metadata, payload) entries.
    pub fn len(&self) -> (usize, usize) {
        let inner = self.inner.read();
        (inner.metadata.len(), inner.data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == (0, 0)
    }
}

#[async_trait]
impl FragmentBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn write_fragment(&self, record: &FragmentRecord) -> Result<()> {
        self.inner
            .write()
            .metadata
            .put(&record.owner_id, &record.id, record.clone());
        Ok(())
    }

    async fn read_fragment(&self, owner_id: &str, id: &str) -> Result<Option<FragmentRecord>> {
        Ok(self.inner.read().metadata.get(owner_id, id))
    }

    async fn write_fragment_data(&self, owner_id: &str, id: &str, data: Bytes) -> Result<()> {
        self.inner.write().data.put(owner_id, id, data);
        Ok(())
    }

    async fn read_fragment_data(&self, owner_id: &str, id: &str) -> Result<Option<Bytes>> {
        Ok(self.inner.read().data.get(owner_id, id))
    }

    async fn list_fragments(&self, owner_id: &str, expand: bool) -> Result<FragmentList> {
        let inner = self.inner.read();
        let entries = inner.metadata.query(owner_id);
        let list = if expand {
            FragmentList::Records(entries.map(|(_, record)| record.clone()).collect())
        } else {
            FragmentList::Ids(entries.map(|(id, _)| id.to_string()).collect())
        };
        Ok(list)
    }

    async fn delete_fragment(&self, owner_id: &str, id: &str) -> Result<()> {
        let mut inner = self.inner.write();
        inner.metadata.del(owner_id, id);
        inner.data.del(owner_id, id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(owner_id: &str, id: &str) -> FragmentRecord {
        let now = Utc::now();
        FragmentRecord {
            id: id.to_string(),
            owner_id: owner_id.to_string(),
            fragment_type: "text/plain".to_string(),
            size: 0,
            created: now,
            updated: now,
        }
    }

    #[test]
    fn test_memory_db_range_scan() {
        let mut db = MemoryDb::default();
        db.put("a", "1", 1);
        db.put("ab", "1", 2);
        db.put("a", "2", 3);
        db.put("b", "1", 4);

        let ids: Vec<_> = db.query("a").map(|(id, v)| (id.to_string(), *v)).collect();
        assert_eq!(ids, vec![("1".to_string(), 1), ("2".to_string(), 3)]);

        assert!(db.query("c").next().is_none());
        assert!(db.del("a", "1"));
        assert!(!db.del("a", "1"));
        assert_eq!(db.get("a", "1"), None);
    }

    #[tokio::test]
    async fn test_write_and_read_metadata() {
        let backend = MemoryBackend::new();
        let rec = record("owner", "f1");

        backend.write_fragment(&rec).await.unwrap();
        let read = backend.read_fragment("owner", "f1").await.unwrap();
        assert_eq!(read, Some(rec));

        assert!(backend.read_fragment("owner", "f2").await.unwrap().is_none());
        assert!(backend.read_fragment("other", "f1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_payload() {
        let backend = MemoryBackend::new();
        backend
            .write_fragment_data("owner", "f1", Bytes::from_static(b"one"))
            .await
            .unwrap();
        backend
            .write_fragment_data("owner", "f1", Bytes::from_static(b"two"))
            .await
            .unwrap();

        let data = backend.read_fragment_data("owner", "f1").await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"two"[..]));
        assert_eq!(backend.len(), (0, 1));
    }

    #[tokio::test]
    async fn test_list_is_owner_scoped() {
        let backend = MemoryBackend::new();
        backend.write_fragment(&record("alice", "same")).await.unwrap();
        backend.write_fragment(&record("alice", "x")).await.unwrap();
        backend.write_fragment(&record("bob", "same")).await.unwrap();

        let list = backend.list_fragments("alice", false).await.unwrap();
        assert_eq!(list, FragmentList::Ids(vec!["same".into(), "x".into()]));

        let expanded = backend.list_fragments("bob", true).await.unwrap();
        match expanded {
            FragmentList::Records(records) => {
                assert_eq!(records.len(), 1);
                assert_eq!(records[0].owner_id, "bob");
            }
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_is_repeatable_and_shared() {
        let backend = MemoryBackend::new();
        backend.write_fragment(&record("owner", "f1")).await.unwrap();
        backend
            .write_fragment_data("owner", "f1", Bytes::from_static(b"x"))
            .await
            .unwrap();

        backend.delete_fragment("owner", "f1").await.unwrap();
        backend.delete_fragment("owner", "f1").await.unwrap();
        assert!(backend.is_empty());

        let shared = backend.clone();
        shared.write_fragment(&record("owner", "f2")).await.unwrap();
        assert_eq!(backend.len(), (1, 0));
    }
}
