//! Behaviour every backend must share, exercised through the `Store` facade.

use bytes::Bytes;
use chrono::{Duration, SubsecRound, Utc};

use tempfile::TempDir;

use fragments_store::{
    DurableBackend, FragmentList, FragmentRecord, MemoryBackend, Store, StoreConfig,
};

/// One store per backend. The `TempDir` backs the local durable store and
/// must outlive it.
async fn stores() -> (Vec<Store>, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let stores = vec![
        Store::new(MemoryBackend::new()),
        Store::new(DurableBackend::new_ephemeral().await.unwrap()),
        Store::new(DurableBackend::new_local(temp_dir.path()).await.unwrap()),
        Store::from_config(&StoreConfig::Memory).await.unwrap(),
    ];
    (stores, temp_dir)
}

// Durable metadata keeps millisecond precision
fn record(owner_id: &str, id: &str, size: u64) -> FragmentRecord {
    let updated = Utc::now().trunc_subsecs(3);
    FragmentRecord {
        id: id.to_string(),
        owner_id: owner_id.to_string(),
        fragment_type: "text/plain".to_string(),
        size,
        created: updated - Duration::seconds(5),
        updated,
    }
}

#[tokio::test]
async fn test_metadata_round_trip() {
    let (backends, _temp_dir) = stores().await;
    for store in backends {
        let rec = record("owner", "frag-1", 3);
        store.write_fragment(&rec).await.unwrap();

        let read = store.read_fragment("owner", "frag-1").await.unwrap();
        assert_eq!(read, Some(rec), "backend {}", store.backend_name());
    }
}

#[tokio::test]
async fn test_payload_round_trip_is_exact() {
    let payload = Bytes::from((0u8..=255).collect::<Vec<u8>>());
    let (backends, _temp_dir) = stores().await;
    for store in backends {
        store
            .write_fragment_data("owner", "bin", payload.clone())
            .await
            .unwrap();
        let read = store.read_fragment_data("owner", "bin").await.unwrap();
        assert_eq!(read, Some(payload.clone()), "backend {}", store.backend_name());
    }
}

#[tokio::test]
async fn test_missing_entries_are_absent_not_errors() {
    let (backends, _temp_dir) = stores().await;
    for store in backends {
        assert!(store.read_fragment("nobody", "nothing").await.unwrap().is_none());
        assert!(store
            .read_fragment_data("nobody", "nothing")
            .await
            .unwrap()
            .is_none());
        assert!(store.list_fragments("nobody", false).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_listing_never_crosses_owners() {
    let (backends, _temp_dir) = stores().await;
    for store in backends {
        for (owner, id) in [("alice", "shared"), ("alice", "a2"), ("bob", "shared"), ("alicex", "a3")] {
            store.write_fragment(&record(owner, id, 0)).await.unwrap();
        }

        let list = store.list_fragments("alice", false).await.unwrap();
        let mut ids = list.ids();
        ids.sort();
        assert_eq!(ids, vec!["a2", "shared"], "backend {}", store.backend_name());

        match store.list_fragments("bob", true).await.unwrap() {
            FragmentList::Records(records) => {
                assert_eq!(records.len(), 1);
                assert!(records.iter().all(|r| r.owner_id == "bob"));
            }
            other => panic!("expected records, got {:?}", other),
        }
    }
}

#[tokio::test]
async fn test_delete_removes_both_and_is_repeatable() {
    let (backends, _temp_dir) = stores().await;
    for store in backends {
        store.write_fragment(&record("owner", "gone", 1)).await.unwrap();
        store
            .write_fragment_data("owner", "gone", Bytes::from_static(b"x"))
            .await
            .unwrap();

        store.delete_fragment("owner", "gone").await.unwrap();
        store.delete_fragment("owner", "gone").await.unwrap();

        assert!(store.read_fragment("owner", "gone").await.unwrap().is_none());
        assert!(store.read_fragment_data("owner", "gone").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_concurrent_writes_to_distinct_keys() {
    let (backends, _temp_dir) = stores().await;
    for store in backends {
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    let id = format!("frag-{}", i);
                    store.write_fragment(&record("owner", &id, 1)).await.unwrap();
                    store
                        .write_fragment_data("owner", &id, Bytes::from(vec![i as u8]))
                        .await
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list_fragments("owner", false).await.unwrap().len(), 16);
        let data = store.read_fragment_data("owner", "frag-7").await.unwrap();
        assert_eq!(data.as_deref(), Some(&[7u8][..]));
    }
}
