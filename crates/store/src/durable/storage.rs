//! Object storage for fragment payloads (S3/MinIO/local filesystem/memory).

use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StoreError, StoreKind};

/// Configuration for the payload object store.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectStoreConfig {
    /// In-memory storage (for testing)
    #[default]
    Memory,

    /// Local filesystem storage
    Local {
        /// Path to the storage directory
        path: PathBuf,
    },

    /// S3-compatible storage (AWS S3, MinIO, etc.)
    S3 {
        /// S3 endpoint URL (e.g., "http://localhost:9000" for MinIO)
        endpoint: String,
        /// Access key ID
        access_key: String,
        /// Secret access key
        secret_key: String,
        /// Bucket name
        bucket: String,
        /// Optional region (defaults to "us-east-1")
        region: Option<String>,
    },
}

/// Wrapper around the configured object storage backend.
#[derive(Debug, Clone)]
pub(crate) struct Storage {
    inner: Arc<dyn ObjectStore>,
}

impl Storage {
    /// Create a new storage backend from configuration.
    pub async fn new(config: &ObjectStoreConfig) -> Result<Self> {
        let inner: Arc<dyn ObjectStore> = match config {
            ObjectStoreConfig::Memory => Arc::new(InMemory::new()),

            ObjectStoreConfig::Local { path } => {
                tokio::fs::create_dir_all(path).await?;
                Arc::new(
                    LocalFileSystem::new_with_prefix(path)
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                )
            }

            ObjectStoreConfig::S3 {
                endpoint,
                access_key,
                secret_key,
                bucket,
                region,
            } => {
                let builder = AmazonS3Builder::new()
                    .with_endpoint(endpoint)
                    .with_access_key_id(access_key)
                    .with_secret_access_key(secret_key)
                    .with_bucket_name(bucket)
                    .with_region(region.as_deref().unwrap_or("us-east-1"))
                    .with_allow_http(endpoint.starts_with("http://"));

                let store: Arc<dyn ObjectStore> = Arc::new(
                    builder
                        .build()
                        .map_err(|e| StoreError::InvalidConfig(e.to_string()))?,
                );

                // Fail fast if the bucket is missing
                {
                    use futures::TryStreamExt;
                    let mut stream = store.list(None);
                    match stream.try_next().await {
                        Ok(_) => {}
                        Err(object_store::Error::NotFound { .. }) => {
                            return Err(StoreError::BucketNotFound(bucket.clone()));
                        }
                        Err(e) => {
                            let msg = e.to_string();
                            if msg.contains("NoSuchBucket") {
                                return Err(StoreError::BucketNotFound(bucket.clone()));
                            }
                            return Err(StoreError::backend(StoreKind::Data, "list bucket", e));
                        }
                    }
                }

                store
            }
        };

        Ok(Self { inner })
    }

    /// Object path for a fragment's payload: `<owner_id>/<id>`.
    ///
    /// Each component is a single path segment, so a `/` inside an id cannot
    /// escape into another owner's prefix.
    fn data_path(owner_id: &str, id: &str) -> ObjectPath {
        ObjectPath::from_iter([owner_id, id])
    }

    /// Put fragment data into storage.
    pub async fn put_data(&self, owner_id: &str, id: &str, data: Bytes) -> Result<()> {
        let path = Self::data_path(owner_id, id);
        self.inner
            .put(&path, data.into())
            .await
            .map_err(|e| StoreError::backend(StoreKind::Data, "put object", e))?;
        Ok(())
    }

    /// Get fragment data from storage.
    pub async fn get_data(&self, owner_id: &str, id: &str) -> Result<Option<Bytes>> {
        let path = Self::data_path(owner_id, id);
        match self.inner.get(&path).await {
            Ok(result) => {
                let bytes = result
                    .bytes()
                    .await
                    .map_err(|e| StoreError::backend(StoreKind::Data, "read object", e))?;
                Ok(Some(bytes))
            }
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(StoreError::backend(StoreKind::Data, "get object", e)),
        }
    }

    /// Delete fragment data from storage.
    pub async fn delete_data(&self, owner_id: &str, id: &str) -> Result<()> {
        let path = Self::data_path(owner_id, id);
        // The payload may never have been written
        match self.inner.delete(&path).await {
            Ok(()) => Ok(()),
            Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(StoreError::backend(StoreKind::Data, "delete object", e)),
        }
    }
}

#[cfg(test)]
impl Storage {
    /// Check if fragment data exists in storage.
    pub async fn has_data(&self, owner_id: &str, id: &str) -> Result<bool> {
        let path = Self::data_path(owner_id, id);
        match self.inner.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(StoreError::backend(StoreKind::Data, "head object", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = Storage::new(&ObjectStoreConfig::Memory).await.unwrap();
        let data = Bytes::from("hello world");

        storage.put_data("owner", "abc", data.clone()).await.unwrap();
        let retrieved = storage.get_data("owner", "abc").await.unwrap().unwrap();
        assert_eq!(retrieved, data);
        assert!(storage.has_data("owner", "abc").await.unwrap());

        // Same id under another owner is a different object
        assert!(storage.get_data("other", "abc").await.unwrap().is_none());

        storage.delete_data("owner", "abc").await.unwrap();
        assert!(!storage.has_data("owner", "abc").await.unwrap());

        // Deleting again is not an error
        storage.delete_data("owner", "abc").await.unwrap();
    }

    #[tokio::test]
    async fn test_local_storage_layout() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = ObjectStoreConfig::Local {
            path: temp_dir.path().to_path_buf(),
        };
        let storage = Storage::new(&config).await.unwrap();

        storage
            .put_data("owner", "def456", Bytes::from("test data"))
            .await
            .unwrap();
        let retrieved = storage.get_data("owner", "def456").await.unwrap().unwrap();
        assert_eq!(retrieved, Bytes::from("test data"));

        assert!(temp_dir.path().join("owner").join("def456").exists());
    }

    #[test]
    fn test_data_path_segments() {
        let path = Storage::data_path("owner", "a/b");
        assert_eq!(path.parts().count(), 2);
        assert!(path.as_ref().starts_with("owner/"));
    }

    #[test]
    fn test_config_tagged_by_type() {
        let config: ObjectStoreConfig =
            serde_json::from_str(r#"{"type":"local","path":"/tmp/objects"}"#).unwrap();
        assert_eq!(
            config,
            ObjectStoreConfig::Local {
                path: PathBuf::from("/tmp/objects")
            }
        );
        let config: ObjectStoreConfig = serde_json::from_str(r#"{"type":"memory"}"#).unwrap();
        assert_eq!(config, ObjectStoreConfig::Memory);
    }
}
