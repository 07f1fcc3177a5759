//! Fragment storage facade
//!
//! This crate persists the two artifacts of a fragment, its metadata record and
//! its byte payload, behind a single backend-agnostic [`Store`].
//!
//! # Backends
//!
//! - [`MemoryBackend`]: ordered in-memory maps, volatile, for tests and development
//! - [`DurableBackend`]: SQLite table for metadata plus pluggable object storage
//!   (S3/MinIO/local filesystem/memory) for payloads
//!
//! Exactly one backend is selected at startup through [`StoreConfig`] and shared
//! by cloning the resulting [`Store`].
//!
//! # Example
//!
//! ```rust,no_run
//! use fragments_store::{Store, StoreConfig};
//!
//! # async fn example() -> Result<(), fragments_store::StoreError> {
//! let store = Store::from_config(&StoreConfig::Memory).await?;
//! let data = store.read_fragment_data("owner", "missing").await?;
//! assert!(data.is_none());
//! # Ok(())
//! # }
//! ```

mod backend;
mod durable;
mod error;
mod memory;
mod record;
mod store;

pub use backend::FragmentBackend;
pub use durable::{DurableBackend, ObjectStoreConfig};
pub use error::{Result, StoreError, StoreKind};
pub use memory::MemoryBackend;
pub use record::{FragmentList, FragmentRecord};
pub use store::{Store, StoreConfig};
