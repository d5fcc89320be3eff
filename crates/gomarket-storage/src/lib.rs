//! Async key-value persistence for GoMarketplace client state.
//!
//! Client-side state (the cart, mostly) is mirrored into a small string
//! key-value store. This crate defines that capability as the
//! [`KeyValueStore`] trait and ships two engines:
//!
//! - [`MemoryStore`] - process-local map, for tests and ephemeral sessions
//! - [`FileStore`] - a single JSON document on disk, written atomically
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarket_storage::{store_key, FileStore, KeyValueStore};
//!
//! let store = FileStore::new("/var/lib/gomarket/storage.json");
//! let key = store_key!("@GoMarketplace", "products");
//!
//! store.set(&key, "[]".to_string()).await?;
//! let raw: Option<String> = store.get(&key).await?;
//! store.remove(&key).await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::KeyValueStore;
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{FileStore, KeyValueStore, MemoryStore, StoreError};
}
