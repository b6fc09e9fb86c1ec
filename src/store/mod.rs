//! Local Store Module
//!
//! The bounded, process-local half of the cache. Each `Group` owns one store
//! and only ever talks to it through the `LocalStore` trait.
//!
//! ## Components
//! - **`ByteView`**: immutable, cheaply clonable handle over cached bytes.
//! - **`LruStore`**: byte-capacity LRU with a per-entry time-to-live.
//!
//! The store does its own locking; callers never wrap it in a lock.

pub mod byteview;
pub mod lru;

pub use byteview::ByteView;
pub use lru::LruStore;

/// Capability the cache group needs from its local store.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Option<ByteView>;
    fn add(&self, key: &str, value: ByteView);
}
