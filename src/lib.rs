//! Distributed Read-Through Cache Library
//!
//! A process-local cache that, on a miss, either computes the value itself or
//! asks whichever cluster member owns the key, so each key is loaded once per
//! cluster instead of once per node.
//!
//! ## Architecture Modules
//! - **`ring`**: Consistent hashing with virtual replicas. Maps a key to its owner.
//! - **`peers`**: Key ownership (`RingPicker`), the peer client and the
//!   server-side dispatch of peer requests.
//! - **`group`**: Cache namespaces (`Group`) with their loaders, plus the
//!   name -> group `GroupRegistry`.
//! - **`store`**: Byte-bounded LRU with per-entry TTL backing each group.
//! - **`transport`**: Length-framed, connection-pooled TCP request/response.
//! - **`cluster`**: The per-process runtime context wiring all of the above.
//! - **`api`**: Client-facing HTTP endpoints.

pub mod api;
pub mod cluster;
pub mod config;
pub mod error;
pub mod group;
pub mod peers;
pub mod ring;
pub mod store;
pub mod transport;

pub use cluster::Cluster;
pub use config::{GroupConfig, NodeConfig};
pub use error::{CacheError, RemoteError};
pub use group::{Group, Loader, LoaderFn};
pub use store::ByteView;
