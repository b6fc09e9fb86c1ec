//! Cache Group Module
//!
//! A `Group` is one cache namespace: a loader that computes values on a full
//! miss, a bounded local store, and optionally a peer picker deciding which
//! cluster member owns each key.
//!
//! ## Lookup Order
//! 1. Local store hit -> return.
//! 2. Picker routes the key to a remote owner -> ask it. The answer is *not*
//!    stored here; only the owner caches a key.
//! 3. No remote owner, or the remote call failed -> run the loader and cache
//!    the result locally.
//!
//! ## Submodules
//! - **`group`**: the namespace itself plus the `Loader` capability.
//! - **`registry`**: name -> group lookup used by the peer server.

pub mod group;
pub mod registry;

pub use group::{Group, GroupStats, Loader, LoaderFn};
pub use registry::GroupRegistry;
