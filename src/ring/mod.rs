//! Consistent Hashing Module
//!
//! Maps an arbitrary key to the one cluster member that owns it.
//!
//! Each node is placed on a 32-bit hash ring many times (virtual replicas) so
//! that nodes of equal weight receive similar shares of the keyspace, and so
//! that adding or removing a node only moves the keys adjacent to its points.
//!
//! A `HashRing` is immutable: topology changes build a fresh ring which the
//! peer picker swaps in as a whole.

pub mod hash_ring;

pub use hash_ring::{HashFn, HashRing, default_hash};
