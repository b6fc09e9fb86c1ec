//! Peer Coordination Module
//!
//! Decides which cluster member owns a key and moves cache lookups between
//! members when the owner is somebody else.
//!
//! ## Request Flow
//! 1. A `Group` misses locally and asks its `PeerPicker` for a `Route`.
//! 2. `RingPicker` resolves the key on the current hash ring snapshot. If the
//!    owner is another node, it hands back that node's `PeerClient`.
//! 3. `PeerClient` encodes a `PeerRequest`, sends it over the pooled transport
//!    and decodes the `PeerResponse`.
//! 4. On the owner, `PeerService` decodes the request, finds the named group in
//!    the registry and answers from that group.
//!
//! ## Submodules
//! - **`protocol`**: wire messages and status codes.
//! - **`client`**: the requesting side (`PeerGetter`, `PeerClient`).
//! - **`picker`**: key ownership (`PeerPicker`, `RingPicker`, `Route`).
//! - **`server`**: the answering side (`PeerService`).

pub mod client;
pub mod picker;
pub mod protocol;
pub mod server;

pub use client::{PeerClient, PeerGetter};
pub use picker::{PeerPicker, RingPicker, Route};
pub use server::PeerService;
