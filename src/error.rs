//! Error Types
//!
//! Typed failures surfaced by the cache core. Application-facing code (loaders,
//! the node binary) keeps using `anyhow`; the library boundary speaks `CacheError`.

use std::time::Duration;

/// Result alias for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Everything a `Group::get` (or a peer round trip) can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Empty key. Caller error, rejected before any lookup.
    #[error("key is required")]
    InvalidKey,

    /// The application loader failed to produce a value.
    #[error("{0}")]
    Loader(String),

    /// A peer round trip failed. The group recovers from this locally.
    #[error("peer request failed: {0}")]
    Remote(#[from] RemoteError),

    /// An inbound peer request named a group this node does not know.
    #[error("no group: {0}")]
    UnknownNamespace(String),

    /// Inbound bytes could not be decoded as a peer request.
    #[error("malformed peer request: {0}")]
    Protocol(String),
}

impl CacheError {
    /// Flattens an application error (with its cause chain) into a loader failure.
    pub fn loader(err: anyhow::Error) -> Self {
        CacheError::Loader(format!("{:#}", err))
    }
}

/// Failure modes of one request/response exchange with a peer.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("transport: {0}")]
    Transport(#[from] std::io::Error),

    /// The transport returned nothing. Treated as a connectivity failure.
    #[error("no response from server")]
    EmptyResponse,

    #[error("decode: {0}")]
    Decode(String),

    #[error("encode: {0}")]
    Encode(String),

    /// The peer answered with a non-200 status; `message` is its error text.
    #[error("status {code}: {message}")]
    Status { code: u32, message: String },

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
