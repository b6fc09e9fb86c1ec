//! Peer Wire Protocol
//!
//! Messages exchanged between cluster members, serialized with bincode.
//! Field order and types are part of the wire contract: changing them breaks
//! compatibility with nodes running the previous layout.

use serde::{Deserialize, Serialize};

/// `value` is the cached payload.
pub const STATUS_OK: u32 = 200;
/// The request named a group the receiving node does not have.
pub const STATUS_NOT_FOUND: u32 = 404;
/// Decode, loader or internal failure; `value` carries the error text.
pub const STATUS_INTERNAL_ERROR: u32 = 500;

/// Ask the owning node for `key` in cache group `group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerRequest {
    pub group: String,
    pub key: String,
}

/// Answer to a `PeerRequest`.
///
/// Only a `STATUS_OK` response carries cache content. Any other code means
/// `value` is a human-readable error message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeerResponse {
    pub value: Vec<u8>,
    pub code: u32,
}

impl PeerRequest {
    pub fn new(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            key: key.into(),
        }
    }

    pub fn encode(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}

impl PeerResponse {
    pub fn ok(value: Vec<u8>) -> Self {
        Self {
            value,
            code: STATUS_OK,
        }
    }

    pub fn error(code: u32, message: impl Into<String>) -> Self {
        Self {
            value: message.into().into_bytes(),
            code,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == STATUS_OK
    }

    pub fn encode(&self) -> bincode::Result<Vec<u8>> {
        bincode::serialize(self)
    }

    pub fn decode(bytes: &[u8]) -> bincode::Result<Self> {
        bincode::deserialize(bytes)
    }
}
