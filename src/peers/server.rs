//! Peer Request Dispatch
//!
//! The answering side of the peer protocol. Every inbound payload produces an
//! encoded `PeerResponse`:
//! - undecodable request -> 500 with the decode error,
//! - unknown group -> 404,
//! - group lookup failure -> 500 with the error text,
//! - otherwise 200 with the value.

use super::protocol::{PeerRequest, PeerResponse, STATUS_INTERNAL_ERROR, STATUS_NOT_FOUND};
use crate::error::CacheError;
use crate::group::registry::GroupRegistry;
use crate::transport::Handler;

use async_trait::async_trait;
use std::sync::Arc;

pub struct PeerService {
    self_addr: String,
    registry: Arc<GroupRegistry>,
}

impl PeerService {
    pub fn new(self_addr: impl Into<String>, registry: Arc<GroupRegistry>) -> Self {
        Self {
            self_addr: self_addr.into(),
            registry,
        }
    }

    /// Resolves one inbound payload to a response message.
    pub async fn respond(&self, payload: &[u8]) -> PeerResponse {
        let request = match PeerRequest::decode(payload) {
            Ok(request) => request,
            Err(e) => {
                let err = CacheError::Protocol(e.to_string());
                tracing::warn!(node = %self.self_addr, "{}", err);
                return PeerResponse::error(STATUS_INTERNAL_ERROR, err.to_string());
            }
        };

        let Some(group) = self.registry.get(&request.group) else {
            let err = CacheError::UnknownNamespace(request.group);
            tracing::warn!(node = %self.self_addr, "{}", err);
            return PeerResponse::error(STATUS_NOT_FOUND, err.to_string());
        };

        match group.serve_peer(&request.key).await {
            Ok(view) => {
                tracing::info!(
                    node = %self.self_addr,
                    "group: {}  key: {}",
                    request.group,
                    request.key
                );
                PeerResponse::ok(view.to_vec())
            }
            Err(e) => PeerResponse::error(STATUS_INTERNAL_ERROR, e.to_string()),
        }
    }
}

#[async_trait]
impl Handler for PeerService {
    async fn handle(&self, request: Vec<u8>) -> Vec<u8> {
        let response = self.respond(&request).await;
        match response.encode() {
            Ok(body) => body,
            Err(e) => {
                // The requester reads an empty frame as a connectivity failure.
                tracing::error!(node = %self.self_addr, "Failed to encode peer response: {}", e);
                Vec::new()
            }
        }
    }
}
