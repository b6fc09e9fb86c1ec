use super::protocol::{PeerRequest, PeerResponse};
use crate::config::{DEFAULT_PEER_TIMEOUT_MS, DEFAULT_POOL_SIZE};
use crate::error::RemoteError;
use crate::transport::TcpClient;

use async_trait::async_trait;
use std::time::Duration;

/// Fetches a value for `(group, key)` from one remote cluster member.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, RemoteError>;

    /// Address of the peer, for logging.
    fn addr(&self) -> &str;
}

/// `PeerGetter` over the pooled TCP transport.
///
/// Performs exactly one round trip per call. Retrying, or falling back to a
/// local load, is up to the caller.
pub struct PeerClient {
    transport: TcpClient,
    timeout: Duration,
}

impl PeerClient {
    pub fn new(addr: impl Into<String>, pool_size: usize, timeout: Duration) -> Self {
        Self {
            transport: TcpClient::new(addr, pool_size),
            timeout,
        }
    }

    /// Client for querying a cluster member from outside the cluster.
    pub fn connect(addr: impl Into<String>) -> Self {
        Self::new(
            addr,
            DEFAULT_POOL_SIZE,
            Duration::from_millis(DEFAULT_PEER_TIMEOUT_MS),
        )
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl PeerGetter for PeerClient {
    async fn get(&self, group: &str, key: &str) -> Result<Vec<u8>, RemoteError> {
        let body = PeerRequest::new(group, key)
            .encode()
            .map_err(|e| RemoteError::Encode(e.to_string()))?;

        let bytes = tokio::time::timeout(self.timeout, self.transport.send(&body))
            .await
            .map_err(|_| RemoteError::Timeout(self.timeout))??;

        if bytes.is_empty() {
            return Err(RemoteError::EmptyResponse);
        }

        let response =
            PeerResponse::decode(&bytes).map_err(|e| RemoteError::Decode(e.to_string()))?;

        if !response.is_ok() {
            return Err(RemoteError::Status {
                code: response.code,
                message: String::from_utf8_lossy(&response.value).into_owned(),
            });
        }

        Ok(response.value)
    }

    fn addr(&self) -> &str {
        self.transport.addr()
    }
}
