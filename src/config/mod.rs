//! Node and Group Configuration
//!
//! `NodeConfig` describes one cluster member: its own peer address, the full
//! peer list and the ring/transport tuning knobs. It can be read from a JSON
//! file and then overridden by command line flags in the node binary
//! (`NodeConfig::from_args`).
//!
//! `GroupConfig` carries the local store bounds for a single cache group.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_REPLICAS: usize = 50;
pub const DEFAULT_POOL_SIZE: usize = 1024;
pub const DEFAULT_PEER_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CACHE_BYTES: usize = 2 << 20;
pub const DEFAULT_TTL_SECS: u64 = 1024;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// This node's peer address, e.g. "127.0.0.1:8001". Also its ring identity.
    pub self_addr: String,
    /// Every cluster member's peer address, self included.
    pub peers: Vec<String>,
    /// Virtual points per node on the hash ring.
    pub replicas: usize,
    /// Address of the front-end HTTP API, if any.
    pub api_addr: Option<String>,
    /// Deadline for one peer round trip.
    pub peer_timeout_ms: u64,
    /// Idle connections kept per peer.
    pub pool_size: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            self_addr: "127.0.0.1:8001".to_string(),
            peers: Vec::new(),
            replicas: DEFAULT_REPLICAS,
            api_addr: None,
            peer_timeout_ms: DEFAULT_PEER_TIMEOUT_MS,
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

impl NodeConfig {
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self {
            self_addr: self_addr.into(),
            ..Default::default()
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: NodeConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Builds a config from `--flag value` pairs (program name excluded).
    ///
    /// `--config <file>` is the base layer wherever it appears; `--self`,
    /// `--peer`, `--api` and `--replicas` are applied on top of it. Self is
    /// always part of the resulting peer list.
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut config = match args.iter().position(|arg| arg == "--config") {
            Some(pos) => match args.get(pos + 1) {
                Some(path) => Self::from_file(path)?,
                None => anyhow::bail!("--config requires a file path"),
            },
            None => Self::default(),
        };
        let mut peers: Vec<String> = vec![];

        let mut i = 0;
        while i < args.len() {
            let value = args.get(i + 1).cloned();
            match (args[i].as_str(), value) {
                ("--config", Some(_)) => {
                    i += 2;
                }
                ("--self", Some(addr)) => {
                    config.self_addr = addr;
                    i += 2;
                }
                ("--peer", Some(addr)) => {
                    peers.push(addr);
                    i += 2;
                }
                ("--api", Some(addr)) => {
                    config.api_addr = Some(addr);
                    i += 2;
                }
                ("--replicas", Some(n)) => {
                    config.replicas = n
                        .parse()
                        .with_context(|| format!("invalid --replicas {}", n))?;
                    i += 2;
                }
                (flag, _) => {
                    tracing::warn!("Ignoring argument {}", flag);
                    i += 1;
                }
            }
        }

        if !peers.is_empty() {
            config.peers = peers;
        }
        if !config.peers.contains(&config.self_addr) {
            config.peers.push(config.self_addr.clone());
        }
        Ok(config)
    }

    pub fn peer_timeout(&self) -> Duration {
        Duration::from_millis(self.peer_timeout_ms)
    }

    /// Port part of `self_addr`, used to bind the peer listener.
    pub fn listen_port(&self) -> Result<u16> {
        let (_, port) = self
            .self_addr
            .rsplit_once(':')
            .ok_or_else(|| anyhow::anyhow!("self address {} has no port", self.self_addr))?;
        port.parse()
            .with_context(|| format!("invalid port in self address {}", self.self_addr))
    }
}

/// Local store bounds for one cache group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Byte capacity of the local store. Zero means unbounded.
    pub cache_bytes: usize,
    /// Lifetime of a cached entry.
    pub ttl: Duration,
}

impl Default for GroupConfig {
    fn default() -> Self {
        Self {
            cache_bytes: DEFAULT_CACHE_BYTES,
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }
}
