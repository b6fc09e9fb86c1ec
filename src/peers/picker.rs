//! Ring-based Peer Picker
//!
//! Owns the hash ring and one `PeerClient` per remote member. Both live in a
//! single immutable `PeerSet` snapshot; `configure` builds a new snapshot and
//! swaps it in under the write lock, so a reader always sees a ring and a
//! client map that belong together.

use super::client::{PeerClient, PeerGetter};
use crate::config::{DEFAULT_PEER_TIMEOUT_MS, DEFAULT_POOL_SIZE, DEFAULT_REPLICAS};
use crate::ring::{HashFn, HashRing, default_hash};

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Where a cache miss should be resolved.
pub enum Route {
    /// Compute with the group's own loader.
    Local,
    /// Ask the owning peer.
    Remote(Arc<dyn PeerGetter>),
}

impl Route {
    pub fn is_remote(&self) -> bool {
        matches!(self, Route::Remote(_))
    }
}

/// Chooses the owner of a key.
pub trait PeerPicker: Send + Sync {
    fn pick_peer(&self, key: &str) -> Route;
}

struct PeerSet {
    ring: HashRing,
    clients: HashMap<String, Arc<PeerClient>>,
}

pub struct RingPicker {
    self_addr: String,
    replicas: usize,
    hash: HashFn,
    pool_size: usize,
    peer_timeout: Duration,
    current: RwLock<Arc<PeerSet>>,
}

impl RingPicker {
    /// Picker with no peers. Until `configure` runs, every key is local.
    pub fn new(self_addr: impl Into<String>) -> Self {
        let replicas = DEFAULT_REPLICAS;
        let hash: HashFn = default_hash;
        Self {
            self_addr: self_addr.into(),
            replicas,
            hash,
            pool_size: DEFAULT_POOL_SIZE,
            peer_timeout: Duration::from_millis(DEFAULT_PEER_TIMEOUT_MS),
            current: RwLock::new(Arc::new(PeerSet {
                ring: HashRing::build(Vec::<String>::new(), replicas, hash),
                clients: HashMap::new(),
            })),
        }
    }

    pub fn with_replicas(mut self, replicas: usize) -> Self {
        self.replicas = replicas;
        self
    }

    pub fn with_hash(mut self, hash: HashFn) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_pool_size(mut self, pool_size: usize) -> Self {
        self.pool_size = pool_size;
        self
    }

    pub fn with_peer_timeout(mut self, timeout: Duration) -> Self {
        self.peer_timeout = timeout;
        self
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    /// Replaces the peer set. `peers` should include this node's own address.
    ///
    /// Clients of peers that stay in the set are carried over, keeping their
    /// pooled connections.
    pub fn configure<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let peers: Vec<String> = peers.into_iter().map(Into::into).collect();
        let ring = HashRing::build(peers.iter().cloned(), self.replicas, self.hash);

        let mut current = self.current.write();

        let mut clients = HashMap::with_capacity(peers.len());
        for peer in peers {
            if peer == self.self_addr || clients.contains_key(&peer) {
                continue;
            }
            let client = match current.clients.get(&peer) {
                Some(existing) => existing.clone(),
                None => Arc::new(PeerClient::new(
                    peer.clone(),
                    self.pool_size,
                    self.peer_timeout,
                )),
            };
            clients.insert(peer, client);
        }

        tracing::info!(
            node = %self.self_addr,
            "Configured {} remote peers ({} ring points)",
            clients.len(),
            ring.point_count()
        );

        *current = Arc::new(PeerSet { ring, clients });
    }

    /// Ring owner of `key`, or `None` if no peers are configured.
    pub fn owner_of(&self, key: &str) -> Option<String> {
        let peers = self.snapshot();
        peers.ring.resolve(key).map(str::to_string)
    }

    /// Addresses of the remote peers in the current configuration.
    pub fn remote_peers(&self) -> Vec<String> {
        let mut peers: Vec<String> = self.snapshot().clients.keys().cloned().collect();
        peers.sort();
        peers
    }

    fn snapshot(&self) -> Arc<PeerSet> {
        self.current.read().clone()
    }
}

impl PeerPicker for RingPicker {
    fn pick_peer(&self, key: &str) -> Route {
        let peers = self.snapshot();

        match peers.ring.resolve(key) {
            Some(owner) if owner != self.self_addr => match peers.clients.get(owner) {
                Some(client) => {
                    tracing::debug!(node = %self.self_addr, "Pick peer {}", owner);
                    Route::Remote(client.clone() as Arc<dyn PeerGetter>)
                }
                None => Route::Local,
            },
            _ => Route::Local,
        }
    }
}
