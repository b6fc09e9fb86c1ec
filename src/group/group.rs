use crate::config::GroupConfig;
use crate::error::{CacheError, RemoteError, Result};
use crate::peers::client::PeerGetter;
use crate::peers::picker::{PeerPicker, Route};
use crate::store::{ByteView, LocalStore, LruStore};

use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

/// Computes the value of a key on a full cache miss.
#[async_trait]
pub trait Loader: Send + Sync {
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Adapts an async closure into a `Loader`.
pub struct LoaderFn<F>(pub F);

#[async_trait]
impl<F, Fut> Loader for LoaderFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send + 'static,
{
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key.to_string()).await
    }
}

#[derive(Default)]
struct Stats {
    gets: AtomicU64,
    cache_hits: AtomicU64,
    peer_loads: AtomicU64,
    peer_errors: AtomicU64,
    local_loads: AtomicU64,
    local_load_errs: AtomicU64,
    server_requests: AtomicU64,
}

/// Point-in-time copy of a group's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub name: String,
    /// Every caller-side `get`, including rejected ones. Served lookups count in `server_requests`.
    pub gets: u64,
    pub cache_hits: u64,
    /// Values returned by a remote owner.
    pub peer_loads: u64,
    /// Remote attempts that failed and fell back to the loader.
    pub peer_errors: u64,
    pub local_loads: u64,
    pub local_load_errs: u64,
    /// Lookups that arrived from other peers.
    pub server_requests: u64,
}

pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    store: Arc<dyn LocalStore>,
    peers: OnceLock<Arc<dyn PeerPicker>>,
    stats: Stats,
}

impl Group {
    pub fn new(name: impl Into<String>, config: GroupConfig, loader: Arc<dyn Loader>) -> Self {
        let store = Arc::new(LruStore::new(config.cache_bytes, config.ttl));
        Self::with_store(name, loader, store)
    }

    /// Group backed by a caller-provided store.
    pub fn with_store(
        name: impl Into<String>,
        loader: Arc<dyn Loader>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        Self {
            name: name.into(),
            loader,
            store,
            peers: OnceLock::new(),
            stats: Stats::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attaches the picker used to find key owners.
    ///
    /// # Panics
    /// If a picker is already registered. Swapping pickers while requests are
    /// in flight would make ownership decisions inconsistent.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        if self.peers.set(picker).is_err() {
            panic!("register_peers called more than once for group {}", self.name);
        }
    }

    /// Looks `key` up locally, then on its owner, then via the loader.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        self.stats.gets.fetch_add(1, Ordering::Relaxed);

        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        if let Some(value) = self.lookup_cache(key) {
            return Ok(value);
        }

        self.load(key).await
    }

    /// Value currently held in this node's store, without loading.
    pub fn cached(&self, key: &str) -> Option<ByteView> {
        self.store.get(key)
    }

    pub fn stats(&self) -> GroupStats {
        GroupStats {
            name: self.name.clone(),
            gets: self.stats.gets.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            peer_loads: self.stats.peer_loads.load(Ordering::Relaxed),
            peer_errors: self.stats.peer_errors.load(Ordering::Relaxed),
            local_loads: self.stats.local_loads.load(Ordering::Relaxed),
            local_load_errs: self.stats.local_load_errs.load(Ordering::Relaxed),
            server_requests: self.stats.server_requests.load(Ordering::Relaxed),
        }
    }

    /// Entry point for lookups arriving from other cluster members.
    ///
    /// Resolves from the local store or the loader only. The picker is never
    /// consulted, so a request is not forwarded again when two members
    /// disagree about who owns the key.
    pub(crate) async fn serve_peer(&self, key: &str) -> Result<ByteView> {
        self.stats.server_requests.fetch_add(1, Ordering::Relaxed);

        if key.is_empty() {
            return Err(CacheError::InvalidKey);
        }

        if let Some(value) = self.lookup_cache(key) {
            return Ok(value);
        }

        self.get_locally(key).await
    }

    fn lookup_cache(&self, key: &str) -> Option<ByteView> {
        let value = self.store.get(key)?;
        self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(group = %self.name, "[cache] hit {}", key);
        Some(value)
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(picker) = self.peers.get()
            && let Route::Remote(peer) = picker.pick_peer(key)
        {
            match self.get_from_peer(peer.as_ref(), key).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    self.stats.peer_errors.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        group = %self.name,
                        "Failed to get {} from peer {}: {}",
                        key,
                        peer.addr(),
                        e
                    );
                }
            }
        }

        self.get_locally(key).await
    }

    async fn get_from_peer(
        &self,
        peer: &dyn PeerGetter,
        key: &str,
    ) -> std::result::Result<ByteView, RemoteError> {
        let bytes = peer.get(&self.name, key).await?;
        self.stats.peer_loads.fetch_add(1, Ordering::Relaxed);
        Ok(ByteView::from(bytes))
    }

    async fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.loader.load(key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                self.stats.local_load_errs.fetch_add(1, Ordering::Relaxed);
                return Err(CacheError::loader(e));
            }
        };
        self.stats.local_loads.fetch_add(1, Ordering::Relaxed);

        let value = ByteView::from(bytes);
        self.store.add(key, value.clone());
        Ok(value)
    }
}
