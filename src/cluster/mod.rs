//! Cluster Runtime Module
//!
//! `Cluster` is the per-process context tying the cache together: it owns the
//! group registry, the ring picker and the node settings, and it runs the peer
//! listener whose dispatch is bound to this registry. Nothing here is global,
//! so several independent clusters can live in one process (as the tests do).

use crate::config::{GroupConfig, NodeConfig};
use crate::group::{Group, GroupRegistry, GroupStats, Loader};
use crate::peers::{PeerService, RingPicker};
use crate::ring::{HashFn, default_hash};
use crate::transport::TcpServer;

use anyhow::{Context, Result};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

pub struct Cluster {
    config: NodeConfig,
    registry: Arc<GroupRegistry>,
    picker: Arc<RingPicker>,
}

impl Cluster {
    pub fn new(config: NodeConfig) -> Arc<Self> {
        Self::with_hash(config, default_hash)
    }

    /// Cluster whose ring uses `hash` instead of CRC-32.
    pub fn with_hash(config: NodeConfig, hash: HashFn) -> Arc<Self> {
        let picker = RingPicker::new(config.self_addr.clone())
            .with_replicas(config.replicas)
            .with_hash(hash)
            .with_pool_size(config.pool_size)
            .with_peer_timeout(config.peer_timeout());

        if !config.peers.is_empty() {
            picker.configure(config.peers.iter().cloned());
        }

        Arc::new(Self {
            config,
            registry: GroupRegistry::new(),
            picker: Arc::new(picker),
        })
    }

    pub fn self_addr(&self) -> &str {
        &self.config.self_addr
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<GroupRegistry> {
        &self.registry
    }

    pub fn picker(&self) -> &Arc<RingPicker> {
        &self.picker
    }

    /// Creates a group, registers it and routes its misses through this
    /// cluster's picker.
    pub fn create_group<L>(&self, name: &str, config: GroupConfig, loader: L) -> Arc<Group>
    where
        L: Loader + 'static,
    {
        let group = self.registry.create(name, config, Arc::new(loader));
        group.register_peers(self.picker.clone());
        group
    }

    pub fn group(&self, name: &str) -> Option<Arc<Group>> {
        self.registry.get(name)
    }

    pub fn stats(&self) -> Vec<GroupStats> {
        self.registry
            .list_groups()
            .iter()
            .filter_map(|name| self.registry.get(name))
            .map(|group| group.stats())
            .collect()
    }

    /// Replaces the peer set. Only routing changes; cached data stays put.
    pub fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.picker.configure(peers);
    }

    pub fn peer_service(&self) -> Arc<PeerService> {
        Arc::new(PeerService::new(
            self.config.self_addr.clone(),
            self.registry.clone(),
        ))
    }

    /// Binds the peer listener on all interfaces at the port of `self_addr`.
    pub async fn bind(&self) -> Result<TcpServer> {
        let port = self.config.listen_port()?;
        let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
        TcpServer::bind(addr)
            .await
            .with_context(|| format!("binding peer listener on {}", addr))
    }

    /// Binds and serves peer requests until the task is dropped.
    pub async fn serve(&self) -> Result<()> {
        let server = self.bind().await?;
        self.serve_on(server).await;
        Ok(())
    }

    /// Serves peer requests on an already bound listener.
    pub async fn serve_on(&self, server: TcpServer) {
        tracing::info!(node = %self.config.self_addr, "Peer server starting");
        server.run(self.peer_service()).await;
    }
}

#[cfg(test)]
mod tests;
