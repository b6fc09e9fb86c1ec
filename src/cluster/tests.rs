//! Cluster Tests
//!
//! End-to-end scenarios over real loopback TCP: one-node clusters, key
//! ownership across two nodes, and fallback when the owner is unreachable.

#[cfg(test)]
mod tests {
    use crate::cluster::Cluster;
    use crate::config::{GroupConfig, NodeConfig};
    use crate::error::{CacheError, RemoteError};
    use crate::group::{Group, Loader};
    use crate::peers::protocol::STATUS_NOT_FOUND;
    use crate::peers::{PeerClient, PeerGetter};
    use crate::transport::TcpServer;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers every key with a fixed value and counts calls.
    struct FixedLoader {
        value: &'static str,
        calls: AtomicUsize,
    }

    impl FixedLoader {
        fn new(value: &'static str) -> Arc<Self> {
            Arc::new(Self {
                value,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Loader for FixedLoader {
        async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match key {
                "Nobody" => Err(anyhow::anyhow!("{} not exist", key)),
                _ => Ok(self.value.as_bytes().to_vec()),
            }
        }
    }

    /// Lets a test keep a handle on the loader it gave to a group.
    struct Shared(Arc<FixedLoader>);

    #[async_trait]
    impl Loader for Shared {
        async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
            self.0.load(key).await
        }
    }

    struct Node {
        cluster: Arc<Cluster>,
        group: Arc<Group>,
        loader: Arc<FixedLoader>,
    }

    /// Binds a loopback listener first so the node knows its own address.
    async fn bind_loopback() -> (TcpServer, String) {
        let server = TcpServer::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap().to_string();
        (server, addr)
    }

    fn start_node(server: TcpServer, addr: &str, peers: &[String], value: &'static str) -> Node {
        let mut config = NodeConfig::new(addr);
        config.peers = peers.to_vec();
        config.peer_timeout_ms = 1_000;

        let cluster = Cluster::new(config);
        let loader = FixedLoader::new(value);
        let group = cluster.create_group("scores", GroupConfig::default(), Shared(loader.clone()));

        let serving = cluster.clone();
        tokio::spawn(async move { serving.serve_on(server).await });

        Node {
            cluster,
            group,
            loader,
        }
    }

    /// A key the ring assigns to `owner`.
    fn key_owned_by(cluster: &Cluster, owner: &str) -> String {
        (0..10_000)
            .map(|i| format!("X{}", i))
            .find(|key| cluster.picker().owner_of(key).as_deref() == Some(owner))
            .expect("some key should land on every node")
    }

    // ============================================================
    // SINGLE NODE
    // ============================================================

    #[tokio::test]
    async fn test_single_node_loads_once() {
        let (server, addr) = bind_loopback().await;
        let node = start_node(server, &addr, &[], "630");

        assert_eq!(node.group.get("Tom").await.unwrap().as_slice(), b"630");
        assert_eq!(node.loader.calls(), 1);

        assert_eq!(node.group.get("Tom").await.unwrap().as_slice(), b"630");
        assert_eq!(node.loader.calls(), 1);

        assert!(matches!(
            node.group.get("Nobody").await,
            Err(CacheError::Loader(_))
        ));
    }

    #[tokio::test]
    async fn test_registry_is_per_cluster() {
        let one = Cluster::new(NodeConfig::new("127.0.0.1:1"));
        let two = Cluster::new(NodeConfig::new("127.0.0.1:2"));
        one.create_group("scores", GroupConfig::default(), Shared(FixedLoader::new("1")));

        assert!(one.group("scores").is_some());
        assert!(two.group("scores").is_none());
    }

    // ============================================================
    // TWO NODES
    // ============================================================

    #[tokio::test]
    async fn test_owner_computes_and_caches_requester_does_not() {
        let (server_a, addr_a) = bind_loopback().await;
        let (server_b, addr_b) = bind_loopback().await;
        let peers = vec![addr_a.clone(), addr_b.clone()];

        let a = start_node(server_a, &addr_a, &peers, "from-a");
        let b = start_node(server_b, &addr_b, &peers, "v");

        let key = key_owned_by(&a.cluster, &addr_b);
        assert_eq!(
            b.cluster.picker().owner_of(&key).as_deref(),
            Some(addr_b.as_str()),
            "both members must agree on ownership"
        );

        let value = a.group.get(&key).await.unwrap();
        assert_eq!(value.as_slice(), b"v");
        assert_eq!(a.loader.calls(), 0);
        assert_eq!(b.loader.calls(), 1);

        assert!(a.group.cached(&key).is_none());
        assert!(b.group.cached(&key).is_some());

        // The requester keeps asking the owner; the owner serves from cache.
        assert_eq!(a.group.get(&key).await.unwrap().as_slice(), b"v");
        assert_eq!(b.loader.calls(), 1);
        assert_eq!(b.group.stats().server_requests, 2);
        assert_eq!(a.group.stats().peer_loads, 2);
    }

    #[tokio::test]
    async fn test_owner_loader_error_falls_back_to_requester_loader() {
        let (server_a, addr_a) = bind_loopback().await;
        let (server_b, addr_b) = bind_loopback().await;
        let peers = vec![addr_a.clone(), addr_b.clone()];

        let a = start_node(server_a, &addr_a, &peers, "from-a");
        let _b = start_node(server_b, &addr_b, &peers, "v");

        // "Nobody" fails on every loader. Whichever node owns it, the caller
        // sees a loader error rather than a remote error.
        assert!(matches!(
            a.group.get("Nobody").await,
            Err(CacheError::Loader(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_owner_falls_back_to_loader() {
        let (server_a, addr_a) = bind_loopback().await;
        let (dead, addr_dead) = bind_loopback().await;
        drop(dead);
        let peers = vec![addr_a.clone(), addr_dead.clone()];

        let a = start_node(server_a, &addr_a, &peers, "local");
        let key = key_owned_by(&a.cluster, &addr_dead);

        let value = a.group.get(&key).await.unwrap();
        assert_eq!(value.as_slice(), b"local");
        assert_eq!(a.loader.calls(), 1);
        assert_eq!(a.group.stats().peer_errors, 1);

        // Loaded locally, so cached locally.
        assert!(a.group.cached(&key).is_some());
    }

    #[tokio::test]
    async fn test_unknown_namespace_returns_404() {
        let (server, addr) = bind_loopback().await;
        let _node = start_node(server, &addr, &[], "v");

        let client = PeerClient::connect(addr).with_timeout(Duration::from_secs(1));
        match client.get("unknown", "Tom").await {
            Err(RemoteError::Status { code, .. }) => assert_eq!(code, STATUS_NOT_FOUND),
            other => panic!("expected 404, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_served_lookup_is_not_forwarded_when_views_disagree() {
        let (server_a, addr_a) = bind_loopback().await;
        let (server_b, addr_b) = bind_loopback().await;

        // A sees both members, B only knows A and routes every key there.
        let a = start_node(server_a, &addr_a, &[addr_a.clone(), addr_b.clone()], "from-a");
        let b = start_node(server_b, &addr_b, &[addr_a.clone()], "v");

        let key = key_owned_by(&a.cluster, &addr_b);
        assert_eq!(
            b.cluster.picker().owner_of(&key).as_deref(),
            Some(addr_a.as_str())
        );

        let value = a.group.get(&key).await.unwrap();
        assert_eq!(value.as_slice(), b"v");

        // B answers from its own loader instead of bouncing the key back.
        assert_eq!(b.loader.calls(), 1);
        assert_eq!(a.loader.calls(), 0);
        assert_eq!(b.group.stats().server_requests, 1);
        assert_eq!(b.group.stats().peer_loads, 0);
        assert_eq!(a.group.stats().server_requests, 0);
        assert_eq!(a.group.stats().peer_loads, 1);
    }

    #[tokio::test]
    async fn test_set_peers_reroutes_without_moving_data() {
        let (server_a, addr_a) = bind_loopback().await;
        let (server_b, addr_b) = bind_loopback().await;
        let peers = vec![addr_a.clone(), addr_b.clone()];

        let a = start_node(server_a, &addr_a, &peers, "from-a");
        let b = start_node(server_b, &addr_b, &peers, "v");

        let key = key_owned_by(&a.cluster, &addr_b);
        a.group.get(&key).await.unwrap();
        assert_eq!(b.loader.calls(), 1);

        // B leaves A's view: A now owns everything and loads it itself.
        a.cluster.set_peers([addr_a.clone()]);
        assert_eq!(a.group.get(&key).await.unwrap().as_slice(), b"from-a");
        assert_eq!(a.loader.calls(), 1);
        assert!(b.group.cached(&key).is_some());
    }
}
