use peercache::api;
use peercache::cluster::Cluster;
use peercache::config::{GroupConfig, NodeConfig};
use peercache::group::LoaderFn;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const DEMO_GROUP: &str = "scores";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 3 {
        eprintln!(
            "Usage: {} --self <host:port> [--peer <host:port>]... [--api <host:port>] [--replicas <n>] [--config <file.json>]",
            args[0]
        );
        eprintln!("Example: {} --self 127.0.0.1:8001 --api 127.0.0.1:9999", args[0]);
        eprintln!(
            "Example: {} --self 127.0.0.1:8002 --peer 127.0.0.1:8001 --peer 127.0.0.1:8002",
            args[0]
        );
        std::process::exit(1);
    }

    let config = NodeConfig::from_args(&args[1..])?;

    tracing::info!("Starting node {}", config.self_addr);
    tracing::info!("Cluster peers: {:?}", config.peers);

    let cluster = Cluster::new(config.clone());

    let db: Arc<HashMap<&'static str, &'static str>> =
        Arc::new([("Tom", "630"), ("Jack", "589"), ("Sam", "567")].into());
    cluster.create_group(
        DEMO_GROUP,
        GroupConfig::default(),
        LoaderFn(move |key: String| {
            let db = db.clone();
            async move {
                tracing::info!("[SlowDB] search key {}", key);
                tokio::time::sleep(Duration::from_millis(50)).await;
                match db.get(key.as_str()) {
                    Some(value) => Ok(value.as_bytes().to_vec()),
                    None => Err(anyhow::anyhow!("{} not exist", key)),
                }
            }
        }),
    );

    let peer_server = cluster.bind().await?;
    let peer_cluster = cluster.clone();
    tokio::spawn(async move {
        peer_cluster.serve_on(peer_server).await;
    });

    match config.api_addr {
        Some(api_addr) => {
            let app = api::router(cluster.clone(), DEMO_GROUP);
            let listener = tokio::net::TcpListener::bind(&api_addr).await?;
            tracing::info!("Frontend server is running at {}", api_addr);
            axum::serve(listener, app).await?;
        }
        None => {
            tokio::signal::ctrl_c().await?;
            tracing::info!("Shutting down");
        }
    }

    Ok(())
}
