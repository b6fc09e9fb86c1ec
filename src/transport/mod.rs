//! Peer Transport Module
//!
//! Byte-in, byte-out request/response plumbing between cluster members.
//! It knows nothing about cache messages; the peer layer encodes those.
//!
//! ## Wire Framing
//! Every message is a 4-byte big-endian length followed by that many bytes.
//! A connection carries any number of request/response pairs, strictly in turn.
//!
//! ## Components
//! - **`TcpClient`**: pooled client for one remote address, exposing `send`.
//! - **`TcpServer`**: accept loop that hands each inbound frame to a `Handler`.

pub mod client;
pub mod frame;
pub mod server;

pub use client::TcpClient;
pub use server::TcpServer;

use async_trait::async_trait;

/// Turns one inbound payload into one outbound payload.
///
/// An empty return value is sent as a zero-length frame, which the remote
/// side reads as "no response".
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn handle(&self, request: Vec<u8>) -> Vec<u8>;
}
