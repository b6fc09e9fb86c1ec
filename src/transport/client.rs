//! Pooled Transport Client
//!
//! Keeps up to `pool_size` idle connections to one address. A request takes an
//! idle connection (or dials a new one), performs one frame exchange, and puts
//! the connection back on success. Broken connections are simply dropped.

use super::frame::{read_frame, write_frame};

use parking_lot::Mutex;
use std::io;
use tokio::net::TcpStream;

pub struct TcpClient {
    addr: String,
    idle: Mutex<Vec<TcpStream>>,
    pool_size: usize,
}

impl TcpClient {
    /// Does not connect; the first `send` dials.
    pub fn new(addr: impl Into<String>, pool_size: usize) -> Self {
        Self {
            addr: addr.into(),
            idle: Mutex::new(Vec::new()),
            pool_size,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    pub fn idle_connections(&self) -> usize {
        self.idle.lock().len()
    }

    /// Sends `payload` and waits for the matching response frame.
    pub async fn send(&self, payload: &[u8]) -> io::Result<Vec<u8>> {
        if let Some(mut stream) = self.checkout() {
            match exchange(&mut stream, payload).await {
                Ok(response) => {
                    self.checkin(stream);
                    return Ok(response);
                }
                Err(e) => {
                    // Idle connections go stale when the peer restarts; redial once.
                    tracing::debug!("Pooled connection to {} failed: {}", self.addr, e);
                }
            }
        }

        let mut stream = self.dial().await?;
        let response = exchange(&mut stream, payload).await?;
        self.checkin(stream);
        Ok(response)
    }

    async fn dial(&self) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(&self.addr).await?;
        stream.set_nodelay(true)?;
        tracing::trace!("Dialed {}", self.addr);
        Ok(stream)
    }

    fn checkout(&self) -> Option<TcpStream> {
        self.idle.lock().pop()
    }

    fn checkin(&self, stream: TcpStream) {
        let mut idle = self.idle.lock();
        if idle.len() < self.pool_size {
            idle.push(stream);
        }
    }
}

async fn exchange(stream: &mut TcpStream, payload: &[u8]) -> io::Result<Vec<u8>> {
    write_frame(stream, payload).await?;
    read_frame(stream).await?.ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before response",
        )
    })
}
