use super::Handler;
use super::frame::{read_frame, write_frame};

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

pub struct TcpServer {
    listener: TcpListener,
}

impl TcpServer {
    pub async fn bind(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener })
    }

    pub fn from_listener(listener: TcpListener) -> Self {
        Self { listener }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections forever, one task per connection.
    pub async fn run(self, handler: Arc<dyn Handler>) {
        tracing::info!("Transport listening on {:?}", self.listener.local_addr().ok());

        loop {
            match self.listener.accept().await {
                Ok((stream, remote)) => {
                    let handler = handler.clone();
                    tokio::spawn(async move {
                        if let Err(e) = serve_connection(stream, handler).await {
                            tracing::debug!("Connection from {} closed: {}", remote, e);
                        }
                    });
                }
                Err(e) => {
                    tracing::error!("Failed to accept connection: {}", e);
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}

async fn serve_connection(mut stream: TcpStream, handler: Arc<dyn Handler>) -> io::Result<()> {
    stream.set_nodelay(true)?;

    while let Some(request) = read_frame(&mut stream).await? {
        let response = handler.handle(request).await;
        write_frame(&mut stream, &response).await?;
    }

    Ok(())
}
