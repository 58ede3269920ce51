use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use super::codec::{encode_message, MessageReader};
use crate::error::AppResult;
use crate::registry::HookRegistry;

/// TCP server the test engine connects to.
pub struct HookServer {
    listener: TcpListener,
    registry: Arc<HookRegistry>,
}

impl HookServer {
    pub async fn bind(addr: &str, registry: Arc<HookRegistry>) -> AppResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, registry })
    }

    pub fn local_addr(&self) -> AppResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until the process exits.
    pub async fn serve(self) -> AppResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Serve until `shutdown` resolves. Connections already accepted keep
    /// running on their own tasks.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        info!("Hook handler listening on {}", self.local_addr()?);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("Hook handler shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!("Test engine connected from {}", peer);
                        let registry = Arc::clone(&self.registry);
                        tokio::spawn(async move {
                            match handle_connection(stream, registry).await {
                                Ok(()) => info!("Test engine {} disconnected", peer),
                                Err(e) => error!("Connection {} closed on error: {}", peer, e),
                            }
                        });
                    }
                    Err(e) => warn!("Failed to accept connection: {}", e),
                }
            }
        }
    }
}

/// Answer hook messages on one stream, in order, until EOF.
///
/// A failing hook ends the connection: the error is returned to the caller
/// and no reply is written for that message.
pub async fn handle_connection<S>(stream: S, registry: Arc<HookRegistry>) -> AppResult<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read_half, mut write_half) = tokio::io::split(stream);
    let mut reader = MessageReader::new(read_half);

    while let Some(mut message) = reader.next_message().await? {
        debug!(uuid = %message.uuid, event = %message.event, "Hook message received");
        registry.handle(&mut message)?;

        let frame = encode_message(&message)?;
        write_half.write_all(&frame).await?;
        write_half.flush().await?;
    }

    Ok(())
}
