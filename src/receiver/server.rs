use std::net::SocketAddr;

use futures::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::foundation::error::PenResult;
use crate::foundation::shutdown::Shutdown;
use crate::receiver::handler::{MessageHandler, Outcome};

/// Default listen address of the pen endpoint.
pub const DEFAULT_BIND: &str = "127.0.0.1:8765";

/// WebSocket listener feeding a [`MessageHandler`].
///
/// Each accepted connection is served on its own task; a misbehaving peer only stalls its own
/// connection.
pub struct PenServer {
    listener: TcpListener,
    handler: MessageHandler,
}

impl PenServer {
    /// Bind the listener. Use port 0 to let the OS pick one.
    pub async fn bind(addr: impl ToSocketAddrs, handler: MessageHandler) -> PenResult<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, handler })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> PenResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections until `shutdown` fires.
    pub async fn run(self, shutdown: Shutdown) -> PenResult<()> {
        info!(addr = %self.local_addr()?, "pen server listening");
        loop {
            tokio::select! {
                _ = shutdown.wait() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let handler = self.handler.clone();
                        let shutdown = shutdown.clone();
                        tokio::spawn(async move {
                            if let Err(e) = serve_connection(stream, peer, handler, shutdown).await {
                                debug!(%peer, error = %e, "connection ended with error");
                            }
                        });
                    }
                    Err(e) => warn!(error = %e, "failed to accept connection"),
                },
            }
        }
        info!("pen server stopped");
        Ok(())
    }
}

/// Serve one peer: one pen message per frame, until the peer leaves or `shutdown` fires.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    handler: MessageHandler,
    shutdown: Shutdown,
) -> PenResult<()> {
    let mut ws = accept_async(stream).await?;
    info!(%peer, "peer connected");

    loop {
        let msg = tokio::select! {
            _ = shutdown.wait() => {
                let _ = ws.close(None).await;
                break;
            }
            msg = ws.next() => msg,
        };

        let msg = match msg {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                debug!(%peer, error = %e, "websocket error");
                break;
            }
            None => break,
        };

        let outcome = match msg {
            Message::Text(text) => handler.handle_text(&text),
            Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
                Ok(text) => handler.handle_text(text),
                Err(_) => {
                    debug!(%peer, len = bytes.len(), "ignoring non-utf8 binary frame");
                    continue;
                }
            },
            Message::Close(_) => {
                // Flush the queued close reply.
                let _ = ws.flush().await;
                break;
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => continue,
        };
        if let Outcome::Ignored(reason) = outcome {
            debug!(%peer, ?reason, "message ignored");
        }
    }

    info!(%peer, "peer disconnected");
    Ok(())
}
