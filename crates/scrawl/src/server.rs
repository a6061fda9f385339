//! `ScrawlServer`: the accept loop and shared state.
//!
//! Ties the layers together: transport → protocol → rooms. One handler
//! task per connection; one reaper task that deletes rooms after they
//! retire themselves.

use std::sync::Arc;

use scrawl_room::RoomRegistry;
use scrawl_transport::{Transport, WebSocketTransport};
use tokio::sync::{Mutex, mpsc};

use crate::ScrawlError;
use crate::config::ServerConfig;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The
/// registry sits behind a `Mutex`; handlers hold it only long enough to
/// look up or mutate the room table, never across room I/O that could
/// take long.
pub(crate) struct ServerState {
    pub(crate) registry: Mutex<RoomRegistry>,
}

/// A running Scrawl server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ScrawlServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
    retired: mpsc::UnboundedReceiver<scrawl_protocol::RoomCode>,
}

impl ScrawlServer {
    /// Binds the listener and prepares the room registry.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ScrawlError> {
        let transport = WebSocketTransport::bind(&config.addr).await?;

        let (retired_tx, retired_rx) = mpsc::unbounded_channel();
        let state = Arc::new(ServerState {
            registry: Mutex::new(RoomRegistry::new(
                config.game.clone(),
                retired_tx,
            )),
        });

        Ok(Self {
            transport,
            state,
            retired: retired_rx,
        })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ScrawlError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server: the reaper task plus the accept loop. Runs until
    /// the process is terminated.
    pub async fn run(mut self) -> Result<(), ScrawlError> {
        tracing::info!("Scrawl server running");

        // Rooms announce their own retirement (everyone left, or the
        // post-game linger elapsed); the reaper drops them from the
        // registry.
        let reaper_state = Arc::clone(&self.state);
        let mut retired = self.retired;
        tokio::spawn(async move {
            while let Some(code) = retired.recv().await {
                reaper_state.registry.lock().await.delete_room(&code);
            }
        });

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
