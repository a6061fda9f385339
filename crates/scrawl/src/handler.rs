//! Per-connection handler: the duplex pump between one socket and the
//! room layer.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Send `welcome` with the connection's player id
//!   2. Loop: `select!` between inbound frames (decode, dispatch) and
//!      outbound events queued by whichever room the player is in
//!   3. On close, leave the current room so the game reacts

use std::sync::Arc;

use scrawl_protocol::{
    ClientCommand, Codec, JsonCodec, PlayerId, ServerEvent,
};
use scrawl_room::{RoomAction, RoomError};
use scrawl_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ScrawlError;
use crate::server::ServerState;

/// Drop guard that removes the player from their room when the handler
/// exits, panic included. `Drop` is synchronous, so the async part runs
/// in a fire-and-forget task.
struct DisconnectGuard {
    player_id: PlayerId,
    state: Arc<ServerState>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let mut registry = state.registry.lock().await;
            match registry.leave_room(player_id).await {
                Ok(()) | Err(RoomError::NotInRoom(_)) => {}
                Err(e) => {
                    tracing::debug!(%player_id, error = %e, "leave on disconnect failed");
                }
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ScrawlError> {
    // A player IS their connection: the id minted at accept time is the
    // identity rooms and events use.
    let player_id = PlayerId(conn.id().into_inner());
    let codec = JsonCodec;

    tracing::debug!(%player_id, "handling new connection");

    send_event(&conn, &codec, &ServerEvent::Welcome { player_id }).await?;

    // Events addressed to this player, from the room actor or from the
    // command dispatch below. The handler owns the only receiver.
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let _guard = DisconnectGuard {
        player_id,
        state: Arc::clone(&state),
    };

    loop {
        tokio::select! {
            frame = conn.recv() => match frame {
                Ok(Some(data)) => {
                    match codec.decode::<ClientCommand>(&data) {
                        Ok(command) => {
                            dispatch(&state, player_id, command, &events_tx)
                                .await;
                        }
                        Err(e) => {
                            tracing::debug!(
                                %player_id, error = %e,
                                "failed to decode command"
                            );
                            let _ = events_tx.send(ServerEvent::Error {
                                code: 400,
                                message: "invalid message".to_string(),
                            });
                        }
                    }
                }
                Ok(None) => {
                    tracing::info!(%player_id, "connection closed cleanly");
                    break;
                }
                Err(e) => {
                    tracing::debug!(%player_id, error = %e, "recv error");
                    break;
                }
            },
            event = events_rx.recv() => {
                // The handler holds `events_tx`, so recv never yields None.
                if let Some(event) = event {
                    send_event(&conn, &codec, &event).await?;
                }
            }
        }
    }

    // _guard drops here → the player leaves their room.
    Ok(())
}

/// Routes one decoded command. Failures become `error` events on the
/// player's own channel; nothing here tears the connection down.
async fn dispatch(
    state: &Arc<ServerState>,
    player_id: PlayerId,
    command: ClientCommand,
    events_tx: &mpsc::UnboundedSender<ServerEvent>,
) {
    let result = match command {
        ClientCommand::CreateRoom => {
            let code = state.registry.lock().await.create_room();
            let _ = events_tx.send(ServerEvent::RoomCreated { code });
            Ok(())
        }
        ClientCommand::JoinRoom { code, name } => {
            state
                .registry
                .lock()
                .await
                .join_room(player_id, &code, name, events_tx.clone())
                .await
        }
        ClientCommand::Stroke { code, stroke } => {
            state
                .registry
                .lock()
                .await
                .route(player_id, &code, RoomAction::Stroke(stroke))
                .await
        }
        ClientCommand::ClearCanvas { code } => {
            state
                .registry
                .lock()
                .await
                .route(player_id, &code, RoomAction::ClearCanvas)
                .await
        }
        ClientCommand::ChooseWord { code, word } => {
            state
                .registry
                .lock()
                .await
                .route(player_id, &code, RoomAction::ChooseWord(word))
                .await
        }
        ClientCommand::Guess { code, guess } => {
            state
                .registry
                .lock()
                .await
                .route(player_id, &code, RoomAction::Guess(guess))
                .await
        }
    };

    if let Err(e) = result {
        let _ = events_tx.send(ServerEvent::Error {
            code: error_code(&e),
            message: e.to_string(),
        });
    }
}

/// HTTP-flavored status for a room error, carried in the `error` event.
fn error_code(error: &RoomError) -> u16 {
    match error {
        RoomError::NotFound(_) | RoomError::PlayerNotFound(_, _) => 404,
        RoomError::AlreadyInRoom(_, _) => 409,
        RoomError::NotInRoom(_) => 400,
        RoomError::Unavailable(_) => 503,
    }
}

/// Encodes and sends one event on the socket.
async fn send_event(
    conn: &WebSocketConnection,
    codec: &JsonCodec,
    event: &ServerEvent,
) -> Result<(), ScrawlError> {
    let bytes = codec.encode(event)?;
    conn.send(&bytes).await.map_err(ScrawlError::Transport)
}
