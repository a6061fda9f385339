//! Error types for the room layer.

use scrawl_protocol::{PlayerId, RoomCode};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room exists with the given code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// The player is not registered in the room.
    #[error("player {0} not in room {1}")]
    PlayerNotFound(PlayerId, RoomCode),

    /// The player is already in a (different) room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomCode),

    /// The player is in no room at all.
    #[error("player {0} is not in a room")]
    NotInRoom(PlayerId),

    /// The room's command channel is full or the actor is gone.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
