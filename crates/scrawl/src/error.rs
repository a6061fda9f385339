//! Unified error type for the Scrawl server.

use scrawl_protocol::ProtocolError;
use scrawl_room::RoomError;
use scrawl_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ScrawlError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, already joined, unavailable).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let scrawl_err: ScrawlError = err.into();
        assert!(matches!(scrawl_err, ScrawlError::Transport(_)));
        assert!(scrawl_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let scrawl_err: ScrawlError = err.into();
        assert!(matches!(scrawl_err, ScrawlError::Protocol(_)));
    }

    #[test]
    fn test_from_room_error() {
        let err =
            RoomError::NotFound(scrawl_protocol::RoomCode::new("ZZZZ"));
        let scrawl_err: ScrawlError = err.into();
        assert!(matches!(scrawl_err, ScrawlError::Room(_)));
        assert!(scrawl_err.to_string().contains("ZZZZ"));
    }
}
