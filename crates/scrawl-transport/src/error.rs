/// Failures surfaced by a transport or one of its connections.
///
/// I/O-backed variants keep the underlying error as a source; a closed
/// peer carries the close reason as text since WebSocket close frames
/// are not I/O errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer closed the connection, or it dropped mid-frame.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// An outbound frame could not be written.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// An inbound frame could not be read.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or completing a handshake failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
