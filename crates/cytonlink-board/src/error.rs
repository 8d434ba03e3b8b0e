use std::time::Duration;

/// Errors that can occur in a board session.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] cytonlink_transport::TransportError),

    /// Framing-level error.
    #[error("frame error: {0}")]
    Frame(#[from] cytonlink_frame::FrameError),

    /// The boot banner never terminated within the handshake window.
    #[error("no banner terminator within {0:?}")]
    HandshakeTimeout(Duration),

    /// Channel number outside the board's 1-8 range.
    #[error("invalid channel {0} (board channels are 1-8)")]
    InvalidChannel(u8),
}

pub type Result<T> = std::result::Result<T, BoardError>;
