/// Errors that can occur while framing the board's byte stream.
///
/// Packet-local problems (skipped bytes, a corrupted end byte, a stall the
/// restart budget still covers) are resolved inside the framer and reported
/// as warnings; only stream-level failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// No start byte was found within the configured scan bound.
    #[error("no start byte within {scanned} scanned bytes")]
    SyncLost { scanned: usize },

    /// The device stayed silent through every restart attempt.
    #[error("device stalled after {retries} restart attempts")]
    Stalled { retries: u32 },

    /// The underlying byte link failed.
    #[error("link error: {0}")]
    Transport(#[from] cytonlink_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
