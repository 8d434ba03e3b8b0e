use std::fmt;
use std::io;

use cytonlink_board::BoardError;
use cytonlink_frame::FrameError;
use cytonlink_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::PermissionDenied => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::NoDeviceFound => {
            CliError::new(USAGE, format!("{context}: {err} (try --port)"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(source) => transport_error(context, source),
        FrameError::SyncLost { .. } => CliError::new(DATA_INVALID, format!("{context}: {err}")),
        FrameError::Stalled { .. } => CliError::new(TIMEOUT, format!("{context}: {err}")),
    }
}

pub fn board_error(context: &str, err: BoardError) -> CliError {
    match err {
        BoardError::Transport(source) => transport_error(context, source),
        BoardError::Frame(source) => frame_error(context, source),
        BoardError::HandshakeTimeout(_) => CliError::new(TIMEOUT, format!("{context}: {err}")),
        BoardError::InvalidChannel(_) => CliError::new(USAGE, format!("{context}: {err}")),
    }
}
