//! High-level acquisition board session.
//!
//! This is the "just works" layer. Open a board, run the boot handshake,
//! start streaming with a per-sample callback, toggle channels and filters.
//! The framing itself lives in `cytonlink-frame`; this crate owns the
//! command alphabet and session lifecycle around it.

pub mod board;
pub mod commands;
pub mod error;

pub use board::{Board, BoardConfig};
pub use commands::{
    channel_off, channel_on, BANNER_TERMINATOR, FILTERS_OFF, FILTERS_ON, QUERY_REGISTERS,
    SOFT_RESET, START_STREAM, STOP_STREAM,
};
pub use error::{BoardError, Result};
