//! Serial byte-link abstraction for biosignal acquisition boards.
//!
//! Provides the [`ByteLink`] trait the framing layer reads from, plus the
//! [`SerialLink`] implementation over a USB serial port. This is the lowest
//! layer of cytonlink. Everything else builds on top of the byte link
//! provided here.

pub mod error;
pub mod link;
pub mod serial;

pub use error::{Result, TransportError};
pub use link::ByteLink;
pub use serial::{available_ports, find_board_port, is_board_port, SerialLink, DEFAULT_BAUD};

// Port metadata comes straight from the serial stack.
pub use serialport::SerialPortInfo;
