//! Packet framing and sample decoding for the board's binary stream.
//!
//! This is the core value-add layer of cytonlink. The board emits
//! fixed-length 33-byte packets at a steady rate:
//! - A start sentinel (0xA0) and an end sentinel (0xC0)
//! - A wrapping 8-bit packet id
//! - 8 channels of 24-bit big-endian two's-complement ADC counts
//! - 3 auxiliary 16-bit signed accelerometer values
//!
//! [`PacketFramer`] locates packet boundaries in the unframed byte stream,
//! recovers from corruption and device stalls, and hands back complete
//! [`Sample`] values. No partial packets, no buffer management in user code.

pub mod codec;
pub mod error;
pub mod framer;
pub mod sample;

pub use codec::{
    decode_aux16, decode_count24, encode_count24, encode_packet, AUX_COUNT, CHANNEL_COUNT,
    END_BYTE, PACKET_SIZE, SCALE_UV_PER_COUNT, START_BYTE,
};
pub use error::{FrameError, Result};
pub use framer::{FramerConfig, PacketFramer, Phase};
pub use sample::Sample;
