//! The board's single-byte command alphabet.
//!
//! Each command is one ASCII byte written to the serial link; the firmware
//! acknowledges text-mode commands with a human-readable message ending in
//! [`BANNER_TERMINATOR`].

/// Begin binary streaming.
pub const START_STREAM: u8 = b'b';

/// Stop streaming without disconnecting.
pub const STOP_STREAM: u8 = b's';

/// Soft reset; a 32-bit board replies with its boot banner.
pub const SOFT_RESET: u8 = b'v';

/// Ask the firmware to dump its register settings as text.
pub const QUERY_REGISTERS: u8 = b'?';

/// Enable the firmware's 60 Hz notch filter.
pub const FILTERS_ON: u8 = b'f';

/// Disable the notch filter.
pub const FILTERS_OFF: u8 = b'g';

/// Terminator the firmware appends to every text-mode reply.
pub const BANNER_TERMINATOR: &[u8] = b"$$$";

/// Per-channel enable commands, index 0 = channel 1.
const CHANNEL_ON: [u8; 8] = *b"qwertyui";

/// Per-channel disable commands, index 0 = channel 1.
const CHANNEL_OFF: [u8; 8] = *b"12345678";

/// Command byte enabling acquisition channel `channel` (1-based).
pub fn channel_on(channel: u8) -> Option<u8> {
    match channel {
        1..=8 => Some(CHANNEL_ON[usize::from(channel) - 1]),
        _ => None,
    }
}

/// Command byte disabling acquisition channel `channel` (1-based).
pub fn channel_off(channel: u8) -> Option<u8> {
    match channel {
        1..=8 => Some(CHANNEL_OFF[usize::from(channel) - 1]),
        _ => None,
    }
}
