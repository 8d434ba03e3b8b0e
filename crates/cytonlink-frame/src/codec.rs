use bytes::{BufMut, BytesMut};

/// Start-of-packet sentinel.
pub const START_BYTE: u8 = 0xA0;

/// End-of-packet sentinel.
pub const END_BYTE: u8 = 0xC0;

/// Acquisition channels per packet.
pub const CHANNEL_COUNT: usize = 8;

/// Auxiliary (accelerometer) values per packet.
pub const AUX_COUNT: usize = 3;

/// Bytes per channel value on the wire.
pub const CHANNEL_BYTES: usize = 3;

/// Bytes per auxiliary value on the wire.
pub const AUX_BYTES: usize = 2;

/// Total packet length:
/// start (1) + id (1) + channels (8 × 3) + aux (3 × 2) + end (1).
pub const PACKET_SIZE: usize = 2 + CHANNEL_COUNT * CHANNEL_BYTES + AUX_COUNT * AUX_BYTES + 1;

/// ADC reference voltage in volts, fixed by the ADS1299 hardware.
pub const ADS1299_VREF: f64 = 4.5;

/// Programmable gain the board firmware configures on every channel.
pub const ADS1299_GAIN: f64 = 24.0;

/// Microvolts per raw ADC count.
///
/// `Vref / (2^23 - 1) / (gain * 1e6)` — a fixed linear transform from
/// 24-bit counts to physical microvolts.
pub const SCALE_UV_PER_COUNT: f64 =
    ADS1299_VREF / (((1_i64 << 23) - 1) as f64) / (ADS1299_GAIN * 1_000_000.0);

/// Decode a 3-byte big-endian two's-complement channel value.
///
/// The top bit of `raw[0]` is the sign bit of the full 24-bit value.
/// Assembling into the low 24 bits of an `i32` and arithmetic-shifting
/// through bit 31 sign-extends exactly: a top byte >= 0x80 fills the high
/// byte with 0xFF, anything lower fills it with 0x00.
pub fn decode_count24(raw: [u8; CHANNEL_BYTES]) -> i32 {
    let unextended =
        (i32::from(raw[0]) << 16) | (i32::from(raw[1]) << 8) | i32::from(raw[2]);
    (unextended << 8) >> 8
}

/// Encode a 24-bit count back to its 3-byte wire form.
///
/// Inverse of [`decode_count24`] for counts in `[-2^23, 2^23 - 1]`; values
/// outside that range are truncated to their low 24 bits.
pub fn encode_count24(count: i32) -> [u8; CHANNEL_BYTES] {
    let be = count.to_be_bytes();
    [be[1], be[2], be[3]]
}

/// Decode a 2-byte auxiliary value.
///
/// The firmware emits these little-endian; that is a fixed wire convention,
/// not host byte order.
pub fn decode_aux16(raw: [u8; AUX_BYTES]) -> i16 {
    i16::from_le_bytes(raw)
}

/// Encode an auxiliary value back to its 2-byte wire form.
pub fn encode_aux16(value: i16) -> [u8; AUX_BYTES] {
    value.to_le_bytes()
}

/// Encode a complete packet into the wire format.
///
/// Wire format:
/// ```text
/// ┌────────────┬─────────┬────────────────────┬───────────────┬──────────┐
/// │ Start (1B) │ Id (1B) │ Channels (8 × 3B)  │ Aux (3 × 2B)  │ End (1B) │
/// │ 0xA0       │ 0-255   │ 24-bit BE signed   │ 16-bit LE     │ 0xC0     │
/// └────────────┴─────────┴────────────────────┴───────────────┴──────────┘
/// ```
///
/// Used by tests and board simulators; the real board is the only producer
/// in normal operation.
pub fn encode_packet(
    packet_id: u8,
    counts: &[i32; CHANNEL_COUNT],
    aux: &[i16; AUX_COUNT],
    dst: &mut BytesMut,
) {
    dst.reserve(PACKET_SIZE);
    dst.put_u8(START_BYTE);
    dst.put_u8(packet_id);
    for &count in counts {
        dst.put_slice(&encode_count24(count));
    }
    for &value in aux {
        dst.put_slice(&encode_aux16(value));
    }
    dst.put_u8(END_BYTE);
}
