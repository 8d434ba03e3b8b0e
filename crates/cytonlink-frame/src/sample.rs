use crate::codec::{AUX_COUNT, CHANNEL_COUNT, SCALE_UV_PER_COUNT};

/// One fully decoded sample from the board.
///
/// Only constructed once a packet has been framed and validated end to end,
/// so a `Sample` is never partially decoded: `channels` always holds all
/// [`CHANNEL_COUNT`] values and `aux` all [`AUX_COUNT`].
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Device-assigned packet counter. Wraps 0-255; not unique across a
    /// full wrap.
    pub packet_id: u8,
    /// Per-channel values in microvolts.
    pub channels: [f64; CHANNEL_COUNT],
    /// Raw accelerometer values, unscaled. Their physical unit depends on
    /// firmware state, so scaling is left to the consumer.
    pub aux: [i16; AUX_COUNT],
}

impl Sample {
    /// Build a sample from raw decoded integers, applying the fixed
    /// microvolts-per-count scale to each channel.
    pub fn from_raw(
        packet_id: u8,
        counts: &[i32; CHANNEL_COUNT],
        aux: [i16; AUX_COUNT],
    ) -> Self {
        let channels = counts.map(|c| f64::from(c) * SCALE_UV_PER_COUNT);
        Self {
            packet_id,
            channels,
            aux,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scales_every_channel() {
        let counts = [1, -1, 0, 1000, -1000, 1, 1, 1];
        let sample = Sample::from_raw(7, &counts, [1, 2, 3]);

        assert_eq!(sample.packet_id, 7);
        assert_eq!(sample.channels[0], SCALE_UV_PER_COUNT);
        assert_eq!(sample.channels[1], -SCALE_UV_PER_COUNT);
        assert_eq!(sample.channels[2], 0.0);
        assert_eq!(sample.channels[3], 1000.0 * SCALE_UV_PER_COUNT);
        assert_eq!(sample.aux, [1, 2, 3]);
    }

    #[test]
    fn scaling_is_reproducible() {
        let counts = [123_456; 8];
        let a = Sample::from_raw(0, &counts, [0; 3]);
        let b = Sample::from_raw(0, &counts, [0; 3]);
        assert_eq!(a, b);
    }
}
