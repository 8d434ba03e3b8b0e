use std::time::Duration;

use cytonlink_transport::ByteLink;
use tracing::{debug, warn};

use crate::codec::{
    decode_aux16, decode_count24, AUX_BYTES, AUX_COUNT, CHANNEL_BYTES, CHANNEL_COUNT, END_BYTE,
    START_BYTE,
};
use crate::error::{FrameError, Result};
use crate::sample::Sample;

/// Command written to the board when it appears stalled: restart streaming.
const RESTART_COMMAND: &[u8] = b"b\n";

/// Parse phase of the framing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Scanning byte-by-byte for the start sentinel.
    SeekStart,
    /// Reading 8 groups of 3 channel bytes.
    ChannelData,
    /// Reading 3 groups of 2 auxiliary bytes.
    AuxData,
    /// Reading and validating the end sentinel.
    EndCheck,
}

/// Configuration for the packet framer.
#[derive(Debug, Clone)]
pub struct FramerConfig {
    /// Maximum bytes scanned per resynchronization attempt before giving
    /// up on the stream. Default: 3000.
    pub max_skip_bytes: usize,
    /// Maximum consecutive restart attempts while the device is silent
    /// before the stall becomes fatal. Default: 5.
    pub max_stall_retries: u32,
    /// Pause after sending a restart command, giving the board time to
    /// come back. Default: 100 ms.
    pub stall_pause: Duration,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self {
            max_skip_bytes: 3000,
            max_stall_retries: 5,
            stall_pause: Duration::from_millis(100),
        }
    }
}

/// Reads complete samples from an unframed board byte stream.
///
/// Owns the resynchronization policy: desynchronization and single corrupted
/// packets are recovered internally (with a `warn!` diagnostic), stalls
/// trigger a bounded restart-and-retry cycle, and only stream-level failures
/// surface as errors. Not re-entrant; one logical reader drives a framer.
pub struct PacketFramer<L> {
    link: L,
    phase: Phase,
    packet_id: u8,
    counts: [i32; CHANNEL_COUNT],
    aux: [i16; AUX_COUNT],
    /// Bytes skipped during the most recent start-byte search.
    last_skipped: usize,
    config: FramerConfig,
}

impl<L: ByteLink> PacketFramer<L> {
    /// Create a new framer with default configuration.
    pub fn new(link: L) -> Self {
        Self::with_config(link, FramerConfig::default())
    }

    /// Create a new framer with explicit configuration.
    pub fn with_config(link: L, config: FramerConfig) -> Self {
        Self {
            link,
            phase: Phase::SeekStart,
            packet_id: 0,
            counts: [0; CHANNEL_COUNT],
            aux: [0; AUX_COUNT],
            last_skipped: 0,
            config,
        }
    }

    /// Read the next complete sample (blocking).
    ///
    /// Blocks for one packet's worth of serial reads plus any stall-recovery
    /// pause. A corrupted packet is dropped with a warning and parsing
    /// continues with the next one; callers only see stream-level failures.
    pub fn read_sample(&mut self) -> Result<Sample> {
        loop {
            match self.phase {
                Phase::SeekStart => {
                    self.packet_id = self.seek_start()?;
                    self.counts = [0; CHANNEL_COUNT];
                    self.aux = [0; AUX_COUNT];
                    self.phase = Phase::ChannelData;
                }
                Phase::ChannelData => {
                    for slot in 0..CHANNEL_COUNT {
                        let mut raw = [0u8; CHANNEL_BYTES];
                        self.fill(&mut raw)?;
                        self.counts[slot] = decode_count24(raw);
                    }
                    self.phase = Phase::AuxData;
                }
                Phase::AuxData => {
                    for slot in 0..AUX_COUNT {
                        let mut raw = [0u8; AUX_BYTES];
                        self.fill(&mut raw)?;
                        self.aux[slot] = decode_aux16(raw);
                    }
                    self.phase = Phase::EndCheck;
                }
                Phase::EndCheck => {
                    let mut end = [0u8; 1];
                    self.fill(&mut end)?;
                    self.phase = Phase::SeekStart;
                    if end[0] == END_BYTE {
                        return Ok(Sample::from_raw(self.packet_id, &self.counts, self.aux));
                    }
                    warn!(
                        packet_id = self.packet_id,
                        "end byte mismatch (got 0x{:02X}, expected 0x{END_BYTE:02X}), dropping packet",
                        end[0]
                    );
                }
            }
        }
    }

    /// Scan for the start sentinel and return the packet id that follows it.
    ///
    /// An empty read with nothing pending means the board has stopped
    /// emitting; send a restart command, pause, and keep searching, up to
    /// the configured retry budget.
    fn seek_start(&mut self) -> Result<u8> {
        let mut skipped = 0usize;
        let mut stall_retries = 0u32;
        self.last_skipped = 0;

        loop {
            let mut byte = [0u8; 1];
            if self.link.recv(&mut byte)? == 0 {
                if self.link.bytes_pending()? == 0 {
                    if stall_retries >= self.config.max_stall_retries {
                        return Err(FrameError::Stalled {
                            retries: stall_retries,
                        });
                    }
                    stall_retries += 1;
                    warn!(attempt = stall_retries, "device appears stalled, restarting stream");
                    self.link.send(RESTART_COMMAND)?;
                    std::thread::sleep(self.config.stall_pause);
                }
                continue;
            }
            stall_retries = 0;

            if byte[0] == START_BYTE {
                if skipped > 0 {
                    warn!(skipped, "skipped bytes before start byte");
                }
                self.last_skipped = skipped;
                let mut id = [0u8; 1];
                self.fill(&mut id)?;
                return Ok(id[0]);
            }

            skipped += 1;
            if skipped >= self.config.max_skip_bytes {
                return Err(FrameError::SyncLost { scanned: skipped });
            }
        }
    }

    /// Blocking exact read for mid-packet data.
    ///
    /// Once a start byte has been seen the rest of the packet is assumed to
    /// arrive; persistent silence here still gets bounded so a link that
    /// dies mid-packet cannot hang the caller forever.
    fn fill(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut offset = 0usize;
        let mut empty_reads = 0u32;
        while offset < buf.len() {
            let read = self.link.recv(&mut buf[offset..])?;
            if read == 0 {
                empty_reads += 1;
                if empty_reads > self.config.max_stall_retries {
                    return Err(FrameError::Stalled {
                        retries: empty_reads - 1,
                    });
                }
                continue;
            }
            empty_reads = 0;
            offset += read;
        }
        Ok(())
    }

    /// Current parse phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Bytes skipped during the most recent start-byte search.
    pub fn skipped_last_sync(&self) -> usize {
        self.last_skipped
    }

    /// Borrow the underlying link.
    pub fn get_ref(&self) -> &L {
        &self.link
    }

    /// Mutably borrow the underlying link (e.g. for control commands).
    pub fn get_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Consume the framer and return the inner link.
    pub fn into_inner(self) -> L {
        self.link
    }

    /// Current framer configuration.
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Drop any in-progress packet state and return to start-byte search.
    ///
    /// Useful after out-of-band control traffic that may have desynchronized
    /// the stream.
    pub fn resync(&mut self) {
        debug!("framer reset to start-byte search");
        self.phase = Phase::SeekStart;
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use bytes::BytesMut;
    use cytonlink_transport::{Result as TransportResult, TransportError};

    use super::*;
    use crate::codec::{encode_packet, SCALE_UV_PER_COUNT};

    /// How a scripted link behaves once its bytes run out.
    enum OnEmpty {
        /// Timeouts with nothing pending, like a stalled board.
        Stall,
        /// Link gone.
        Closed,
    }

    struct ScriptedLink {
        incoming: VecDeque<u8>,
        sent: Vec<u8>,
        on_empty: OnEmpty,
        /// Bytes queued the first time a restart command is received.
        refill_on_restart: Option<Vec<u8>>,
        /// Bytes handed out per recv call; 1 mimics worst-case serial reads.
        chunk: usize,
    }

    impl ScriptedLink {
        fn new(bytes: impl Into<Vec<u8>>, on_empty: OnEmpty) -> Self {
            Self {
                incoming: bytes.into().into(),
                sent: Vec::new(),
                on_empty,
                refill_on_restart: None,
                chunk: 1,
            }
        }
    }

    impl ByteLink for ScriptedLink {
        fn recv(&mut self, buf: &mut [u8]) -> TransportResult<usize> {
            if self.incoming.is_empty() {
                return match self.on_empty {
                    OnEmpty::Stall => Ok(0),
                    OnEmpty::Closed => Err(TransportError::Closed),
                };
            }
            let n = buf.len().min(self.chunk).min(self.incoming.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.incoming.pop_front().unwrap();
            }
            Ok(n)
        }

        fn send(&mut self, buf: &[u8]) -> TransportResult<()> {
            self.sent.extend_from_slice(buf);
            if buf == RESTART_COMMAND {
                if let Some(bytes) = self.refill_on_restart.take() {
                    self.incoming.extend(bytes);
                }
            }
            Ok(())
        }

        fn bytes_pending(&mut self) -> TransportResult<usize> {
            Ok(self.incoming.len())
        }
    }

    fn packet(id: u8, counts: &[i32; 8], aux: &[i16; 3]) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_packet(id, counts, aux, &mut buf);
        buf.to_vec()
    }

    fn fast_config() -> FramerConfig {
        FramerConfig {
            stall_pause: Duration::from_millis(0),
            ..FramerConfig::default()
        }
    }

    #[test]
    fn reads_single_packet() {
        let counts = [1, -1, 1_000_000, -1_000_000, 0, 42, -42, (1 << 23) - 1];
        let aux = [100, -100, 0];
        let wire = packet(17, &counts, &aux);

        let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
        let sample = framer.read_sample().unwrap();

        assert_eq!(sample.packet_id, 17);
        assert_eq!(sample.aux, aux);
        for (value, count) in sample.channels.iter().zip(counts) {
            assert_eq!(*value, f64::from(count) * SCALE_UV_PER_COUNT);
        }
        assert_eq!(framer.phase(), Phase::SeekStart);
        assert_eq!(framer.skipped_last_sync(), 0);
    }

    #[test]
    fn reads_consecutive_packets_in_order() {
        let mut wire = packet(1, &[10; 8], &[0; 3]);
        wire.extend(packet(2, &[20; 8], &[0; 3]));
        wire.extend(packet(3, &[30; 8], &[0; 3]));

        let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
        for expected in 1..=3u8 {
            let sample = framer.read_sample().unwrap();
            assert_eq!(sample.packet_id, expected);
        }
    }

    #[test]
    fn skips_garbage_before_start() {
        let clean = {
            let wire = packet(5, &[7; 8], &[1, 2, 3]);
            let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
            framer.read_sample().unwrap()
        };

        // 0xC0 and 0x00 can never be mistaken for a start byte.
        let garbage = [0xC0, 0x00, 0x13, 0x37, 0xFF, 0x00, 0x99];
        let mut wire = garbage.to_vec();
        wire.extend(packet(5, &[7; 8], &[1, 2, 3]));

        let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
        let sample = framer.read_sample().unwrap();

        assert_eq!(framer.skipped_last_sync(), garbage.len());
        assert_eq!(sample, clean);
    }

    #[test]
    fn corrupted_end_byte_drops_exactly_one_packet() {
        let mut bad = packet(8, &[1; 8], &[0; 3]);
        *bad.last_mut().unwrap() = 0xDE;
        let mut wire = bad;
        wire.extend(packet(9, &[2; 8], &[0; 3]));

        let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
        let sample = framer.read_sample().unwrap();

        assert_eq!(sample.packet_id, 9);
        assert_eq!(sample.channels[0], 2.0 * SCALE_UV_PER_COUNT);
    }

    #[test]
    fn false_start_byte_self_heals() {
        // A lone 0xA0 in garbage gets parsed as a packet attempt, fails the
        // end check, and the framer recovers on the genuine packet.
        let mut wire = vec![START_BYTE];
        wire.extend(std::iter::repeat(0x11).take(31));
        wire.push(0x22); // not END_BYTE
        wire.extend(packet(44, &[3; 8], &[0; 3]));

        let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
        let sample = framer.read_sample().unwrap();
        assert_eq!(sample.packet_id, 44);
    }

    #[test]
    fn stall_sends_restart_and_recovers() {
        let mut link = ScriptedLink::new(Vec::new(), OnEmpty::Stall);
        link.refill_on_restart = Some(packet(1, &[5; 8], &[0; 3]));

        let mut framer = PacketFramer::with_config(link, fast_config());
        let sample = framer.read_sample().unwrap();

        assert_eq!(sample.packet_id, 1);
        assert_eq!(framer.get_ref().sent, RESTART_COMMAND);
    }

    #[test]
    fn stall_budget_exhausted_is_fatal() {
        let link = ScriptedLink::new(Vec::new(), OnEmpty::Stall);
        let mut framer = PacketFramer::with_config(link, fast_config());

        let err = framer.read_sample().unwrap_err();
        assert!(matches!(err, FrameError::Stalled { retries: 5 }));
        // One restart per retry went out on the wire.
        assert_eq!(framer.get_ref().sent.len(), RESTART_COMMAND.len() * 5);
    }

    #[test]
    fn unbounded_garbage_is_sync_lost() {
        let cfg = FramerConfig {
            max_skip_bytes: 64,
            ..fast_config()
        };
        let wire = vec![0x55u8; 256];
        let mut framer = PacketFramer::with_config(ScriptedLink::new(wire, OnEmpty::Closed), cfg);

        let err = framer.read_sample().unwrap_err();
        assert!(matches!(err, FrameError::SyncLost { scanned: 64 }));
    }

    #[test]
    fn closed_link_propagates() {
        let mut framer = PacketFramer::new(ScriptedLink::new(Vec::new(), OnEmpty::Closed));
        let err = framer.read_sample().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::Closed)
        ));
    }

    #[test]
    fn closed_link_mid_packet_propagates() {
        let mut wire = packet(3, &[1; 8], &[0; 3]);
        wire.truncate(10);
        let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
        let err = framer.read_sample().unwrap_err();
        assert!(matches!(
            err,
            FrameError::Transport(TransportError::Closed)
        ));
    }

    #[test]
    fn phase_injection_resumes_mid_packet() {
        // Drive the state machine from CHANNEL_DATA directly: the stream
        // holds only the payload and trailer, no start byte.
        let mut wire = Vec::new();
        for c in [1i32, 2, 3, 4, 5, 6, 7, 8] {
            wire.extend(crate::codec::encode_count24(c));
        }
        for a in [9i16, 10, 11] {
            wire.extend(crate::codec::encode_aux16(a));
        }
        wire.push(END_BYTE);

        let mut framer = PacketFramer::new(ScriptedLink::new(wire, OnEmpty::Closed));
        framer.phase = Phase::ChannelData;
        framer.packet_id = 200;

        let sample = framer.read_sample().unwrap();
        assert_eq!(sample.packet_id, 200);
        assert_eq!(sample.aux, [9, 10, 11]);
        assert_eq!(sample.channels[7], 8.0 * SCALE_UV_PER_COUNT);
    }

    #[test]
    fn resync_discards_in_progress_packet() {
        let mut framer = PacketFramer::new(ScriptedLink::new(Vec::new(), OnEmpty::Closed));
        framer.phase = Phase::AuxData;
        framer.resync();
        assert_eq!(framer.phase(), Phase::SeekStart);
    }
}
