use std::time::{Duration, Instant};

use cytonlink_frame::{FramerConfig, PacketFramer, Sample};
use cytonlink_transport::{ByteLink, SerialLink};
use tracing::{debug, info, warn};

use crate::commands::{
    channel_off, channel_on, BANNER_TERMINATOR, FILTERS_OFF, FILTERS_ON, QUERY_REGISTERS,
    SOFT_RESET, START_STREAM, STOP_STREAM,
};
use crate::error::{BoardError, Result};

const BANNER_CHUNK: usize = 64;

/// Configuration for a board session.
#[derive(Debug, Clone)]
pub struct BoardConfig {
    /// How long to wait for the firmware's `$$$` reply terminator.
    pub handshake_timeout: Duration,
    /// Settle time after a soft reset before reading the banner.
    pub reset_settle: Duration,
    /// Framer configuration for the streaming phase.
    pub framer: FramerConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            handshake_timeout: Duration::from_secs(5),
            reset_settle: Duration::from_secs(1),
            framer: FramerConfig::default(),
        }
    }
}

/// A session with an acquisition board over any byte link.
///
/// Owns the link for its whole lifetime; the framer state inside lives as
/// long as the session and is destroyed with it.
pub struct Board<L> {
    framer: PacketFramer<L>,
    streaming: bool,
    config: BoardConfig,
}

impl Board<SerialLink> {
    /// Open a serial port and run the boot handshake.
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        let link = SerialLink::open(port, baud)?;
        let mut board = Self::from_link(link);
        let banner = board.initialize()?;
        debug!(banner_len = banner.len(), "board initialized");
        Ok(board)
    }
}

impl<L: ByteLink> Board<L> {
    /// Wrap an already-open byte link with default configuration.
    ///
    /// Does not run the boot handshake; call [`Board::initialize`] when the
    /// device expects one.
    pub fn from_link(link: L) -> Self {
        Self::with_config(link, BoardConfig::default())
    }

    /// Wrap an already-open byte link with explicit configuration.
    pub fn with_config(link: L, config: BoardConfig) -> Self {
        let framer = PacketFramer::with_config(link, config.framer.clone());
        Self {
            framer,
            streaming: false,
            config,
        }
    }

    /// Soft-reset the board and drain its boot banner.
    ///
    /// Returns the banner text (everything up to and including `$$$`).
    pub fn initialize(&mut self) -> Result<String> {
        self.framer.get_mut().send(&[SOFT_RESET])?;
        std::thread::sleep(self.config.reset_settle);
        let banner = self.drain_banner()?;
        info!("board reset complete");
        Ok(banner)
    }

    /// Start streaming and hand every sample to `callback` in arrival order.
    ///
    /// Blocks until `callback` returns `false` (cooperative stop) or a
    /// stream-level error occurs. On stop, streaming is turned off but the
    /// session stays usable.
    pub fn start(&mut self, mut callback: impl FnMut(Sample) -> bool) -> Result<()> {
        if !self.streaming {
            self.framer.get_mut().send(&[START_STREAM])?;
            self.streaming = true;
            info!("streaming started");
        }
        while self.streaming {
            let sample = self.framer.read_sample()?;
            if !callback(sample) {
                self.stop()?;
            }
        }
        Ok(())
    }

    /// Pull a single sample. The caller is responsible for having started
    /// the stream.
    pub fn read_sample(&mut self) -> Result<Sample> {
        Ok(self.framer.read_sample()?)
    }

    /// Stop streaming without disconnecting.
    pub fn stop(&mut self) -> Result<()> {
        self.framer.get_mut().send(&[STOP_STREAM])?;
        self.streaming = false;
        self.framer.resync();
        info!("streaming stopped");
        Ok(())
    }

    /// Whether the stream start command has been sent.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Ask the firmware for its register settings dump.
    pub fn register_settings(&mut self) -> Result<String> {
        self.framer.get_mut().send(&[QUERY_REGISTERS])?;
        self.drain_banner()
    }

    /// Toggle a single acquisition channel (1-based).
    pub fn set_channel(&mut self, channel: u8, enabled: bool) -> Result<()> {
        let command = if enabled {
            channel_on(channel)
        } else {
            channel_off(channel)
        }
        .ok_or(BoardError::InvalidChannel(channel))?;
        self.framer.get_mut().send(&[command])?;
        debug!(channel, enabled, "channel toggled");
        Ok(())
    }

    /// Toggle the firmware's ambient-noise notch filter.
    pub fn set_filters(&mut self, enabled: bool) -> Result<()> {
        let command = if enabled { FILTERS_ON } else { FILTERS_OFF };
        self.framer.get_mut().send(&[command])?;
        debug!(enabled, "filters toggled");
        Ok(())
    }

    /// Consume the session and return the underlying link.
    pub fn into_link(self) -> L {
        self.framer.into_inner()
    }

    /// Read text from the link until the `$$$` terminator.
    fn drain_banner(&mut self) -> Result<String> {
        let deadline = Instant::now() + self.config.handshake_timeout;
        let mut buf: Vec<u8> = Vec::new();
        loop {
            let mut chunk = [0u8; BANNER_CHUNK];
            let read = self.framer.get_mut().recv(&mut chunk)?;
            buf.extend_from_slice(&chunk[..read]);
            if buf
                .windows(BANNER_TERMINATOR.len())
                .any(|w| w == BANNER_TERMINATOR)
            {
                return Ok(String::from_utf8_lossy(&buf).into_owned());
            }
            if Instant::now() >= deadline {
                warn!(received = buf.len(), "banner terminator never arrived");
                return Err(BoardError::HandshakeTimeout(self.config.handshake_timeout));
            }
        }
    }
}
