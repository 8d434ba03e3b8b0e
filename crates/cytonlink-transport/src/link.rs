use crate::error::Result;

/// A duplex byte link to an acquisition board.
///
/// This is the seam between the framing layer and the physical transport.
/// The framer only ever sees this trait, so tests can drive it with
/// scripted in-memory links.
pub trait ByteLink {
    /// Read up to `buf.len()` bytes, blocking for at most the link's read
    /// timeout.
    ///
    /// Returns `Ok(0)` when the timeout elapsed with no data available —
    /// that is NOT end-of-stream. A dead or disconnected link surfaces as
    /// `Err(TransportError::Closed)` or `Err(TransportError::Io)`.
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Write all of `buf` to the device and flush.
    fn send(&mut self, buf: &[u8]) -> Result<()>;

    /// Number of bytes already buffered by the OS/driver and readable
    /// without blocking.
    ///
    /// Used to distinguish "no data yet" from "device stalled": an empty
    /// read with nothing pending means the board has stopped emitting.
    fn bytes_pending(&mut self) -> Result<usize>;
}

impl<L: ByteLink + ?Sized> ByteLink for &mut L {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).recv(buf)
    }

    fn send(&mut self, buf: &[u8]) -> Result<()> {
        (**self).send(buf)
    }

    fn bytes_pending(&mut self) -> Result<usize> {
        (**self).bytes_pending()
    }
}
