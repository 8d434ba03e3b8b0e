use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{SerialPort, SerialPortInfo};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::link::ByteLink;

/// Baud rate the board's FTDI bridge runs at.
pub const DEFAULT_BAUD: u32 = 115_200;

/// Default per-read timeout. One packet arrives every 4 ms at 250 Hz, so a
/// full second of silence is well past any legitimate gap.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Port name fragments that identify the board's USB serial bridge.
const BOARD_PORT_PATTERNS: &[&str] = &["usbserial-DN", "ttyUSB"];

/// A `ByteLink` over a physical serial port.
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    /// Open a serial port at the given baud rate with the default read
    /// timeout.
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        Self::open_with_timeout(port, baud, DEFAULT_READ_TIMEOUT)
    }

    /// Open a serial port with an explicit read timeout.
    pub fn open_with_timeout(port: &str, baud: u32, timeout: Duration) -> Result<Self> {
        let handle = serialport::new(port, baud)
            .timeout(timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                source,
            })?;
        info!(port, baud, "serial link established");
        Ok(Self {
            port: handle,
            name: port.to_string(),
        })
    }

    /// Name of the underlying port.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Update the read timeout on the open port.
    pub fn set_read_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.port
            .set_timeout(timeout)
            .map_err(|err| TransportError::Io(std::io::Error::other(err.to_string())))
    }
}

impl ByteLink for SerialLink {
    fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
        loop {
            match self.port.read(buf) {
                // A zero-length read on a serial port means the device
                // side is gone, not an empty timeout.
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => return Ok(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err)
                    if err.kind() == ErrorKind::TimedOut
                        || err.kind() == ErrorKind::WouldBlock =>
                {
                    return Ok(0)
                }
                Err(err) if err.kind() == ErrorKind::BrokenPipe => {
                    return Err(TransportError::Closed)
                }
                Err(err) => return Err(TransportError::Io(err)),
            }
        }
    }

    fn send(&mut self, buf: &[u8]) -> Result<()> {
        self.port.write_all(buf)?;
        self.port.flush()?;
        Ok(())
    }

    fn bytes_pending(&mut self) -> Result<usize> {
        self.port
            .bytes_to_read()
            .map(|n| n as usize)
            .map_err(|err| TransportError::Io(std::io::Error::other(err.to_string())))
    }
}

impl std::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialLink").field("port", &self.name).finish()
    }
}

/// Enumerate all serial ports visible to the host.
pub fn available_ports() -> Result<Vec<SerialPortInfo>> {
    serialport::available_ports().map_err(TransportError::Enumerate)
}

/// Whether a port looks like the board's USB serial bridge.
///
/// Matches the FTDI naming the board ships with (`usbserial-DN*` on macOS,
/// `ttyUSB*` on Linux).
pub fn is_board_port(info: &SerialPortInfo) -> bool {
    BOARD_PORT_PATTERNS
        .iter()
        .any(|pat| info.port_name.contains(pat))
}

/// Scan for a port that looks like the board's USB serial bridge and
/// return the first match.
pub fn find_board_port() -> Result<String> {
    let ports = available_ports()?;
    for info in &ports {
        if is_board_port(info) {
            debug!(port = %info.port_name, "matched board port pattern");
            return Ok(info.port_name.clone());
        }
    }
    Err(TransportError::NoDeviceFound)
}

#[cfg(test)]
mod tests {
    use serialport::SerialPortType;

    use super::*;

    fn info(name: &str) -> SerialPortInfo {
        SerialPortInfo {
            port_name: name.to_string(),
            port_type: SerialPortType::Unknown,
        }
    }

    #[test]
    fn recognizes_board_port_names() {
        assert!(is_board_port(&info("/dev/tty.usbserial-DN0096XA")));
        assert!(is_board_port(&info("/dev/ttyUSB0")));
    }

    #[test]
    fn rejects_other_port_names() {
        assert!(!is_board_port(&info("/dev/ttyS0")));
        assert!(!is_board_port(&info("/dev/tty.Bluetooth-Incoming-Port")));
        assert!(!is_board_port(&info("COM3")));
    }
}
