use std::time::Duration;

use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::SerialStream;

/// Default line speed for serial MIDI bridges.
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// Default per-read timeout. Bounds how long a reader can go without
/// observing a shutdown request.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(400);

/// A serial port discovered on this host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialPortEntry {
    /// Device name or path (`/dev/ttyUSB0`, `COM3`, ...).
    pub name: String,
    /// Port kind: `usb`, `pci`, `bluetooth` or `unknown`.
    pub kind: &'static str,
    /// USB product string, if the driver reports one.
    pub product: Option<String>,
}

impl SerialStream {
    /// Open a serial port at the given baud rate with the default read timeout.
    pub fn open(port: &str, baud: u32) -> Result<Self> {
        Self::open_with_timeout(port, baud, DEFAULT_READ_TIMEOUT)
    }

    /// Open a serial port at the given baud rate with an explicit read timeout.
    pub fn open_with_timeout(port: &str, baud: u32, timeout: Duration) -> Result<Self> {
        let inner = serialport::new(port, baud)
            .timeout(timeout)
            .open()
            .map_err(|source| TransportError::Open {
                port: port.to_string(),
                baud,
                source,
            })?;

        info!(port, baud, ?timeout, "opened serial port");
        Ok(Self::from_port(inner, port.to_string()))
    }
}

/// List the serial ports available on this host.
pub fn available_ports() -> Result<Vec<SerialPortEntry>> {
    let ports = serialport::available_ports().map_err(TransportError::Enumerate)?;
    debug!(count = ports.len(), "enumerated serial ports");

    Ok(ports
        .into_iter()
        .map(|info| {
            let (kind, product) = match info.port_type {
                serialport::SerialPortType::UsbPort(usb) => ("usb", usb.product),
                serialport::SerialPortType::PciPort => ("pci", None),
                serialport::SerialPortType::BluetoothPort => ("bluetooth", None),
                serialport::SerialPortType::Unknown => ("unknown", None),
            };
            SerialPortEntry {
                name: info.port_name,
                kind,
                product,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(unix)]
    fn open_missing_port_reports_open_error() {
        let err = SerialStream::open("/dev/serialmidi-does-not-exist", DEFAULT_BAUD_RATE)
            .expect_err("missing device should not open");

        match err {
            TransportError::Open { port, baud, .. } => {
                assert_eq!(port, "/dev/serialmidi-does-not-exist");
                assert_eq!(baud, DEFAULT_BAUD_RATE);
            }
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[test]
    fn default_timeout_is_short() {
        assert!(DEFAULT_READ_TIMEOUT <= Duration::from_secs(1));
    }
}
