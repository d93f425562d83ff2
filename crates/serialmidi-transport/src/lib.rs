//! Serial byte transport.
//!
//! Wraps a serial port opened through the `serialport` crate in a
//! [`SerialStream`] that implements `Read + Write` and can be cloned into
//! independent reader and writer handles.
//!
//! This is the lowest layer of serialmidi. Message reassembly and framing
//! build on top of any `Read`/`Write` pair, [`SerialStream`] included.

pub mod error;
pub mod serial;
pub mod traits;

pub use error::{Result, TransportError};
pub use serial::{available_ports, SerialPortEntry, DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT};
pub use traits::SerialStream;
