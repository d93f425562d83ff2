use std::io::{Read, Write};

use crate::error::{Result, TransportError};

/// An open serial port. Implements `Read + Write`.
///
/// Reads and writes honour the timeout the port was opened with: an
/// operation that makes no progress within the timeout fails with
/// `ErrorKind::TimedOut` instead of blocking forever, so worker loops can
/// re-check their stop flag.
pub struct SerialStream {
    inner: Box<dyn serialport::SerialPort>,
    name: String,
}

impl Read for SerialStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Write for SerialStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

impl SerialStream {
    pub(crate) fn from_port(inner: Box<dyn serialport::SerialPort>, name: String) -> Self {
        Self { inner, name }
    }

    /// Try to clone this stream (duplicates the underlying handle).
    ///
    /// The clone shares the port with the original, so one handle can read
    /// while the other writes.
    pub fn try_clone(&self) -> Result<Self> {
        let cloned = self
            .inner
            .try_clone()
            .map_err(|err| TransportError::Io(err.into()))?;
        Ok(Self::from_port(cloned, self.name.clone()))
    }
}

impl std::fmt::Debug for SerialStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialStream")
            .field("name", &self.name)
            .finish()
    }
}
