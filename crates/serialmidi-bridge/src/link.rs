use std::io::{Read, Write};

use serialmidi_transport::SerialStream;

use crate::error::Result;

/// A byte link the bridge can read from and write to concurrently.
///
/// The serial reader and the serial writer each get their own handle,
/// obtained with [`SerialLink::try_clone_link`], onto the same port. Reads
/// must time out rather than block forever so the reader can notice a stop
/// request.
pub trait SerialLink: Read + Write + Send + Sized + 'static {
    /// A second handle onto the same link.
    fn try_clone_link(&self) -> Result<Self>;
}

impl SerialLink for SerialStream {
    fn try_clone_link(&self) -> Result<Self> {
        Ok(self.try_clone()?)
    }
}

#[cfg(unix)]
impl SerialLink for std::os::unix::net::UnixStream {
    fn try_clone_link(&self) -> Result<Self> {
        Ok(self.try_clone().map_err(serialmidi_transport::TransportError::Io)?)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::{Read, Write};
    use std::os::unix::net::UnixStream;

    use super::*;

    #[test]
    fn cloned_handles_share_the_link() {
        let (bridge_side, mut device_side) = UnixStream::pair().unwrap();
        let mut writer = bridge_side.try_clone_link().unwrap();
        let mut reader = bridge_side;

        writer.write_all(&[0xF8]).unwrap();
        let mut buf = [0u8; 1];
        device_side.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xF8]);

        device_side.write_all(&[0xFA]).unwrap();
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(buf, [0xFA]);
    }
}
