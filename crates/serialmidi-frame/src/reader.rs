use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::error::{FrameError, Result};
use crate::message::MidiMessage;
use crate::reassembler::RunningStatusReassembler;

const READ_CHUNK_SIZE: usize = 256;

/// Reads complete MIDI messages from any `Read` byte stream.
///
/// Bytes read in one go but not yet consumed are kept between calls, so a
/// read that delivers several messages hands them out one per call.
pub struct MessageReader<T> {
    inner: T,
    reassembler: RunningStatusReassembler,
    unread: BytesMut,
}

impl<T: Read> MessageReader<T> {
    /// Create a new message reader with the default size cap.
    pub fn new(inner: T) -> Self {
        Self::with_reassembler(inner, RunningStatusReassembler::new())
    }

    /// Create a new message reader around an explicit reassembler.
    pub fn with_reassembler(inner: T, reassembler: RunningStatusReassembler) -> Self {
        Self {
            inner,
            reassembler,
            unread: BytesMut::with_capacity(READ_CHUNK_SIZE),
        }
    }

    /// Read the next complete message.
    ///
    /// Returns `Ok(None)` when the stream read timed out with no message
    /// completed, so callers can poll a shutdown flag between attempts.
    /// Returns `Err(FrameError::ConnectionClosed)` when EOF is reached.
    pub fn read_message(&mut self) -> Result<Option<MidiMessage>> {
        loop {
            while self.unread.has_remaining() {
                let byte = self.unread.get_u8();
                if let Some(message) = self.reassembler.feed(byte)? {
                    return Ok(Some(message));
                }
            }

            let mut chunk = [0u8; READ_CHUNK_SIZE];
            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                    return Ok(None)
                }
                Err(err) => return Err(FrameError::Io(err)),
            };

            if read == 0 {
                return Err(FrameError::ConnectionClosed);
            }

            self.unread.extend_from_slice(&chunk[..read]);
        }
    }

    /// Borrow the reassembler (running status, pending bytes).
    pub fn reassembler(&self) -> &RunningStatusReassembler {
        &self.reassembler
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::io::Write;

    use super::*;

    fn drain(reader: &mut MessageReader<impl Read>) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        loop {
            match reader.read_message() {
                Ok(Some(msg)) => out.push(msg.as_bytes().to_vec()),
                Ok(None) => continue,
                Err(FrameError::ConnectionClosed) => return out,
                Err(err) => panic!("unexpected error: {err}"),
            }
        }
    }

    #[test]
    fn read_single_message() {
        let mut reader = MessageReader::new(Cursor::new(vec![0x90, 0x40, 0x7F]));
        let msg = reader.read_message().unwrap().unwrap();
        assert_eq!(msg.as_bytes(), &[0x90, 0x40, 0x7F]);
    }

    #[test]
    fn one_read_with_many_messages() {
        let wire = vec![0x90, 0x40, 0x7F, 0x41, 0x7F, 0xF8, 0xC0, 0x01];
        let mut reader = MessageReader::new(Cursor::new(wire));
        assert_eq!(
            drain(&mut reader),
            vec![
                vec![0x90, 0x40, 0x7F],
                vec![0x90, 0x41, 0x7F],
                vec![0xF8],
                vec![0xC0, 0x01]
            ]
        );
    }

    #[test]
    fn partial_read_handling() {
        let byte_reader = ByteByByteReader {
            bytes: vec![0xF0, 0x01, 0x02, 0x03, 0xF7, 0xB0, 0x07, 0x64],
            pos: 0,
        };
        let mut reader = MessageReader::new(byte_reader);
        assert_eq!(
            drain(&mut reader),
            vec![vec![0xF0, 0x01, 0x02, 0x03, 0xF7], vec![0xB0, 0x07, 0x64]]
        );
    }

    #[test]
    fn connection_closed_cleanly() {
        let mut reader = MessageReader::new(Cursor::new(Vec::<u8>::new()));
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn connection_closed_mid_message() {
        let mut reader = MessageReader::new(Cursor::new(vec![0x90, 0x40]));
        let err = reader.read_message().unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
        assert_eq!(reader.reassembler().pending(), &[0x90, 0x40]);
    }

    #[test]
    fn timeout_yields_none_then_data() {
        let reader = TimeoutThenData {
            timeouts: 2,
            bytes: vec![0x80, 0x3C, 0x00],
            pos: 0,
        };
        let mut framed = MessageReader::new(reader);
        assert!(framed.read_message().unwrap().is_none());
        assert!(framed.read_message().unwrap().is_none());
        let msg = framed.read_message().unwrap().unwrap();
        assert_eq!(msg.as_bytes(), &[0x80, 0x3C, 0x00]);
    }

    #[test]
    fn timeout_keeps_partial_message() {
        let reader = ChunkedWithTimeouts {
            chunks: vec![vec![0x90, 0x40], vec![], vec![], vec![0x7F]],
        };
        let mut framed = MessageReader::new(reader);
        assert!(framed.read_message().unwrap().is_none());
        assert!(framed.read_message().unwrap().is_none());
        let msg = framed.read_message().unwrap().unwrap();
        assert_eq!(msg.as_bytes(), &[0x90, 0x40, 0x7F]);
    }

    #[test]
    fn oversized_message_surfaces_and_stream_continues() {
        let mut wire = vec![0xF0];
        wire.extend([0x11; 10]);
        wire.extend([0x90, 0x40, 0x7F, 0x90, 0x41, 0x7F]);

        let mut framed = MessageReader::with_reassembler(
            Cursor::new(wire),
            RunningStatusReassembler::with_max_message_size(8),
        );
        let err = framed.read_message().unwrap_err();
        assert!(matches!(err, FrameError::MessageTooLarge { size: 9, max: 8 }));

        assert_eq!(
            drain(&mut framed),
            vec![vec![0x90, 0x40, 0x7F], vec![0x90, 0x41, 0x7F]]
        );
    }

    #[test]
    fn interrupted_read_retries() {
        let reader = InterruptedThenData {
            state: 0,
            bytes: vec![0xD0, 0x40],
            pos: 0,
        };
        let mut framed = MessageReader::new(reader);
        let msg = framed.read_message().unwrap().unwrap();
        assert_eq!(msg.as_bytes(), &[0xD0, 0x40]);
    }

    #[test]
    fn other_io_errors_propagate() {
        let mut framed = MessageReader::new(FailingReader);
        let err = framed.read_message().unwrap_err();
        assert!(matches!(err, FrameError::Io(e) if e.kind() == ErrorKind::BrokenPipe));
    }

    #[test]
    #[cfg(unix)]
    fn reads_over_socket_pair() {
        let (mut left, right) = std::os::unix::net::UnixStream::pair().unwrap();
        right
            .set_read_timeout(Some(std::time::Duration::from_millis(50)))
            .unwrap();
        let mut reader = MessageReader::new(right);

        assert!(reader.read_message().unwrap().is_none());

        left.write_all(&[0x92, 0x30, 0x50, 0x31, 0x50]).unwrap();
        let first = reader.read_message().unwrap().unwrap();
        let second = reader.read_message().unwrap().unwrap();
        assert_eq!(first.as_bytes(), &[0x92, 0x30, 0x50]);
        assert_eq!(second.as_bytes(), &[0x92, 0x31, 0x50]);
    }

    #[test]
    fn accessors_and_into_inner() {
        let cursor = Cursor::new(Vec::<u8>::new());
        let mut reader = MessageReader::new(cursor);

        let _ = reader.get_ref();
        let _ = reader.get_mut();
        let _inner = reader.into_inner();
    }

    #[derive(Debug)]
    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct TimeoutThenData {
        timeouts: usize,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for TimeoutThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.timeouts > 0 {
                self.timeouts -= 1;
                return Err(std::io::Error::from(ErrorKind::TimedOut));
            }
            let n = (self.bytes.len() - self.pos).min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Empty chunks stand for reads that time out.
    struct ChunkedWithTimeouts {
        chunks: Vec<Vec<u8>>,
    }

    impl Read for ChunkedWithTimeouts {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            let chunk = self.chunks.remove(0);
            if chunk.is_empty() {
                return Err(std::io::Error::from(ErrorKind::WouldBlock));
            }
            buf[..chunk.len()].copy_from_slice(&chunk);
            Ok(chunk.len())
        }
    }

    struct InterruptedThenData {
        state: u8,
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.state == 0 {
                self.state = 1;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            if self.pos >= self.bytes.len() {
                return Ok(0);
            }
            let remaining = self.bytes.len() - self.pos;
            let n = remaining.min(buf.len());
            buf[..n].copy_from_slice(&self.bytes[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }
    }
}
