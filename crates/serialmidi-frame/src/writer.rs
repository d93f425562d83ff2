use std::io::{ErrorKind, Write};

use bytes::{Buf, BytesMut};

use crate::codec::{encode_into, FrameTarget};
use crate::error::{FrameError, Result};
use crate::message::MidiMessage;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Writes complete MIDI messages to any `Write` stream, framed for the
/// configured target.
pub struct MessageWriter<T> {
    inner: T,
    buf: BytesMut,
    target: FrameTarget,
}

impl<T: Write> MessageWriter<T> {
    /// Create a new passthrough writer.
    pub fn new(inner: T) -> Self {
        Self::with_target(inner, FrameTarget::Passthrough)
    }

    /// Create a new writer for an explicit frame target.
    pub fn with_target(inner: T, target: FrameTarget) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            target,
        }
    }

    /// Write a complete message (blocking).
    pub fn write_message(&mut self, message: &MidiMessage) -> Result<()> {
        self.send(message.as_bytes())
    }

    /// Frame and send raw message bytes.
    ///
    /// If the stream times out part way, the unsent bytes stay queued: the
    /// error is returned, and [`write_pending`](Self::write_pending) or the
    /// next `send` picks up where the stream stopped.
    pub fn send(&mut self, message: &[u8]) -> Result<()> {
        encode_into(message, self.target, &mut self.buf)?;
        self.write_pending()
    }

    /// Write bytes left over from an earlier send, then flush.
    pub fn write_pending(&mut self) -> Result<()> {
        while self.buf.has_remaining() {
            match self.inner.write(&self.buf) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => self.buf.advance(n),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Bytes framed but not yet accepted by the stream.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Flush the underlying stream.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }

    pub fn target(&self) -> FrameTarget {
        self.target
    }
}
