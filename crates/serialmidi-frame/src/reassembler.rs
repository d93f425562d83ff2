use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::error::{FrameError, Result};
use crate::message::MidiMessage;
use crate::status::{classify, is_status, sets_running_status, SYSEX_END, SYSEX_START};

/// Default cap on a message that has not completed yet: 64 KiB.
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 64 * 1024;

const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Rebuilds complete MIDI messages from an undelimited byte stream.
///
/// Bytes are consumed one at a time. A data byte that starts a message is
/// read as a continuation of the last status byte (running status). One
/// instance belongs to exactly one serial connection.
#[derive(Debug)]
pub struct RunningStatusReassembler {
    buf: BytesMut,
    running_status: Option<u8>,
    max_message_size: usize,
    /// Set after an oversized message; data bytes are dropped until the
    /// next status byte.
    discarding: bool,
}

impl Default for RunningStatusReassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStatusReassembler {
    pub fn new() -> Self {
        Self::with_max_message_size(DEFAULT_MAX_MESSAGE_SIZE)
    }

    /// Create a reassembler that gives up on messages longer than
    /// `max_message_size` bytes.
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
            running_status: None,
            max_message_size,
            discarding: false,
        }
    }

    /// Consume one byte.
    ///
    /// Returns `Ok(Some(message))` when the byte completes a message and
    /// `Ok(None)` while more bytes are needed.
    ///
    /// A message that grows past the size cap is dropped with
    /// `FrameError::MessageTooLarge`. The rest of it is skipped: data bytes
    /// are discarded until the next status byte, and a dropped sysex block
    /// also clears running status. Real-time bytes are still delivered while
    /// skipping.
    pub fn feed(&mut self, byte: u8) -> Result<Option<MidiMessage>> {
        if self.discarding {
            if !is_status(byte) {
                return Ok(None);
            }
            if !sets_running_status(byte) {
                return Ok(Some(MidiMessage::copy_from_slice(&[byte])));
            }
            self.discarding = false;
            if byte == SYSEX_END {
                trace!("end of discarded sysex block");
                return Ok(None);
            }
        }

        self.buf.put_u8(byte);

        if self.buf.len() == 1 {
            if is_status(byte) {
                if sets_running_status(byte) {
                    self.running_status = Some(byte);
                }
            } else {
                self.buf.clear();
                match self.running_status {
                    Some(status) => self.buf.put_slice(&[status, byte]),
                    None => {
                        trace!(byte, "dropping data byte with no running status");
                        return Ok(None);
                    }
                }
            }
        }

        if classify(&self.buf).is_satisfied_by(self.buf.len()) {
            let message = MidiMessage::new(self.buf.split().freeze());
            return Ok(Some(message));
        }

        if self.buf.len() > self.max_message_size {
            let size = self.buf.len();
            if self.buf.first() == Some(&SYSEX_START) {
                self.running_status = None;
            }
            self.buf.clear();
            self.discarding = true;
            return Err(FrameError::MessageTooLarge {
                size,
                max: self.max_message_size,
            });
        }

        Ok(None)
    }

    /// The status byte a leading data byte would be attributed to.
    pub fn running_status(&self) -> Option<u8> {
        self.running_status
    }

    /// Bytes of the message currently being assembled.
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    pub fn max_message_size(&self) -> usize {
        self.max_message_size
    }

    /// Whether the rest of an oversized message is being skipped.
    pub fn is_discarding(&self) -> bool {
        self.discarding
    }

    /// Forget the partial message and the running status.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.running_status = None;
        self.discarding = false;
    }
}
