use bytes::Bytes;

use crate::status::{opcode_name, SYSEX_START};

/// A complete MIDI message: a status byte and its data bytes, or a whole
/// system exclusive block including the 0xF0/0xF7 delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MidiMessage {
    bytes: Bytes,
}

impl MidiMessage {
    /// Create a message from raw bytes.
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Copy a message out of a borrowed slice.
    pub fn copy_from_slice(bytes: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    /// The opcode, if the message is not empty.
    pub fn opcode(&self) -> Option<u8> {
        self.bytes.first().copied()
    }

    /// Name of the message kind, for logs.
    pub fn kind(&self) -> &'static str {
        self.opcode().map(opcode_name).unwrap_or("EMPTY")
    }

    pub fn is_sysex(&self) -> bool {
        self.opcode() == Some(SYSEX_START)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }

    /// Render a system exclusive block as text.
    ///
    /// Some devices log through sysex; every byte below 0xF0 is taken as a
    /// character code, so the delimiters drop out. Returns `None` for
    /// anything that is not sysex.
    pub fn sysex_text(&self) -> Option<String> {
        if !self.is_sysex() {
            return None;
        }
        Some(
            self.bytes
                .iter()
                .filter(|&&b| b < SYSEX_START)
                .map(|&b| char::from(b))
                .collect(),
        )
    }
}

impl AsRef<[u8]> for MidiMessage {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for MidiMessage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&'static [u8]> for MidiMessage {
    fn from(bytes: &'static [u8]) -> Self {
        Self::new(Bytes::from_static(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sysex_text_drops_delimiters() {
        let msg = MidiMessage::from(b"\xF0hello\xF7".to_vec());
        assert_eq!(msg.sysex_text().as_deref(), Some("hello"));
    }

    #[test]
    fn sysex_text_ignores_channel_messages() {
        let msg = MidiMessage::from(vec![0x90, 0x40, 0x7F]);
        assert!(msg.sysex_text().is_none());
    }

    #[test]
    fn accessors() {
        let msg = MidiMessage::copy_from_slice(&[0xC3, 0x05]);
        assert_eq!(msg.opcode(), Some(0xC3));
        assert_eq!(msg.kind(), "PROGRAM_CHANGE");
        assert_eq!(msg.len(), 2);
        assert!(!msg.is_sysex());
        assert_eq!(msg.as_bytes(), &[0xC3, 0x05]);
        assert_eq!(msg.into_bytes().as_ref(), &[0xC3, 0x05]);
    }
}
