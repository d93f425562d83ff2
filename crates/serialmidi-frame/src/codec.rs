use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Fixed header the Mega EverDrive PRO expects in front of every payload.
pub const ENVELOPE_HEADER: [u8; 8] = [0x2B, 0xD4, 0x1A, 0xE5, 0x01, 0x81, 0x00, 0x00];

/// Envelope overhead: header (8) + length (4) + pad (1) = 13 bytes.
pub const ENVELOPE_OVERHEAD: usize = ENVELOPE_HEADER.len() + 4 + 1;

/// How outbound messages are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameTarget {
    /// Raw MIDI bytes, unchanged.
    #[default]
    Passthrough,
    /// Wrapped in the hardware envelope.
    Envelope,
}

impl FrameTarget {
    /// The total wire size of a payload of `len` bytes under this target.
    pub fn wire_size(self, len: usize) -> usize {
        match self {
            FrameTarget::Passthrough => len,
            FrameTarget::Envelope => ENVELOPE_OVERHEAD + len,
        }
    }
}

/// Encode a message into a fresh buffer.
pub fn encode(message: &[u8], target: FrameTarget) -> Result<Bytes> {
    let mut dst = BytesMut::with_capacity(target.wire_size(message.len()));
    encode_into(message, target, &mut dst)?;
    Ok(dst.freeze())
}

/// Encode a message into the wire format, appending to `dst`.
///
/// Envelope wire format:
/// ```text
/// ┌──────────────────────────┬────────────┬──────┬──────────────────┐
/// │ Header (8B)              │ Length     │ Pad  │ Payload          │
/// │ 2B D4 1A E5 01 81 00 00  │ (4B BE)    │ 00   │ (Length bytes)   │
/// └──────────────────────────┴────────────┴──────┴──────────────────┘
/// ```
pub fn encode_into(message: &[u8], target: FrameTarget, dst: &mut BytesMut) -> Result<()> {
    match target {
        FrameTarget::Passthrough => {
            dst.reserve(message.len());
            dst.put_slice(message);
        }
        FrameTarget::Envelope => {
            let len = u32::try_from(message.len()).map_err(|_| FrameError::PayloadTooLarge {
                size: message.len(),
                max: u32::MAX as usize,
            })?;
            dst.reserve(ENVELOPE_OVERHEAD + message.len());
            dst.put_slice(&ENVELOPE_HEADER);
            dst.put_u32(len);
            dst.put_u8(0x00);
            dst.put_slice(message);
        }
    }
    Ok(())
}
