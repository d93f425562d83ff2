//! MIDI message reassembly and framing for serial links.
//!
//! Inbound, a serial link delivers an undelimited byte stream. The
//! [`RunningStatusReassembler`] turns it back into complete MIDI messages,
//! one byte at a time, using the opcode length rules in [`status`] and
//! running-status inference.
//!
//! Outbound, every message is either written as-is or wrapped in the fixed
//! hardware envelope:
//! - An 8-byte constant header
//! - A 4-byte big-endian payload length
//! - One zero pad byte
//!
//! [`MessageReader`] and [`MessageWriter`] apply both over any `Read`/`Write`.

pub mod codec;
pub mod error;
pub mod message;
pub mod reader;
pub mod reassembler;
pub mod status;
pub mod writer;

pub use codec::{encode, encode_into, FrameTarget, ENVELOPE_HEADER, ENVELOPE_OVERHEAD};
pub use error::{FrameError, Result};
pub use message::MidiMessage;
pub use reader::MessageReader;
pub use reassembler::{RunningStatusReassembler, DEFAULT_MAX_MESSAGE_SIZE};
pub use status::{classify, MessageLength, UNKNOWN_LENGTH_SENTINEL};
pub use writer::MessageWriter;
