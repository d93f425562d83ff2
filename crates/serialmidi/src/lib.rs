//! Bridge a serial line carrying raw MIDI bytes to a system MIDI device.
//!
//! Inbound serial bytes are reassembled into complete messages (running
//! status included) and sent to a MIDI output port; messages from a MIDI
//! input port are written back to the serial line, either raw or wrapped in
//! the Mega EverDrive PRO envelope.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial byte transport and port enumeration
//! - [`frame`]: message classification, reassembly and outbound framing
//! - [`bridge`]: queues, MIDI device links and the bridge supervisor

/// Re-export transport types.
pub mod transport {
    pub use serialmidi_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use serialmidi_frame::*;
}

/// Re-export bridge types.
pub mod bridge {
    pub use serialmidi_bridge::*;
}
