//! Serial <-> MIDI device bridge.
//!
//! This is the "just works" layer. Give it a serial link and a MIDI device
//! backend; it picks the ports, starts the three workers and moves messages
//! in both directions until stopped:
//!
//! ```text
//! serial link ──reader──▶ serial→device queue ──pump──▶ MIDI output
//! serial link ◀──writer── device→serial queue ◀──callback── MIDI input
//! ```

pub mod config;
pub mod device;
pub mod error;
pub mod link;
#[cfg(feature = "midi-io")]
pub mod midir_link;
pub mod queue;
pub mod state;
pub mod supervisor;

pub use config::{
    BridgeConfig, DEFAULT_CLIENT_NAME, DEFAULT_MIDI_IN_NAME, DEFAULT_MIDI_OUT_NAME,
    DEFAULT_POLL_INTERVAL,
};
pub use device::{
    select_port, Direction, InputCallback, MidiLink, MidiSink, PortInventory, PortSelection,
};
pub use error::{BridgeError, Result};
pub use link::SerialLink;
#[cfg(feature = "midi-io")]
pub use midir_link::MidirLink;
pub use queue::{BridgeQueues, MessageQueue, MessageReceiver, MessageSender};
pub use state::BridgeState;
pub use supervisor::{BridgeSupervisor, StopHandle};
