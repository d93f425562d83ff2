use std::time::Duration;

use serialmidi_frame::{FrameTarget, DEFAULT_MAX_MESSAGE_SIZE};
use serialmidi_transport::DEFAULT_BAUD_RATE;

/// Default MIDI input port name fragment.
pub const DEFAULT_MIDI_IN_NAME: &str = "IAC Bus 1";

/// Default MIDI output port name fragment.
pub const DEFAULT_MIDI_OUT_NAME: &str = "IAC Bus 2";

/// How long a worker waits on its queue or the serial link before checking
/// whether it should stop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(400);

/// Default client name registered with the MIDI backend.
pub const DEFAULT_CLIENT_NAME: &str = "serialmidi";

/// Bridge configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Serial device name or path.
    pub serial_port: String,
    /// Serial line speed.
    pub baud_rate: u32,
    /// Substring selecting the MIDI input port.
    pub midi_in_name: String,
    /// Substring selecting the MIDI output port.
    pub midi_out_name: String,
    /// Layout of messages written to the serial link.
    pub frame_target: FrameTarget,
    /// Print the text carried by inbound sysex blocks to stdout.
    pub print_sysex_text: bool,
    /// Serial read timeout and queue wait.
    pub poll_interval: Duration,
    /// Largest inbound message kept while waiting for it to complete.
    pub max_message_size: usize,
    /// Client name registered with the MIDI backend.
    pub client_name: String,
}

impl BridgeConfig {
    /// Default configuration for the given serial port.
    pub fn new(serial_port: impl Into<String>) -> Self {
        Self {
            serial_port: serial_port.into(),
            ..Self::default()
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            serial_port: String::new(),
            baud_rate: DEFAULT_BAUD_RATE,
            midi_in_name: DEFAULT_MIDI_IN_NAME.to_string(),
            midi_out_name: DEFAULT_MIDI_OUT_NAME.to_string(),
            frame_target: FrameTarget::Passthrough,
            print_sysex_text: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            client_name: DEFAULT_CLIENT_NAME.to_string(),
        }
    }
}
