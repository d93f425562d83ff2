use clap::{Args, Subcommand};
use serialmidi_bridge::{BridgeConfig, DEFAULT_MIDI_IN_NAME, DEFAULT_MIDI_OUT_NAME};
use serialmidi_frame::FrameTarget;
use serialmidi_transport::DEFAULT_BAUD_RATE;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod bridge;
pub mod ports;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Bridge a serial port to MIDI input/output ports until interrupted.
    Bridge(BridgeArgs),
    /// List serial ports and MIDI ports.
    Ports(PortsArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Bridge(args) => bridge::run(args),
        Command::Ports(args) => ports::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct BridgeArgs {
    /// Serial port name or path.
    #[arg(long, alias = "serial_name", env = "SERIALMIDI_SERIAL_NAME")]
    pub serial_name: String,
    /// Serial baud rate.
    #[arg(long, default_value_t = DEFAULT_BAUD_RATE, env = "SERIALMIDI_BAUD")]
    pub baud: u32,
    /// Substring of the MIDI input port name.
    #[arg(long, alias = "midi_in_name", default_value = DEFAULT_MIDI_IN_NAME, env = "SERIALMIDI_MIDI_IN")]
    pub midi_in_name: String,
    /// Substring of the MIDI output port name.
    #[arg(long, alias = "midi_out_name", default_value = DEFAULT_MIDI_OUT_NAME, env = "SERIALMIDI_MIDI_OUT")]
    pub midi_out_name: String,
    /// Wrap outbound messages in the Mega EverDrive PRO envelope.
    #[arg(long, alias = "everdrive_pro")]
    pub everdrive_pro: bool,
    /// Print the text carried by inbound sysex messages.
    #[arg(long = "string")]
    pub print_string: bool,
}

impl BridgeArgs {
    pub fn to_config(&self) -> BridgeConfig {
        BridgeConfig {
            baud_rate: self.baud,
            midi_in_name: self.midi_in_name.clone(),
            midi_out_name: self.midi_out_name.clone(),
            frame_target: if self.everdrive_pro {
                FrameTarget::Envelope
            } else {
                FrameTarget::Passthrough
            },
            print_sysex_text: self.print_string,
            ..BridgeConfig::new(self.serial_name.clone())
        }
    }
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {
    /// Only list serial ports; skip MIDI enumeration.
    #[arg(long)]
    pub serial_only: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
