//! MIDI device backend over `midir` (CoreMIDI, ALSA, WinMM, ...).

use midir::{Ignore, MidiInput, MidiInputConnection, MidiOutput, MidiOutputConnection};
use tracing::info;

use crate::device::{InputCallback, MidiLink, MidiSink};
use crate::error::{BridgeError, Result};

impl From<midir::InitError> for BridgeError {
    fn from(e: midir::InitError) -> Self {
        BridgeError::Device(e.to_string())
    }
}

impl From<midir::ConnectError<MidiOutput>> for BridgeError {
    fn from(e: midir::ConnectError<MidiOutput>) -> Self {
        BridgeError::Device(e.to_string())
    }
}

impl From<midir::ConnectError<MidiInput>> for BridgeError {
    fn from(e: midir::ConnectError<MidiInput>) -> Self {
        BridgeError::Device(e.to_string())
    }
}

impl From<midir::PortInfoError> for BridgeError {
    fn from(e: midir::PortInfoError) -> Self {
        BridgeError::Device(e.to_string())
    }
}

/// `midir` client pair. Each direction can be opened once; `midir`
/// consumes the client when it connects.
pub struct MidirLink {
    client_name: String,
    input: Option<MidiInput>,
    output: Option<MidiOutput>,
}

impl MidirLink {
    /// Register input and output clients with the system MIDI backend.
    ///
    /// Sysex, timing clock and active sensing are all delivered; the bridge
    /// forwards every byte the device sends.
    pub fn new(client_name: &str) -> Result<Self> {
        let mut input = MidiInput::new(client_name)?;
        input.ignore(Ignore::None);
        let output = MidiOutput::new(client_name)?;

        Ok(Self {
            client_name: client_name.to_string(),
            input: Some(input),
            output: Some(output),
        })
    }

    fn input(&self) -> Result<&MidiInput> {
        self.input
            .as_ref()
            .ok_or_else(|| BridgeError::Device("MIDI input already opened".to_string()))
    }

    fn output(&self) -> Result<&MidiOutput> {
        self.output
            .as_ref()
            .ok_or_else(|| BridgeError::Device("MIDI output already opened".to_string()))
    }
}

impl MidiLink for MidirLink {
    type Output = MidiOutputConnection;
    type InputGuard = MidiInputConnection<()>;

    fn input_port_names(&self) -> Result<Vec<String>> {
        let input = self.input()?;
        input
            .ports()
            .iter()
            .map(|port| Ok(input.port_name(port)?))
            .collect()
    }

    fn output_port_names(&self) -> Result<Vec<String>> {
        let output = self.output()?;
        output
            .ports()
            .iter()
            .map(|port| Ok(output.port_name(port)?))
            .collect()
    }

    fn open_output(&mut self, index: usize) -> Result<Self::Output> {
        let output = self
            .output
            .take()
            .ok_or_else(|| BridgeError::Device("MIDI output already opened".to_string()))?;
        let ports = output.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| BridgeError::Device(format!("MIDI output port {index} vanished")))?;
        let name = output.port_name(port).unwrap_or_default();

        let connection = output.connect(port, &format!("{}-out", self.client_name))?;
        info!(port = %name, "opened MIDI output");
        Ok(connection)
    }

    fn open_input(&mut self, index: usize, mut callback: InputCallback) -> Result<Self::InputGuard> {
        let input = self
            .input
            .take()
            .ok_or_else(|| BridgeError::Device("MIDI input already opened".to_string()))?;
        let ports = input.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| BridgeError::Device(format!("MIDI input port {index} vanished")))?;
        let name = input.port_name(port).unwrap_or_default();

        let connection = input.connect(
            port,
            &format!("{}-in", self.client_name),
            move |stamp, message, _| callback(stamp, message),
            (),
        )?;
        info!(port = %name, "opened MIDI input");
        Ok(connection)
    }
}

impl MidiSink for MidiOutputConnection {
    fn send(&mut self, message: &[u8]) -> Result<()> {
        MidiOutputConnection::send(self, message).map_err(|e| BridgeError::Device(e.to_string()))
    }
}
