use serde::Serialize;
use tracing::info;

use crate::error::{BridgeError, Result};

/// Callback invoked by the MIDI backend for every inbound message, with the
/// backend timestamp in microseconds and the raw message bytes.
///
/// Runs on the backend's own thread. Implementations must only hand the
/// message off; anything slow here stalls the backend's delivery.
pub type InputCallback = Box<dyn FnMut(u64, &[u8]) + Send + 'static>;

/// Which side of the MIDI device a port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Input => f.write_str("input"),
            Direction::Output => f.write_str("output"),
        }
    }
}

/// An open MIDI output port.
pub trait MidiSink {
    /// Send one complete message.
    fn send(&mut self, message: &[u8]) -> Result<()>;
}

/// A MIDI device backend: port enumeration plus opening ports by index.
///
/// The link is moved onto the MIDI pump thread before any port is opened,
/// so the opened handles never cross threads.
pub trait MidiLink: Send + 'static {
    /// Open output port handle.
    type Output: MidiSink;
    /// Keeps the input port open and its callback registered until dropped.
    type InputGuard;

    fn input_port_names(&self) -> Result<Vec<String>>;

    fn output_port_names(&self) -> Result<Vec<String>>;

    fn open_output(&mut self, index: usize) -> Result<Self::Output>;

    /// Open an input port and register `callback` for its messages.
    fn open_input(&mut self, index: usize, callback: InputCallback) -> Result<Self::InputGuard>;
}

/// Index of the first port whose name contains `wanted`.
pub fn select_port(names: &[String], wanted: &str) -> Option<usize> {
    names.iter().position(|name| name.contains(wanted))
}

/// Enumerated MIDI ports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortInventory {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

/// The ports chosen for a bridge run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSelection {
    pub input_index: usize,
    pub input_name: String,
    pub output_index: usize,
    pub output_name: String,
}

impl PortInventory {
    /// Enumerate both directions of a link.
    pub fn collect<L: MidiLink + ?Sized>(link: &L) -> Result<Self> {
        Ok(Self {
            inputs: link.input_port_names()?,
            outputs: link.output_port_names()?,
        })
    }

    /// Log the available ports.
    pub fn log(&self) {
        info!("IN : '{}'", self.inputs.join("','"));
        info!("OUT : '{}'", self.outputs.join("','"));
    }

    /// Resolve the configured names to ports.
    ///
    /// Fails on the first direction with no match; nothing is opened here.
    pub fn select(&self, input: &str, output: &str) -> Result<PortSelection> {
        let input_index = Self::find(&self.inputs, input, Direction::Input)?;
        let output_index = Self::find(&self.outputs, output, Direction::Output)?;

        Ok(PortSelection {
            input_index,
            input_name: self.inputs[input_index].clone(),
            output_index,
            output_name: self.outputs[output_index].clone(),
        })
    }

    fn find(names: &[String], wanted: &str, direction: Direction) -> Result<usize> {
        select_port(names, wanted).ok_or_else(|| BridgeError::PortNotFound {
            direction,
            wanted: wanted.to_string(),
            available: names.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn selects_first_substring_match() {
        let ports = names(&["Midi Through", "IAC Driver IAC Bus 1", "IAC Bus 1 (copy)"]);
        assert_eq!(select_port(&ports, "IAC Bus 1"), Some(1));
        assert_eq!(select_port(&ports, "Through"), Some(0));
        assert_eq!(select_port(&ports, "iac bus"), None);
    }

    #[test]
    fn empty_enumeration_matches_nothing() {
        assert_eq!(select_port(&[], "IAC Bus 1"), None);
    }

    #[test]
    fn inventory_selects_both_directions() {
        let inventory = PortInventory {
            inputs: names(&["USB MIDI In", "IAC Bus 1"]),
            outputs: names(&["IAC Bus 2", "USB MIDI Out"]),
        };

        let selection = inventory.select("IAC Bus 1", "USB").unwrap();
        assert_eq!(selection.input_index, 1);
        assert_eq!(selection.input_name, "IAC Bus 1");
        assert_eq!(selection.output_index, 1);
        assert_eq!(selection.output_name, "USB MIDI Out");
    }

    #[test]
    fn missing_output_reports_direction_and_candidates() {
        let inventory = PortInventory {
            inputs: names(&["IAC Bus 1"]),
            outputs: names(&["IAC Bus 3"]),
        };

        match inventory.select("IAC Bus 1", "IAC Bus 2") {
            Err(BridgeError::PortNotFound {
                direction,
                wanted,
                available,
            }) => {
                assert_eq!(direction, Direction::Output);
                assert_eq!(wanted, "IAC Bus 2");
                assert_eq!(available, names(&["IAC Bus 3"]));
            }
            other => panic!("expected PortNotFound, got {other:?}"),
        }
    }

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Input.to_string(), "input");
        assert_eq!(Direction::Output.to_string(), "output");
    }
}
