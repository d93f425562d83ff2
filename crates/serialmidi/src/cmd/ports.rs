use serialmidi_bridge::{MidirLink, PortInventory, DEFAULT_CLIENT_NAME};
use serialmidi_transport::available_ports;
use tracing::warn;

use crate::cmd::PortsArgs;
use crate::exit::{transport_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat, PortRow};

pub fn run(args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let mut rows: Vec<PortRow> = available_ports()
        .map_err(|err| transport_error("serial port enumeration failed", err))?
        .into_iter()
        .map(|entry| PortRow {
            kind: "serial",
            name: entry.name,
            detail: Some(match entry.product {
                Some(product) => format!("{}: {product}", entry.kind),
                None => entry.kind.to_string(),
            }),
        })
        .collect();

    let mut midi_enumerated = false;
    if !args.serial_only {
        // A missing MIDI backend still leaves the serial listing useful.
        match MidirLink::new(DEFAULT_CLIENT_NAME).and_then(|link| PortInventory::collect(&link)) {
            Ok(inventory) => {
                rows.extend(midi_rows(inventory));
                midi_enumerated = true;
            }
            Err(err) => warn!(error = %err, "MIDI port enumeration failed"),
        }
    }

    print_ports(&rows, midi_enumerated, format);
    Ok(SUCCESS)
}

fn midi_rows(inventory: PortInventory) -> impl Iterator<Item = PortRow> {
    let inputs = inventory.inputs.into_iter().map(|name| PortRow {
        kind: "midi-in",
        name,
        detail: None,
    });
    let outputs = inventory.outputs.into_iter().map(|name| PortRow {
        kind: "midi-out",
        name,
        detail: None,
    });
    inputs.chain(outputs)
}
