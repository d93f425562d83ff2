use serialmidi_bridge::{BridgeSupervisor, MidirLink, StopHandle};
use serialmidi_transport::SerialStream;
use tracing::info;

use crate::cmd::BridgeArgs;
use crate::exit::{bridge_error, CliError, CliResult, INTERNAL, SUCCESS};

pub fn run(args: BridgeArgs) -> CliResult<i32> {
    let config = args.to_config();
    let link = MidirLink::new(&config.client_name)
        .map_err(|err| bridge_error("MIDI backend unavailable", err))?;

    let bridge = BridgeSupervisor::start(config, link, |config| {
        SerialStream::open_with_timeout(
            &config.serial_port,
            config.baud_rate,
            config.poll_interval,
        )
    })
    .map_err(|err| bridge_error("bridge failed to start", err))?;

    install_ctrlc_handler(bridge.stop_handle())?;

    bridge
        .wait()
        .map_err(|err| bridge_error("bridge stopped", err))?;
    Ok(SUCCESS)
}

fn install_ctrlc_handler(stop: StopHandle) -> CliResult<()> {
    ctrlc::set_handler(move || {
        info!("Terminating.");
        stop.stop();
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
