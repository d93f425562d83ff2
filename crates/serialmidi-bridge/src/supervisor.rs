use std::io::ErrorKind;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::bounded;
use serialmidi_frame::{
    FrameError, FrameTarget, MessageReader, MessageWriter, MidiMessage, RunningStatusReassembler,
};
use serialmidi_transport::TransportError;
use tracing::{debug, error, info, trace, warn};

use crate::config::BridgeConfig;
use crate::device::{InputCallback, MidiLink, MidiSink, PortInventory, PortSelection};
use crate::error::{BridgeError, Result};
use crate::link::SerialLink;
use crate::queue::{BridgeQueues, MessageReceiver, MessageSender};
use crate::state::{BridgeState, StateCell};

/// Requests a running bridge to stop. Cheap to clone; safe to call from a
/// signal handler.
#[derive(Debug, Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
    state: Arc<StateCell>,
}

impl StopHandle {
    fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
            state: Arc::new(StateCell::new()),
        }
    }

    /// Ask every worker to exit at its next poll.
    pub fn stop(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            self.state.advance(BridgeState::Stopping);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> BridgeState {
        self.state.get()
    }
}

struct Worker {
    name: &'static str,
    handle: JoinHandle<Result<()>>,
}

/// Owns the bridge workers: serial reader, serial writer and MIDI pump.
pub struct BridgeSupervisor {
    stop: StopHandle,
    workers: Vec<Worker>,
    ports: PortSelection,
}

impl BridgeSupervisor {
    /// Resolve ports, open both transports and start the workers.
    ///
    /// MIDI ports are enumerated and matched before anything is opened; a
    /// name that matches no port fails with `BridgeError::PortNotFound`
    /// and `open_serial` is never called. If the serial link cannot be
    /// opened the port listing has still been logged, which is all the
    /// bridge can offer without it.
    pub fn start<L, S, F>(config: BridgeConfig, link: L, open_serial: F) -> Result<Self>
    where
        L: MidiLink,
        S: SerialLink,
        F: FnOnce(&BridgeConfig) -> std::result::Result<S, TransportError>,
    {
        let stop = StopHandle::new();

        let inventory = PortInventory::collect(&link)?;
        inventory.log();
        if config.frame_target == FrameTarget::Envelope {
            info!("Mega EverDrive PRO envelope framing enabled");
        }
        let ports = inventory.select(&config.midi_in_name, &config.midi_out_name)?;

        let serial = open_serial(&config).map_err(BridgeError::SerialUnavailable)?;
        info!(port = %config.serial_port, baud = config.baud_rate, "serial link open");

        let queues = BridgeQueues::new();
        let (serial_tx, serial_rx) = queues.serial_to_device.split();
        let (device_tx, device_rx) = queues.device_to_serial.split();

        let mut workers = Vec::with_capacity(3);

        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);
        let pump = {
            let stop = stop.clone();
            let ports = ports.clone();
            let poll = config.poll_interval;
            spawn("midi-pump", move || {
                midi_pump(link, &ports, device_tx, serial_rx, ready_tx, &stop, poll)
            })?
        };
        workers.push(pump);

        let opened = match ready_rx.recv() {
            Ok(result) => result,
            Err(_) => Err(BridgeError::WorkerPanicked("midi-pump")),
        };
        if let Err(err) = opened {
            abort(&stop, workers);
            return Err(err);
        }
        stop.state.advance(BridgeState::Ready);

        let reader_link = match serial.try_clone_link() {
            Ok(link) => link,
            Err(err) => {
                abort(&stop, workers);
                return Err(err);
            }
        };

        let reader = {
            let stop = stop.clone();
            let config = config.clone();
            spawn("serial-reader", move || {
                serial_reader(reader_link, serial_tx, &config, &stop)
            })
        };
        match reader {
            Ok(worker) => workers.push(worker),
            Err(err) => {
                abort(&stop, workers);
                return Err(err);
            }
        }

        let writer = {
            let stop = stop.clone();
            let target = config.frame_target;
            let poll = config.poll_interval;
            spawn("serial-writer", move || {
                serial_writer(serial, device_rx, target, &stop, poll)
            })
        };
        match writer {
            Ok(worker) => workers.push(worker),
            Err(err) => {
                abort(&stop, workers);
                return Err(err);
            }
        }

        stop.state.advance(BridgeState::Running);
        info!(
            midi_in = %ports.input_name,
            midi_out = %ports.output_name,
            "bridge running, hit ctrl-c to exit"
        );

        Ok(Self {
            stop,
            workers,
            ports,
        })
    }

    pub fn state(&self) -> BridgeState {
        self.stop.state()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Ports the bridge is connected to.
    pub fn ports(&self) -> &PortSelection {
        &self.ports
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Block until every worker has exited.
    ///
    /// Workers run until a stop is requested or one of them hits a fatal
    /// error. Returns the first worker error, if any.
    pub fn wait(mut self) -> Result<()> {
        let workers = std::mem::take(&mut self.workers);
        let result = join_all(workers);
        self.stop.state.advance(BridgeState::Stopped);
        info!("bridge stopped");
        result
    }

    /// Request a stop and wait for the workers.
    pub fn shutdown(self) -> Result<()> {
        self.stop();
        self.wait()
    }
}

impl Drop for BridgeSupervisor {
    fn drop(&mut self) {
        self.stop.stop();
    }
}

fn spawn<F>(name: &'static str, f: F) -> Result<Worker>
where
    F: FnOnce() -> Result<()> + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(f)
        .map_err(|source| BridgeError::Spawn { name, source })?;
    Ok(Worker { name, handle })
}

fn join_all(workers: Vec<Worker>) -> Result<()> {
    let mut first_error = None;
    for worker in workers {
        let outcome = worker
            .handle
            .join()
            .unwrap_or(Err(BridgeError::WorkerPanicked(worker.name)));
        if let Err(err) = outcome {
            debug!(worker = worker.name, error = %err, "worker exited with error");
            first_error.get_or_insert(err);
        }
    }
    first_error.map_or(Ok(()), Err)
}

fn abort(stop: &StopHandle, workers: Vec<Worker>) {
    stop.stop();
    let _ = join_all(workers);
    stop.state.advance(BridgeState::Stopped);
}

/// Stop every worker after a fatal error and hand the error back.
fn fail(stop: &StopHandle, worker: &'static str, err: BridgeError) -> Result<()> {
    error!(worker, error = %err, "fatal bridge error");
    stop.stop();
    Err(err)
}

fn serial_reader<S: SerialLink>(
    link: S,
    to_device: MessageSender,
    config: &BridgeConfig,
    stop: &StopHandle,
) -> Result<()> {
    let mut reader = MessageReader::with_reassembler(
        link,
        RunningStatusReassembler::with_max_message_size(config.max_message_size),
    );

    while stop.is_running() {
        match reader.read_message() {
            Ok(Some(message)) => {
                debug!(bytes = ?message.as_bytes(), kind = message.kind(), "serial in");
                let text = config
                    .print_sysex_text
                    .then(|| message.sysex_text())
                    .flatten();
                to_device.push(message);
                if let Some(text) = text {
                    println!("{text}");
                }
            }
            Ok(None) => continue,
            Err(FrameError::MessageTooLarge { size, max }) => {
                warn!(size, max, "discarded incomplete message from serial link");
            }
            Err(err) => return fail(stop, "serial-reader", err.into()),
        }
    }

    Ok(())
}

fn serial_writer<S: SerialLink>(
    link: S,
    from_device: MessageReceiver,
    target: FrameTarget,
    stop: &StopHandle,
    poll: Duration,
) -> Result<()> {
    let mut writer = MessageWriter::with_target(link, target);

    while stop.is_running() {
        let message = match from_device.pop_timeout(poll) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(BridgeError::QueueClosed) if !stop.is_running() => break,
            Err(err) => return fail(stop, "serial-writer", err),
        };

        debug!(bytes = ?message.as_bytes(), kind = message.kind(), "serial out");
        let mut sent = writer.write_message(&message);
        while let Err(FrameError::Io(err)) = &sent {
            if err.kind() != ErrorKind::TimedOut || !stop.is_running() {
                break;
            }
            warn!(pending = writer.pending(), "serial write timed out, retrying");
            sent = writer.write_pending();
        }
        match sent {
            Ok(()) => {}
            Err(FrameError::Io(err)) if err.kind() == ErrorKind::TimedOut => break,
            Err(err) => return fail(stop, "serial-writer", err.into()),
        }
    }

    Ok(())
}

fn midi_pump<L: MidiLink>(
    mut link: L,
    ports: &PortSelection,
    to_serial: MessageSender,
    from_serial: MessageReceiver,
    ready: crossbeam_channel::Sender<Result<()>>,
    stop: &StopHandle,
    poll: Duration,
) -> Result<()> {
    let opened = link.open_output(ports.output_index).and_then(|output| {
        let callback: InputCallback = Box::new(move |stamp, bytes| {
            trace!(stamp, len = bytes.len(), "midi in");
            to_serial.push(MidiMessage::copy_from_slice(bytes));
        });
        let input = link.open_input(ports.input_index, callback)?;
        Ok((output, input))
    });

    let (mut output, _input) = match opened {
        Ok(handles) => {
            let _ = ready.send(Ok(()));
            handles
        }
        Err(err) => {
            let _ = ready.send(Err(err));
            return Ok(());
        }
    };

    while stop.is_running() {
        let message = match from_serial.pop_timeout(poll) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(BridgeError::QueueClosed) if !stop.is_running() => break,
            Err(err) => return fail(stop, "midi-pump", err),
        };

        debug!(bytes = ?message.as_bytes(), kind = message.kind(), "midi out");
        if let Err(err) = output.send(message.as_bytes()) {
            return fail(stop, "midi-pump", err);
        }
    }

    Ok(())
}
