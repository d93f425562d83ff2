use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use serialmidi_frame::MidiMessage;
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Producer half of a message queue. Never blocks.
#[derive(Debug, Clone)]
pub struct MessageSender {
    tx: Sender<MidiMessage>,
    name: &'static str,
}

/// Consumer half of a message queue.
#[derive(Debug, Clone)]
pub struct MessageReceiver {
    rx: Receiver<MidiMessage>,
    name: &'static str,
}

/// One unbounded FIFO queue.
#[derive(Debug, Clone)]
pub struct MessageQueue {
    pub sender: MessageSender,
    pub receiver: MessageReceiver,
}

/// The two queues between the serial side and the MIDI device side.
#[derive(Debug, Clone)]
pub struct BridgeQueues {
    /// Filled by the serial reader, drained by the MIDI pump.
    pub serial_to_device: MessageQueue,
    /// Filled by the MIDI input callback, drained by the serial writer.
    pub device_to_serial: MessageQueue,
}

impl MessageQueue {
    pub fn new(name: &'static str) -> Self {
        let (tx, rx) = unbounded();
        Self {
            sender: MessageSender { tx, name },
            receiver: MessageReceiver { rx, name },
        }
    }

    /// Split into its two halves.
    pub fn split(self) -> (MessageSender, MessageReceiver) {
        (self.sender, self.receiver)
    }
}

impl BridgeQueues {
    pub fn new() -> Self {
        Self {
            serial_to_device: MessageQueue::new("serial->device"),
            device_to_serial: MessageQueue::new("device->serial"),
        }
    }
}

impl Default for BridgeQueues {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSender {
    /// Enqueue a message.
    ///
    /// If the consuming worker has already exited, the message is dropped.
    pub fn push(&self, message: MidiMessage) {
        if self.tx.send(message).is_err() {
            debug!(queue = self.name, "consumer gone, dropping message");
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl MessageReceiver {
    /// Wait up to `timeout` for the next message.
    ///
    /// Returns `Ok(None)` if nothing arrived in time and
    /// `Err(BridgeError::QueueClosed)` once the queue is empty and every
    /// sender has been dropped.
    pub fn pop_timeout(&self, timeout: Duration) -> Result<Option<MidiMessage>> {
        match self.rx.recv_timeout(timeout) {
            Ok(message) => Ok(Some(message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(BridgeError::QueueClosed),
        }
    }

    /// Messages waiting in the queue.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
