use crate::device::Direction;

/// Errors that can occur while setting up or running the bridge.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] serialmidi_transport::TransportError),

    /// Frame-level error.
    #[error("frame error: {0}")]
    Frame(#[from] serialmidi_frame::FrameError),

    /// No enumerated MIDI port contains the configured name.
    #[error("MIDI {direction} port matching {wanted:?} not found; available: {available:?}")]
    PortNotFound {
        direction: Direction,
        wanted: String,
        available: Vec<String>,
    },

    /// The serial port could not be opened.
    #[error("serial port unavailable: {0}")]
    SerialUnavailable(#[source] serialmidi_transport::TransportError),

    /// MIDI device backend error.
    #[error("MIDI device error: {0}")]
    Device(String),

    /// Every producer of a queue is gone.
    #[error("message queue closed")]
    QueueClosed,

    /// A worker thread panicked.
    #[error("{0} worker panicked")]
    WorkerPanicked(&'static str),

    /// A worker thread could not be started.
    #[error("failed to spawn {name} worker: {source}")]
    Spawn {
        name: &'static str,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, BridgeError>;
