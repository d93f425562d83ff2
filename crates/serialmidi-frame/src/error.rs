/// Errors that can occur while reassembling or framing MIDI messages.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit in the envelope length field.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An inbound message grew past the reassembly limit without completing.
    /// The partial message has been discarded.
    #[error("incomplete message discarded after {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// An I/O error occurred while reading or writing the link.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The link was closed.
    #[error("connection closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
