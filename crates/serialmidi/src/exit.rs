use std::fmt;
use std::io;

use serialmidi_bridge::BridgeError;
use serialmidi_frame::FrameError;
use serialmidi_transport::TransportError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => TRANSPORT_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Io(source) => io_error(context, source),
        FrameError::ConnectionClosed => CliError::new(TRANSPORT_ERROR, format!("{context}: {err}")),
        other => CliError::new(FAILURE, format!("{context}: {other}")),
    }
}

pub fn bridge_error(context: &str, err: BridgeError) -> CliError {
    match err {
        BridgeError::Transport(err) => transport_error(context, err),
        BridgeError::Frame(err) => frame_error(context, err),
        BridgeError::PortNotFound { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        BridgeError::SerialUnavailable(_) => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
        BridgeError::Device(_) => CliError::new(FAILURE, format!("{context}: {err}")),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use serialmidi_bridge::Direction;

    use super::*;

    #[test]
    fn port_not_found_is_a_usage_error() {
        let err = BridgeError::PortNotFound {
            direction: Direction::Input,
            wanted: "IAC Bus 1".to_string(),
            available: vec![],
        };
        let cli = bridge_error("bridge failed", err);
        assert_eq!(cli.code, USAGE);
        assert!(cli.message.starts_with("bridge failed: MIDI input port"));
    }

    #[test]
    fn serial_failures_map_to_transport_error() {
        let unavailable = BridgeError::SerialUnavailable(TransportError::Io(
            io::Error::from(io::ErrorKind::NotFound),
        ));
        assert_eq!(bridge_error("x", unavailable).code, TRANSPORT_ERROR);

        let closed = BridgeError::Frame(FrameError::ConnectionClosed);
        assert_eq!(bridge_error("x", closed).code, TRANSPORT_ERROR);
    }

    #[test]
    fn io_permission_denied_is_distinct() {
        let err = TransportError::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(transport_error("x", err).code, PERMISSION_DENIED);
    }

    #[test]
    fn worker_panic_is_internal() {
        let err = BridgeError::WorkerPanicked("midi-pump");
        assert_eq!(bridge_error("x", err).code, INTERNAL);
    }
}
