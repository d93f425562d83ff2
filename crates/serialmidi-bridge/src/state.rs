use std::sync::atomic::{AtomicU8, Ordering};

/// Bridge lifecycle.
///
/// `Initializing -> Ready -> Running -> Stopping -> Stopped`. A bridge that
/// fails during setup goes straight to `Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum BridgeState {
    /// Ports are being resolved and opened; no worker moves messages yet.
    Initializing = 0,
    /// Serial link and MIDI ports are open.
    Ready = 1,
    /// All three workers are running.
    Running = 2,
    /// A stop was requested; workers are winding down.
    Stopping = 3,
    /// Every worker has exited.
    Stopped = 4,
}

impl BridgeState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => BridgeState::Initializing,
            1 => BridgeState::Ready,
            2 => BridgeState::Running,
            3 => BridgeState::Stopping,
            _ => BridgeState::Stopped,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BridgeState::Initializing => "initializing",
            BridgeState::Ready => "ready",
            BridgeState::Running => "running",
            BridgeState::Stopping => "stopping",
            BridgeState::Stopped => "stopped",
        }
    }
}

impl std::fmt::Display for BridgeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shared, monotonically advancing lifecycle state.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(BridgeState::Initializing as u8))
    }

    pub(crate) fn get(&self) -> BridgeState {
        BridgeState::from_u8(self.0.load(Ordering::SeqCst))
    }

    /// Move forward to `next`. Never moves backwards, so a late `Running`
    /// cannot undo a concurrent `Stopping`.
    pub(crate) fn advance(&self, next: BridgeState) {
        self.0.fetch_max(next as u8, Ordering::SeqCst);
    }
}
