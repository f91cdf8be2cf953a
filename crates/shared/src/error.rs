use thiserror::Error;

use crate::domain::{DeviceId, GameMode, Screen};

/// Coarse grouping used by the console to decide how to surface an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    RoutingMismatch,
    MissingPrecondition,
    InvalidInput,
}

/// Operator-facing failures. None of them is fatal; the action is aborted and nothing is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("no active terminal bound; cannot {action}")]
    MissingActiveDevice { action: &'static str },
    #[error("{action} is not available on screen {screen}")]
    WrongScreen {
        action: &'static str,
        screen: Screen,
    },
    #[error("no game mode selected")]
    NoGameMode,
    #[error("{action} does not apply to the selected mode {selected:?}")]
    WrongMode {
        action: &'static str,
        selected: GameMode,
    },
    #[error("{action} is not available yet")]
    NotAvailable { action: &'static str },
    #[error("unknown terminal {0}")]
    UnknownDevice(DeviceId),
    #[error("terminal {device_id} is not ready for configuration (mode: {mode})")]
    DeviceNotReady { device_id: DeviceId, mode: String },
    #[error("start is locked until the terminal confirms its settings")]
    StartLocked,
    #[error("event from {received} ignored; active terminal is {active}")]
    Misrouted { received: DeviceId, active: DeviceId },
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: String,
    },
}

impl ControlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ControlError::Misrouted { .. } => ErrorCategory::RoutingMismatch,
            ControlError::MissingActiveDevice { .. }
            | ControlError::WrongScreen { .. }
            | ControlError::NoGameMode
            | ControlError::WrongMode { .. }
            | ControlError::NotAvailable { .. }
            | ControlError::StartLocked => ErrorCategory::MissingPrecondition,
            ControlError::UnknownDevice(_)
            | ControlError::DeviceNotReady { .. }
            | ControlError::InvalidInput { .. } => ErrorCategory::InvalidInput,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("message is not a JSON object")]
    NotAnObject,
    #[error("missing field {0}")]
    MissingField(&'static str),
    #[error("invalid json: {0}")]
    InvalidJson(String),
}
