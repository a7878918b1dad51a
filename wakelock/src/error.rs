// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::coordinator::Backend;
use thiserror::Error;

/// An error acquiring the wake lock.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum WakeLockError {
    /// Neither the native wake lock nor the fallback can be used.
    #[error("Wake Lock is not available on this device.")]
    CapabilityUnavailable,
    /// The native request or the fallback playback was rejected.
    #[error("{}", acquisition_failure(.backend, .message))]
    AcquisitionFailed { backend: Backend, message: String },
    /// The fallback was asked to run somewhere it can't.
    #[error("Failed to activate fallback: unsupported environment: {0}")]
    Unsupported(String),
}

fn acquisition_failure(backend: &Backend, message: &str) -> String {
    match backend {
        Backend::Native => format!("Failed to obtain native Wake Lock: {message}"),
        Backend::Fallback | Backend::None => format!("Failed to activate fallback: {message}"),
    }
}

/// An error enabling the fallback backend.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FallbackError {
    #[error("unsupported environment: {0}")]
    Unsupported(String),
    #[error("Playback failed: {0}")]
    Playback(String),
}

impl From<FallbackError> for WakeLockError {
    fn from(e: FallbackError) -> Self {
        match e {
            FallbackError::Unsupported(message) => Self::Unsupported(message),
            playback @ FallbackError::Playback(_) => Self::AcquisitionFailed {
                backend: Backend::Fallback,
                message: playback.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            WakeLockError::AcquisitionFailed {
                backend: Backend::Native,
                message: "NotAllowedError".to_string(),
            }
            .to_string(),
            "Failed to obtain native Wake Lock: NotAllowedError"
        );
        assert_eq!(
            WakeLockError::from(FallbackError::Playback("denied".to_string())).to_string(),
            "Failed to activate fallback: Playback failed: denied"
        );
        assert_eq!(
            WakeLockError::from(FallbackError::Unsupported("no document body".to_string())),
            WakeLockError::Unsupported("no document body".to_string())
        );
    }
}
