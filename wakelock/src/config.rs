// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Configuration for the coordinator, with defaults for everything.

use crate::{coordinator::Backend, error::WakeLockError};
use serde::{Deserialize, Serialize};

/// A tiny blank MP4, looped by the fallback backend.
pub const BLANK_VIDEO: &str = "data:video/mp4;base64,AAAAHGZ0eXBtcDQyAAAAAG1wNDFpc28yAAAAAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAAACAA==";

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Config {
    pub reacquire: ReacquirePolicy,
    pub messages: Messages,
    /// Source of the video looped by the fallback backend.
    pub media_source: String,
    /// Session storage key of the load counter.
    pub counter_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reacquire: Default::default(),
            messages: Default::default(),
            media_source: BLANK_VIDEO.to_string(),
            counter_key: "redirectCount".to_string(),
        }
    }
}

/// When to request the wake lock again after the page becomes visible.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReacquirePolicy {
    /// Only if the lock is still marked active.
    #[default]
    WhileActive,
    /// Also if the lock was wanted but the platform released it while the page was away.
    RememberIntent,
}

/// Status texts shown to the user. They may contain simple markup.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Messages {
    pub inactive: String,
    pub native_activated: String,
    pub fallback_activated: String,
    pub unsupported: String,
    /// Prefix for the reason the native wake lock was refused.
    pub native_failed: String,
    /// Prefix for the reason the fallback couldn't be started.
    pub fallback_failed: String,
    /// Follows `fallback_failed` when the fallback can't run here at all.
    pub unsupported_environment: String,
    /// Shown after a release which didn't give a reason.
    pub deactivated: String,
    /// Prefix for releases which did give a reason.
    pub deactivated_because: String,
    pub manual: String,
    pub scroll_to_top: String,
    pub foreground_only: String,
    pub system_release: String,
}

impl Default for Messages {
    fn default() -> Self {
        const KEEP_AWAKE: &str = "<br><br>Your device will remain awake as long as this tab is in the foreground and scrolled to the top.";
        Self {
            inactive: "Wake Lock is inactive.".to_string(),
            native_activated: format!("Wake Lock Activated: {KEEP_AWAKE}"),
            fallback_activated: format!("Fallback Activated: {KEEP_AWAKE}"),
            unsupported: "Wake Lock is not available on this device.".to_string(),
            native_failed: "Failed to obtain native Wake Lock:".to_string(),
            fallback_failed: "Failed to activate fallback:".to_string(),
            unsupported_environment: "unsupported environment:".to_string(),
            deactivated: "Wake Lock is deactivated.".to_string(),
            deactivated_because: "Wake Lock Deactivated:".to_string(),
            manual: "You manually deactivated the wake lock.".to_string(),
            scroll_to_top: "Please scroll to the top of the page to keep your device awake."
                .to_string(),
            foreground_only:
                "This site can only keep your device awake if it’s in a foreground tab."
                    .to_string(),
            system_release: "The system released the wake lock.".to_string(),
        }
    }
}

impl Messages {
    /// Returns the status text for a release with the given reason, if any.
    pub fn deactivated(&self, reason: Option<&str>) -> String {
        match reason {
            Some(reason) if !reason.is_empty() => {
                format!("{} {reason}", self.deactivated_because)
            }
            _ => self.deactivated.clone(),
        }
    }

    /// Returns the status text for a failed acquisition.
    pub fn failed(&self, error: &WakeLockError) -> String {
        match error {
            WakeLockError::CapabilityUnavailable => self.unsupported.clone(),
            WakeLockError::AcquisitionFailed {
                backend: Backend::Native,
                message,
            } => format!("{} {message}", self.native_failed),
            WakeLockError::AcquisitionFailed { message, .. } => {
                format!("{} {message}", self.fallback_failed)
            }
            WakeLockError::Unsupported(message) => format!(
                "{} {} {message}",
                self.fallback_failed, self.unsupported_environment
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deactivated_with_and_without_reason() {
        let messages = Messages::default();
        assert_eq!(messages.deactivated(None), "Wake Lock is deactivated.");
        assert_eq!(messages.deactivated(Some("")), "Wake Lock is deactivated.");
        assert_eq!(
            messages.deactivated(Some(&messages.manual)),
            "Wake Lock Deactivated: You manually deactivated the wake lock."
        );
    }

    #[test]
    fn partial_json() {
        let config: Config = serde_json::from_str(
            r#"{
                "reacquire": "remember-intent",
                "messages": {
                    "manual": "Off.",
                    "native_failed": "Kein Wake Lock:",
                    "fallback_failed": "Kein Video:",
                    "unsupported_environment": "nicht hier:"
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.reacquire, ReacquirePolicy::RememberIntent);
        assert_eq!(config.messages.manual, "Off.");
        assert_eq!(config.messages.native_failed, "Kein Wake Lock:");
        assert_eq!(config.messages.fallback_failed, "Kein Video:");
        assert_eq!(config.messages.unsupported_environment, "nicht hier:");
        assert_eq!(config.messages.inactive, "Wake Lock is inactive.");
        assert_eq!(config.counter_key, "redirectCount");
        assert_eq!(config.media_source, BLANK_VIDEO);
    }

    #[test]
    fn failures() {
        let messages = Messages::default();
        assert_eq!(
            messages.failed(&WakeLockError::CapabilityUnavailable),
            "Wake Lock is not available on this device."
        );
        let native = WakeLockError::AcquisitionFailed {
            backend: Backend::Native,
            message: "NotAllowedError".to_string(),
        };
        assert_eq!(messages.failed(&native), native.to_string());
        let unsupported = WakeLockError::Unsupported("no document body".to_string());
        assert_eq!(messages.failed(&unsupported), unsupported.to_string());

        let messages = Messages {
            fallback_failed: "Kein Video:".to_string(),
            ..Default::default()
        };
        assert_eq!(
            messages.failed(&WakeLockError::AcquisitionFailed {
                backend: Backend::Fallback,
                message: "Playback failed: denied".to_string(),
            }),
            "Kein Video: Playback failed: denied"
        );
    }

    #[test]
    fn empty_json() {
        assert_eq!(serde_json::from_str::<Config>("{}").unwrap(), Config::default());
    }
}
