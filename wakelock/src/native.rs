// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! The platform's own wake lock, which the coordinator only calls through.

use crate::subscription::Subscription;

/// The category of wake lock to request.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LockKind {
    /// Keeps the screen on.
    #[default]
    Screen,
}

/// A platform wake lock capability.
#[allow(async_fn_in_trait)]
pub trait NativeWakeLock {
    type Sentinel: Sentinel + 'static;

    /// Returns whether the platform offers a wake lock at all.
    fn is_supported(&self) -> bool;

    /// Requests a wake lock of the given kind, returning the error text if it is rejected.
    async fn request(&self, kind: LockKind) -> Result<Self::Sentinel, String>;
}

/// A granted native wake lock.
#[allow(async_fn_in_trait)]
pub trait Sentinel {
    /// Returns whether the lock has already been released, by the platform or explicitly.
    fn released(&self) -> bool;

    /// Registers a callback for when the platform releases the lock.
    ///
    /// The callback fires at most once. It stops being called once the returned subscription
    /// is dropped.
    fn on_release(&self, callback: Box<dyn Fn()>) -> Subscription;

    /// Releases the lock.
    async fn release(&self) -> Result<(), String>;
}
