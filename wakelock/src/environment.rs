// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::subscription::Subscription;
use futures::future::LocalBoxFuture;

/// Visibility of the page.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Visibility {
    #[default]
    Visible,
    Hidden,
}

/// The page the coordinator is running in, and the executor it runs on.
pub trait Environment {
    fn visibility(&self) -> Visibility;

    /// Returns the vertical scroll offset of the viewport.
    fn scroll_y(&self) -> f64;

    fn on_visibility_change(&self, callback: Box<dyn Fn()>) -> Subscription;

    fn on_scroll(&self, callback: Box<dyn Fn()>) -> Subscription;

    /// Registers a callback for when the page is being torn down.
    fn on_unload(&self, callback: Box<dyn Fn()>) -> Subscription;

    /// Registers a callback for when a torn down page is shown again, such as from the
    /// back/forward cache.
    fn on_restore(&self, callback: Box<dyn Fn()>) -> Subscription;

    /// Runs the given future to completion on the local executor.
    fn spawn(&self, future: LocalBoxFuture<'static, ()>);
}
