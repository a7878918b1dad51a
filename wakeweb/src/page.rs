// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use leptos::{
    ev::{Custom, scroll, visibilitychange},
    prelude::*,
    task::spawn_local,
};
use leptos_use::use_event_listener;
use wakelock::{Environment, LocalBoxFuture, Subscription, Visibility};
use web_sys::{Event, PageTransitionEvent, VisibilityState};

/// The current document and window.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserPage;

impl Environment for BrowserPage {
    fn visibility(&self) -> Visibility {
        if document().visibility_state() == VisibilityState::Visible {
            Visibility::Visible
        } else {
            Visibility::Hidden
        }
    }

    fn scroll_y(&self) -> f64 {
        window().scroll_y().unwrap_or_default()
    }

    fn on_visibility_change(&self, callback: Box<dyn Fn()>) -> Subscription {
        Subscription::new(use_event_listener(document(), visibilitychange, move |_| {
            callback()
        }))
    }

    fn on_scroll(&self, callback: Box<dyn Fn()>) -> Subscription {
        Subscription::new(use_event_listener(window(), scroll, move |_| callback()))
    }

    fn on_unload(&self, callback: Box<dyn Fn()>) -> Subscription {
        Subscription::new(use_event_listener(
            window(),
            Custom::new("pagehide"),
            move |_: Event| callback(),
        ))
    }

    fn on_restore(&self, callback: Box<dyn Fn()>) -> Subscription {
        Subscription::new(use_event_listener(
            window(),
            Custom::new("pageshow"),
            move |event: PageTransitionEvent| {
                // Only pages coming back from the back/forward cache were torn down.
                if event.persisted() {
                    callback();
                }
            },
        ))
    }

    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        spawn_local(future);
    }
}
