// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::{native::BrowserWakeLock, page::BrowserPage, video::VideoHost};
use leptos::{prelude::*, task::spawn_local};
use std::rc::Rc;
use wakelock::{Config, Coordinator, FallbackBackend, LockStatus};

type BrowserCoordinator = Coordinator<BrowserWakeLock, VideoHost, BrowserPage>;

/// Status of the wake lock, and a button to toggle it.
#[component]
pub fn WakeLockPanel(config: Config) -> impl IntoView {
    let fallback = Rc::new(FallbackBackend::new(VideoHost, config.media_source.clone()));
    let coordinator = Coordinator::new(BrowserWakeLock, fallback, BrowserPage, config);

    let (status, write_status) = signal(coordinator.status());
    coordinator.set_observer(move |new_status: &LockStatus| {
        // The signal may already be gone if this is the final teardown.
        _ = write_status.try_set(new_status.clone());
    });
    coordinator.mount();

    let coordinator = StoredValue::new_local(coordinator);
    on_cleanup(move || {
        coordinator.try_with_value(|coordinator| coordinator.teardown());
    });

    view! {
        <div id="wakelock">
        <p id="status" inner_html=move || status.read().message.clone()></p>
        <form>
        <input type="button"
            value=move || if status.read().is_active { "Let the screen sleep" } else { "Keep the screen awake" }
            disabled=move || status.read().pending
            on:click=move |_| toggle(coordinator)/>
        </form>
        </div>
    }
}

fn toggle(coordinator: StoredValue<Rc<BrowserCoordinator>, LocalStorage>) {
    let Some(coordinator) = coordinator.try_get_value() else {
        return;
    };
    spawn_local(async move { coordinator.toggle_lock().await });
}
