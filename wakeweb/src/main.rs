// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use leptos::prelude::*;
use log::{LevelFilter, debug};
use wakelock::LoadCounter;
use wakeweb::{
    config::load_config, logger, panel::WakeLockPanel, storage::BrowserSessionStore,
};

fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(LevelFilter::Info);

    leptos::mount::mount_to_body(App);
}

#[component]
fn App() -> impl IntoView {
    let config = load_config();

    let loads = LoadCounter::new(BrowserSessionStore::new(), config.counter_key.clone()).increment();
    debug!("Load {loads} of this session.");

    view! {
        <h1>"Keep awake"</h1>
        <WakeLockPanel config/>
    }
}
