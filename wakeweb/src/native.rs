// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! The Screen Wake Lock API.

use crate::error_message;
use leptos::{ev::Custom, prelude::*};
use leptos_use::use_event_listener;
use wakelock::{LockKind, NativeWakeLock, Sentinel, Subscription};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, WakeLockSentinel, WakeLockType, js_sys::Reflect};

/// `navigator.wakeLock`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserWakeLock;

impl NativeWakeLock for BrowserWakeLock {
    type Sentinel = BrowserSentinel;

    fn is_supported(&self) -> bool {
        Reflect::has(&window().navigator(), &JsValue::from_str("wakeLock")).unwrap_or_default()
    }

    async fn request(&self, kind: LockKind) -> Result<BrowserSentinel, String> {
        let sentinel = request(kind).await.map_err(|e| error_message(&e))?;
        Ok(BrowserSentinel { sentinel })
    }
}

async fn request(kind: LockKind) -> Result<WakeLockSentinel, JsValue> {
    let kind = match kind {
        LockKind::Screen => WakeLockType::Screen,
    };
    Ok(
        JsFuture::from(window().navigator().wake_lock().request(kind))
            .await?
            .unchecked_into::<WakeLockSentinel>(),
    )
}

/// A granted screen wake lock.
#[derive(Clone, Debug)]
pub struct BrowserSentinel {
    sentinel: WakeLockSentinel,
}

impl Sentinel for BrowserSentinel {
    fn released(&self) -> bool {
        self.sentinel.released()
    }

    fn on_release(&self, callback: Box<dyn Fn()>) -> Subscription {
        let remove = use_event_listener(
            self.sentinel.clone(),
            Custom::new("release"),
            move |_: Event| callback(),
        );
        Subscription::new(remove)
    }

    async fn release(&self) -> Result<(), String> {
        JsFuture::from(self.sentinel.release())
            .await
            .map_err(|e| error_message(&e))?;
        Ok(())
    }
}
