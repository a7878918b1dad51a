// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::{
    config::{Config, ReacquirePolicy},
    environment::{Environment, Visibility},
    error::WakeLockError,
    fallback::{FallbackBackend, MediaHost},
    native::{LockKind, NativeWakeLock, Sentinel},
    subscription::Subscription,
};
use futures::{FutureExt, future::LocalBoxFuture};
use log::{debug, info, warn};
use serde::Serialize;
use std::{
    cell::RefCell,
    mem,
    rc::{Rc, Weak},
};

/// The mechanism currently holding the wake lock.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    None,
    Native,
    Fallback,
}

/// A snapshot of the coordinator's state, for presentation.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct LockStatus {
    pub is_active: bool,
    pub backend: Backend,
    /// Whether an acquisition is in flight.
    pub pending: bool,
    /// Status text, which may contain simple markup.
    pub message: String,
}

enum Engagement<S> {
    None,
    Native {
        sentinel: S,
        generation: u64,
        release: Subscription,
    },
    Fallback,
}

impl<S> Default for Engagement<S> {
    fn default() -> Self {
        Self::None
    }
}

impl<S> Engagement<S> {
    fn backend(&self) -> Backend {
        match self {
            Self::None => Backend::None,
            Self::Native { .. } => Backend::Native,
            Self::Fallback => Backend::Fallback,
        }
    }
}

enum Acquired<S> {
    Native(S),
    Fallback,
}

enum Start {
    Begun,
    /// A cancelled acquisition still in flight was wanted again.
    Resumed,
    Ignored,
}

#[derive(Debug, Default)]
struct Acquisition {
    cancelled: bool,
}

struct LockState<S> {
    engagement: Engagement<S>,
    message: String,
    acquisition: Option<Acquisition>,
    /// Whether the lock is wanted, even if the platform has taken it away.
    desired: bool,
    /// Identifies the current native lock, so notifications from older ones can be ignored.
    generation: u64,
    torn_down: bool,
    subscriptions: Vec<Subscription>,
    /// Outlives teardown, so the coordinator can start over if the page comes back.
    restore: Option<Subscription>,
}

/// Decides when to hold the wake lock, and with which backend.
///
/// All state changes go through the coordinator, which is the only owner of the lock state.
/// At most one backend is ever engaged.
pub struct Coordinator<N: NativeWakeLock, H: MediaHost, E: Environment> {
    native: N,
    fallback: Rc<FallbackBackend<H>>,
    environment: E,
    config: Config,
    state: RefCell<LockState<N::Sentinel>>,
    observer: RefCell<Option<Box<dyn Fn(&LockStatus)>>>,
}

impl<N, H, E> Coordinator<N, H, E>
where
    N: NativeWakeLock + 'static,
    H: MediaHost + 'static,
    E: Environment + 'static,
{
    /// Creates an inactive coordinator. Call [`Self::mount`] to start reacting to the page.
    pub fn new(
        native: N,
        fallback: Rc<FallbackBackend<H>>,
        environment: E,
        config: Config,
    ) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(LockState {
                engagement: Engagement::None,
                message: config.messages.inactive.clone(),
                acquisition: None,
                desired: false,
                generation: 0,
                torn_down: false,
                subscriptions: Vec::new(),
                restore: None,
            }),
            native,
            fallback,
            environment,
            config,
            observer: RefCell::new(None),
        })
    }

    pub fn fallback(&self) -> &FallbackBackend<H> {
        &self.fallback
    }

    pub fn status(&self) -> LockStatus {
        let state = self.state.borrow();
        LockStatus {
            is_active: state.engagement.backend() != Backend::None,
            backend: state.engagement.backend(),
            pending: state
                .acquisition
                .as_ref()
                .is_some_and(|acquisition| !acquisition.cancelled),
            message: state.message.clone(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.borrow().engagement.backend() != Backend::None
    }

    /// Sets the callback to receive the status after every change.
    pub fn set_observer(&self, observer: impl Fn(&LockStatus) + 'static) {
        self.observer.replace(Some(Box::new(observer)));
    }

    fn notify(&self) {
        let status = self.status();
        if let Some(observer) = &*self.observer.borrow() {
            observer(&status);
        }
    }

    /// Subscribes to visibility changes, scrolling, page teardown and restoration.
    pub fn mount(self: &Rc<Self>) {
        {
            let state = self.state.borrow();
            if state.torn_down || state.restore.is_some() {
                return;
            }
        }

        self.subscribe();
        let this = Rc::downgrade(self);
        let restore = self.environment.on_restore(Box::new(move || {
            if let Some(this) = this.upgrade() {
                this.restore();
            }
        }));
        self.state.borrow_mut().restore = Some(restore);
    }

    fn subscribe(self: &Rc<Self>) {
        let visibility = self.environment.on_visibility_change(
            self.reaction(|this| async move { this.on_visibility_change().await }.boxed_local()),
        );
        let scroll = self
            .environment
            .on_scroll(self.reaction(|this| async move { this.on_scroll().await }.boxed_local()));
        let this = Rc::downgrade(self);
        let unload = self.environment.on_unload(Box::new(move || {
            if let Some(this) = this.upgrade() {
                this.teardown();
            }
        }));

        self.state
            .borrow_mut()
            .subscriptions
            .extend([visibility, scroll, unload]);
    }

    /// Starts over, inactive, if the page is shown again after teardown.
    fn restore(self: &Rc<Self>) {
        {
            let mut state = self.state.borrow_mut();
            if !state.torn_down {
                return;
            }
            state.torn_down = false;
            state.message = self.config.messages.inactive.clone();
        }
        self.subscribe();
        info!("Wake lock coordinator restored.");
        self.notify();
    }

    /// Returns a callback which spawns the given reaction, as long as the coordinator is alive.
    fn reaction(
        self: &Rc<Self>,
        react: impl Fn(Rc<Self>) -> LocalBoxFuture<'static, ()> + 'static,
    ) -> Box<dyn Fn()> {
        let this: Weak<Self> = Rc::downgrade(self);
        Box::new(move || {
            if let Some(this) = this.upgrade() {
                this.environment.spawn(react(this.clone()));
            }
        })
    }

    /// Toggles the lock. This is the only operation meant to be triggered by the user.
    pub async fn toggle_lock(self: &Rc<Self>) {
        if self.is_active() {
            self.release_lock(Some(self.config.messages.manual.as_str()))
                .await;
        } else {
            self.request_lock().await;
        }
    }

    /// Acquires the lock, with the native wake lock if supported, otherwise with the fallback.
    ///
    /// Failures are reported through the status. Does nothing if the lock is already held or
    /// being acquired.
    pub async fn request_lock(self: &Rc<Self>) {
        match self.start_acquisition() {
            Start::Ignored => return,
            Start::Resumed => {
                self.notify();
                return;
            }
            Start::Begun => self.notify(),
        }
        let acquired = self.acquire().await;
        self.finish_acquisition(acquired).await;
    }

    fn start_acquisition(&self) -> Start {
        let state = &mut *self.state.borrow_mut();
        if state.torn_down {
            debug!("Ignoring wake lock request after teardown.");
            return Start::Ignored;
        }
        if let Some(acquisition) = &mut state.acquisition {
            if acquisition.cancelled {
                debug!("Resuming cancelled wake lock request.");
                acquisition.cancelled = false;
                state.desired = true;
                return Start::Resumed;
            }
            debug!("Wake lock request already in flight.");
            return Start::Ignored;
        }

        // The platform may have released the native lock without the notification having
        // arrived yet.
        let stale = matches!(
            &state.engagement,
            Engagement::Native { sentinel, .. } if sentinel.released()
        );
        if stale {
            debug!("Discarding native wake lock already released by the platform.");
            state.engagement = Engagement::None;
        } else if state.engagement.backend() != Backend::None {
            debug!("Wake lock already active.");
            return Start::Ignored;
        }

        state.acquisition = Some(Acquisition::default());
        state.desired = true;
        Start::Begun
    }

    async fn acquire(&self) -> Result<Acquired<N::Sentinel>, WakeLockError> {
        if self.native.is_supported() {
            let sentinel = self.native.request(LockKind::Screen).await.map_err(|message| {
                WakeLockError::AcquisitionFailed {
                    backend: Backend::Native,
                    message,
                }
            })?;
            Ok(Acquired::Native(sentinel))
        } else if self.fallback.is_supported() {
            self.fallback.enable().await?;
            Ok(Acquired::Fallback)
        } else {
            Err(WakeLockError::CapabilityUnavailable)
        }
    }

    async fn finish_acquisition(
        self: &Rc<Self>,
        acquired: Result<Acquired<N::Sentinel>, WakeLockError>,
    ) {
        let cancelled = {
            let mut state = self.state.borrow_mut();
            let acquisition = state.acquisition.take();
            state.torn_down || acquisition.is_some_and(|acquisition| acquisition.cancelled)
        };

        if cancelled {
            match acquired {
                Ok(Acquired::Native(sentinel)) => {
                    info!("Releasing native wake lock granted after it was cancelled.");
                    if let Err(e) = sentinel.release().await {
                        warn!("Failed to release native wake lock: {e}");
                    }
                }
                Ok(Acquired::Fallback) => {
                    info!("Disabling fallback enabled after it was cancelled.");
                    self.fallback.disable();
                }
                Err(e) => debug!("Cancelled wake lock request failed anyway: {e}"),
            }
            self.notify();
            return;
        }

        match acquired {
            Ok(Acquired::Native(sentinel)) => {
                let generation = {
                    let mut state = self.state.borrow_mut();
                    state.generation += 1;
                    state.generation
                };
                let this = Rc::downgrade(self);
                let release = sentinel.on_release(Box::new(move || {
                    if let Some(this) = this.upgrade() {
                        this.native_released(generation);
                    }
                }));
                let mut state = self.state.borrow_mut();
                state.engagement = Engagement::Native {
                    sentinel,
                    generation,
                    release,
                };
                state.message = self.config.messages.native_activated.clone();
                info!("Wake Lock activated (native).");
            }
            Ok(Acquired::Fallback) => {
                let mut state = self.state.borrow_mut();
                state.engagement = Engagement::Fallback;
                state.message = self.config.messages.fallback_activated.clone();
                info!("Wake Lock activated (fallback).");
            }
            Err(e) => {
                warn!("Failed to activate wake lock: {e}");
                let mut state = self.state.borrow_mut();
                state.desired = false;
                state.message = self.config.messages.failed(&e);
            }
        }
        self.notify();

        // The page may have been scrolled while the request was in flight.
        self.on_scroll().await;
    }

    /// Releases whichever backend holds the lock, and reports the given reason.
    ///
    /// Safe to call at any time: the state is inactive as soon as this starts, so overlapping
    /// calls never release the same backend twice. An acquisition in flight is cancelled.
    pub async fn release_lock(&self, reason: Option<&str>) {
        let engagement = {
            let mut state = self.state.borrow_mut();
            if let Some(acquisition) = &mut state.acquisition {
                acquisition.cancelled = true;
            }
            state.desired = false;
            state.message = self.config.messages.deactivated(reason);
            mem::take(&mut state.engagement)
        };
        self.notify();

        match engagement {
            Engagement::None => {}
            Engagement::Native {
                sentinel, release, ..
            } => {
                // An explicit release mustn't be reported as a platform release.
                release.cancel();
                match sentinel.release().await {
                    Ok(()) => info!("Wake Lock deactivated (native)."),
                    Err(e) => warn!("Failed to release native wake lock: {e}"),
                }
            }
            Engagement::Fallback => {
                self.fallback.disable();
                info!("Wake Lock deactivated (fallback).");
            }
        }
    }

    /// Reacts to the page becoming visible or hidden.
    pub async fn on_visibility_change(self: &Rc<Self>) {
        if self.environment.visibility() != Visibility::Visible {
            return;
        }
        let reacquire = {
            let state = self.state.borrow();
            state.engagement.backend() != Backend::None
                || (self.config.reacquire == ReacquirePolicy::RememberIntent && state.desired)
        };
        if reacquire {
            self.request_lock().await;
        }
    }

    /// Releases the lock if the page is scrolled away from the very top.
    pub async fn on_scroll(&self) {
        if self.is_active() && self.environment.scroll_y() > 0.0 {
            self.release_lock(Some(self.config.messages.scroll_to_top.as_str()))
                .await;
        }
    }

    fn native_released(&self, generation: u64) {
        let reason = self.auto_release_reason();
        let engagement = {
            let mut state = self.state.borrow_mut();
            if !matches!(
                state.engagement,
                Engagement::Native { generation: current, .. } if current == generation
            ) {
                debug!("Ignoring release of an old native wake lock.");
                return;
            }
            state.message = self.config.messages.deactivated(Some(reason));
            mem::take(&mut state.engagement)
        };
        drop(engagement);
        info!("Wake Lock auto-deactivated: {reason}");
        self.notify();
    }

    /// Explains a platform release, based on the page as it is now.
    fn auto_release_reason(&self) -> &str {
        let messages = &self.config.messages;
        if self.environment.visibility() != Visibility::Visible {
            &messages.foreground_only
        } else if self.environment.scroll_y() > 0.0 {
            &messages.scroll_to_top
        } else {
            &messages.system_release
        }
    }

    /// Releases everything and unsubscribes from the page, whatever the tracked state.
    ///
    /// Doesn't wait for the native lock to be released. The coordinator ignores all requests
    /// afterwards.
    pub fn teardown(&self) {
        let (engagement, subscriptions) = {
            let mut state = self.state.borrow_mut();
            state.torn_down = true;
            if let Some(acquisition) = &mut state.acquisition {
                acquisition.cancelled = true;
            }
            state.desired = false;
            state.message = self.config.messages.deactivated(None);
            (
                mem::take(&mut state.engagement),
                mem::take(&mut state.subscriptions),
            )
        };
        drop(subscriptions);

        if let Engagement::Native {
            sentinel, release, ..
        } = engagement
        {
            release.cancel();
            self.environment.spawn(
                async move {
                    if let Err(e) = sentinel.release().await {
                        warn!("Failed to release native wake lock during teardown: {e}");
                    }
                }
                .boxed_local(),
            );
        }
        self.fallback.disable();
        info!("Wake lock coordinator torn down.");
        self.notify();
    }
}
