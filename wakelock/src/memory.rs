// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Deterministic in-memory implementations of the platform traits.
//!
//! Each type is a cheap handle onto shared state, so a clone can be kept to drive and inspect
//! the platform after the first handle has been handed to a [`Coordinator`](crate::Coordinator).

use crate::{
    counter::SessionStore,
    environment::{Environment, Visibility},
    error::FallbackError,
    fallback::MediaHost,
    native::{LockKind, NativeWakeLock, Sentinel},
    subscription::Subscription,
};
use futures::{
    channel::oneshot,
    executor::LocalSpawner,
    future::LocalBoxFuture,
    task::LocalSpawnExt,
};
use log::warn;
use std::{
    cell::{Cell, RefCell},
    collections::BTreeMap,
    fmt::{self, Debug, Formatter},
    rc::Rc,
};

/// A list of callbacks which can be fired without holding a borrow, so callbacks may subscribe
/// and unsubscribe freely.
#[derive(Clone, Default)]
struct Listeners {
    inner: Rc<RefCell<ListenerList>>,
}

#[derive(Default)]
struct ListenerList {
    next_id: u64,
    callbacks: Vec<(u64, Rc<dyn Fn()>)>,
}

impl Listeners {
    fn add(&self, callback: Box<dyn Fn()>) -> Subscription {
        let mut list = self.inner.borrow_mut();
        let id = list.next_id;
        list.next_id += 1;
        list.callbacks.push((id, Rc::from(callback)));

        let list = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(list) = list.upgrade() {
                list.borrow_mut()
                    .callbacks
                    .retain(|(callback_id, _)| *callback_id != id);
            }
        })
    }

    fn fire(&self) {
        let callbacks = self
            .inner
            .borrow()
            .callbacks
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect::<Vec<_>>();
        for callback in callbacks {
            callback();
        }
    }

    fn clear(&self) {
        self.inner.borrow_mut().callbacks.clear();
    }

    fn len(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }
}

impl Debug for Listeners {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("len", &self.len())
            .finish()
    }
}

/// A gate which can hold async operations until it is opened.
#[derive(Debug, Default)]
struct Gate {
    held: Cell<bool>,
    waiting: RefCell<Vec<oneshot::Sender<()>>>,
}

impl Gate {
    async fn pass(&self) {
        if !self.held.get() {
            return;
        }
        let (sender, receiver) = oneshot::channel();
        self.waiting.borrow_mut().push(sender);
        // A dropped sender also lets the operation through.
        _ = receiver.await;
    }

    fn open(&self) {
        for sender in self.waiting.take() {
            _ = sender.send(());
        }
    }

    fn waiting(&self) -> usize {
        self.waiting.borrow().len()
    }
}

/// An in-memory native wake lock.
#[derive(Clone, Debug, Default)]
pub struct MemoryWakeLock {
    state: Rc<LockPlatform>,
}

#[derive(Debug, Default)]
struct LockPlatform {
    unsupported: Cell<bool>,
    rejection: RefCell<Option<String>>,
    gate: Gate,
    grants: Cell<usize>,
    sentinels: RefCell<Vec<MemorySentinel>>,
}

impl MemoryWakeLock {
    pub fn set_supported(&self, supported: bool) {
        self.state.unsupported.set(!supported);
    }

    /// Rejects requests with the given message until called again with `None`.
    pub fn reject_with(&self, message: Option<&str>) {
        *self.state.rejection.borrow_mut() = message.map(ToOwned::to_owned);
    }

    /// Keeps requests pending until [`Self::grant_pending`] is called.
    pub fn hold_requests(&self, hold: bool) {
        self.state.gate.held.set(hold);
    }

    /// Lets all pending requests complete.
    pub fn grant_pending(&self) {
        self.state.gate.open();
    }

    pub fn pending_count(&self) -> usize {
        self.state.gate.waiting()
    }

    /// Returns how many locks have been granted in total.
    pub fn grant_count(&self) -> usize {
        self.state.grants.get()
    }

    /// Returns how many granted locks haven't been released yet.
    pub fn held_count(&self) -> usize {
        self.state
            .sentinels
            .borrow()
            .iter()
            .filter(|sentinel| !sentinel.released())
            .count()
    }

    /// Releases every held lock as the platform would, e.g. when the tab is hidden, and notifies
    /// their listeners.
    pub fn auto_release(&self) {
        for sentinel in self.state.sentinels.take() {
            sentinel.release_now();
        }
    }

    /// Releases every held lock but doesn't notify the listeners until
    /// [`Self::deliver_release_notices`].
    pub fn revoke_silently(&self) {
        for sentinel in self.state.sentinels.borrow().iter() {
            sentinel.state.released.set(true);
        }
    }

    /// Notifies the listeners of locks released by [`Self::revoke_silently`].
    pub fn deliver_release_notices(&self) {
        for sentinel in self.state.sentinels.take() {
            if sentinel.released() {
                sentinel.notify();
            } else {
                self.state.sentinels.borrow_mut().push(sentinel);
            }
        }
    }
}

impl NativeWakeLock for MemoryWakeLock {
    type Sentinel = MemorySentinel;

    fn is_supported(&self) -> bool {
        !self.state.unsupported.get()
    }

    async fn request(&self, _kind: LockKind) -> Result<MemorySentinel, String> {
        self.state.gate.pass().await;
        if let Some(message) = self.state.rejection.borrow().clone() {
            return Err(message);
        }
        self.state.grants.set(self.state.grants.get() + 1);
        let sentinel = MemorySentinel::default();
        self.state.sentinels.borrow_mut().push(sentinel.clone());
        Ok(sentinel)
    }
}

/// A lock granted by [`MemoryWakeLock`].
#[derive(Clone, Debug, Default)]
pub struct MemorySentinel {
    state: Rc<SentinelState>,
}

#[derive(Debug, Default)]
struct SentinelState {
    released: Cell<bool>,
    listeners: Listeners,
}

impl MemorySentinel {
    fn release_now(&self) {
        if !self.state.released.replace(true) {
            self.notify();
        }
    }

    fn notify(&self) {
        self.state.listeners.fire();
        self.state.listeners.clear();
    }
}

impl Sentinel for MemorySentinel {
    fn released(&self) -> bool {
        self.state.released.get()
    }

    fn on_release(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.state.listeners.add(callback)
    }

    async fn release(&self) -> Result<(), String> {
        self.release_now();
        Ok(())
    }
}

/// An in-memory document for the fallback backend.
#[derive(Clone, Debug, Default)]
pub struct MemoryMediaHost {
    state: Rc<MediaState>,
}

#[derive(Debug, Default)]
struct MediaState {
    unsupported: Cell<bool>,
    playback_failure: RefCell<Option<String>>,
    gate: Gate,
    created: Cell<usize>,
    attached: RefCell<Vec<MemoryVideo>>,
}

/// A video element attached by [`MemoryMediaHost`].
#[derive(Clone, Debug)]
pub struct MemoryVideo {
    state: Rc<VideoState>,
}

#[derive(Debug)]
struct VideoState {
    id: usize,
    source: RefCell<String>,
    playing: Cell<bool>,
}

impl MemoryMediaHost {
    pub fn set_supported(&self, supported: bool) {
        self.state.unsupported.set(!supported);
    }

    /// Rejects playback with the given message until [`Self::allow_playback`] is called.
    pub fn fail_playback(&self, message: &str) {
        *self.state.playback_failure.borrow_mut() = Some(message.to_owned());
    }

    pub fn allow_playback(&self) {
        self.state.playback_failure.take();
    }

    /// Keeps playback pending until [`Self::resolve_playback`] is called.
    pub fn hold_playback(&self, hold: bool) {
        self.state.gate.held.set(hold);
    }

    pub fn resolve_playback(&self) {
        self.state.gate.open();
    }

    /// Returns how many video elements are currently attached.
    pub fn attached_count(&self) -> usize {
        self.state.attached.borrow().len()
    }

    /// Returns how many video elements have ever been created.
    pub fn created_count(&self) -> usize {
        self.state.created.get()
    }

    /// Returns whether any attached video is playing.
    pub fn is_playing(&self) -> bool {
        self.state
            .attached
            .borrow()
            .iter()
            .any(|video| video.state.playing.get())
    }

    /// Returns the sources of the attached videos.
    pub fn sources(&self) -> Vec<String> {
        self.state
            .attached
            .borrow()
            .iter()
            .map(|video| video.state.source.borrow().clone())
            .collect()
    }
}

impl MediaHost for MemoryMediaHost {
    type Element = MemoryVideo;

    fn is_supported(&self) -> bool {
        !self.state.unsupported.get()
    }

    fn attach(&self, source: &str) -> Result<MemoryVideo, FallbackError> {
        let id = self.state.created.get();
        self.state.created.set(id + 1);
        let video = MemoryVideo {
            state: Rc::new(VideoState {
                id,
                source: RefCell::new(source.to_owned()),
                playing: Cell::new(false),
            }),
        };
        self.state.attached.borrow_mut().push(video.clone());
        Ok(video)
    }

    async fn play(&self, element: &MemoryVideo) -> Result<(), FallbackError> {
        self.state.gate.pass().await;
        if let Some(message) = self.state.playback_failure.borrow().clone() {
            return Err(FallbackError::Playback(message));
        }
        element.state.playing.set(true);
        Ok(())
    }

    fn pause(&self, element: &MemoryVideo) {
        element.state.playing.set(false);
    }

    fn clear_source(&self, element: &MemoryVideo) {
        element.state.source.borrow_mut().clear();
    }

    fn detach(&self, element: MemoryVideo) {
        self.state
            .attached
            .borrow_mut()
            .retain(|video| video.state.id != element.state.id);
    }
}

/// An in-memory page, running spawned work on a [`LocalSpawner`].
#[derive(Clone)]
pub struct MemoryEnvironment {
    state: Rc<PageState>,
    spawner: LocalSpawner,
}

#[derive(Debug, Default)]
struct PageState {
    visibility: Cell<Visibility>,
    scroll_y: Cell<f64>,
    visibility_listeners: Listeners,
    scroll_listeners: Listeners,
    unload_listeners: Listeners,
    restore_listeners: Listeners,
}

impl MemoryEnvironment {
    /// Creates a visible page scrolled to the top.
    pub fn new(spawner: LocalSpawner) -> Self {
        Self {
            state: Default::default(),
            spawner,
        }
    }

    /// Changes the visibility, notifying listeners if it actually changed.
    pub fn set_visibility(&self, visibility: Visibility) {
        if self.state.visibility.replace(visibility) != visibility {
            self.state.visibility_listeners.fire();
        }
    }

    pub fn scroll_to(&self, scroll_y: f64) {
        self.state.scroll_y.set(scroll_y);
        self.state.scroll_listeners.fire();
    }

    /// Tears down the page.
    pub fn unload(&self) {
        self.state.unload_listeners.fire();
    }

    /// Shows the page again after it was torn down.
    pub fn restore(&self) {
        self.state.restore_listeners.fire();
    }

    /// Returns the number of registered listeners of all kinds.
    pub fn listener_count(&self) -> usize {
        self.state.visibility_listeners.len()
            + self.state.scroll_listeners.len()
            + self.state.unload_listeners.len()
            + self.state.restore_listeners.len()
    }
}

impl Debug for MemoryEnvironment {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("MemoryEnvironment")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl Environment for MemoryEnvironment {
    fn visibility(&self) -> Visibility {
        self.state.visibility.get()
    }

    fn scroll_y(&self) -> f64 {
        self.state.scroll_y.get()
    }

    fn on_visibility_change(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.state.visibility_listeners.add(callback)
    }

    fn on_scroll(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.state.scroll_listeners.add(callback)
    }

    fn on_unload(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.state.unload_listeners.add(callback)
    }

    fn on_restore(&self, callback: Box<dyn Fn()>) -> Subscription {
        self.state.restore_listeners.add(callback)
    }

    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawner.spawn_local(future) {
            warn!("Failed to spawn task: {e}");
        }
    }
}

/// An in-memory session storage.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    items: Rc<RefCell<BTreeMap<String, String>>>,
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.items
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
