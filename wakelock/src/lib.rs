// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Keeps a device display awake while a page is the visible, scrolled-to-top foreground tab.
//!
//! The [`Coordinator`] owns the lock state and decides which backend to use: the platform's
//! native screen wake lock ([`NativeWakeLock`]) when it is supported, otherwise a
//! [`FallbackBackend`] which loops a silent hidden video. Everything the coordinator needs
//! from the platform is expressed as a trait, so the state machine runs the same way in a
//! browser and against the deterministic backends in [`memory`]:
//!
//! ```
//! use futures::executor::LocalPool;
//! use std::rc::Rc;
//! use wakelock::{
//!     Backend, Config, Coordinator, FallbackBackend,
//!     memory::{MemoryEnvironment, MemoryMediaHost, MemoryWakeLock},
//! };
//!
//! let mut pool = LocalPool::new();
//! let coordinator = Coordinator::new(
//!     MemoryWakeLock::default(),
//!     Rc::new(FallbackBackend::new(MemoryMediaHost::default(), Config::default().media_source)),
//!     MemoryEnvironment::new(pool.spawner()),
//!     Config::default(),
//! );
//! pool.run_until(coordinator.toggle_lock());
//! assert_eq!(coordinator.status().backend, Backend::Native);
//! ```

pub mod config;
mod coordinator;
mod counter;
mod environment;
mod error;
mod fallback;
pub mod memory;
mod native;
mod subscription;

pub use futures::future::LocalBoxFuture;

pub use crate::{
    config::{Config, Messages, ReacquirePolicy},
    coordinator::{Backend, Coordinator, LockStatus},
    counter::{LoadCounter, SessionStore},
    environment::{Environment, Visibility},
    error::{FallbackError, WakeLockError},
    fallback::{FallbackBackend, MediaHost},
    native::{LockKind, NativeWakeLock, Sentinel},
    subscription::Subscription,
};
