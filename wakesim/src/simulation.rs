// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::script::Event;
use futures::{FutureExt, executor::LocalPool};
use std::{cell::RefCell, rc::Rc};
use wakelock::{
    Config, Coordinator, Environment, FallbackBackend, LockStatus, Visibility,
    memory::{MemoryEnvironment, MemoryMediaHost, MemoryWakeLock},
};

/// A coordinator running against in-memory backends.
pub struct Simulation {
    pool: LocalPool,
    native: MemoryWakeLock,
    media: MemoryMediaHost,
    environment: MemoryEnvironment,
    coordinator: Rc<Coordinator<MemoryWakeLock, MemoryMediaHost, MemoryEnvironment>>,
    changes: Rc<RefCell<Vec<LockStatus>>>,
}

impl Simulation {
    /// Creates a mounted coordinator on a visible page scrolled to the top.
    pub fn new(config: Config, native_supported: bool, fallback_supported: bool) -> Self {
        let pool = LocalPool::new();
        let native = MemoryWakeLock::default();
        native.set_supported(native_supported);
        let media = MemoryMediaHost::default();
        media.set_supported(fallback_supported);
        let environment = MemoryEnvironment::new(pool.spawner());
        let fallback = Rc::new(FallbackBackend::new(
            media.clone(),
            config.media_source.clone(),
        ));
        let coordinator = Coordinator::new(native.clone(), fallback, environment.clone(), config);
        let changes = Rc::new(RefCell::new(Vec::new()));
        let observed = changes.clone();
        coordinator.set_observer(move |status: &LockStatus| {
            observed.borrow_mut().push(status.clone());
        });
        coordinator.mount();
        Self {
            pool,
            native,
            media,
            environment,
            coordinator,
            changes,
        }
    }

    pub fn status(&self) -> LockStatus {
        self.coordinator.status()
    }

    /// Returns the number of native locks and fallback videos currently held.
    #[cfg(test)]
    pub fn held(&self) -> (usize, usize) {
        (self.native.held_count(), self.media.attached_count())
    }

    /// Applies the event and runs everything it triggered until nothing more can progress.
    ///
    /// Returns every status the coordinator went through meanwhile.
    pub fn apply(&mut self, event: &Event) -> Vec<LockStatus> {
        let coordinator = self.coordinator.clone();
        match event {
            // Spawned rather than awaited, as they may stay pending until a later event.
            Event::Toggle => self
                .environment
                .spawn(async move { coordinator.toggle_lock().await }.boxed_local()),
            Event::Request => self
                .environment
                .spawn(async move { coordinator.request_lock().await }.boxed_local()),
            Event::Release(reason) => {
                let reason = reason.clone();
                self.environment.spawn(
                    async move { coordinator.release_lock(reason.as_deref()).await }
                        .boxed_local(),
                )
            }
            Event::Hide => self.environment.set_visibility(Visibility::Hidden),
            Event::Show => self.environment.set_visibility(Visibility::Visible),
            Event::Scroll(scroll_y) => self.environment.scroll_to(*scroll_y),
            Event::AutoRelease => self.native.auto_release(),
            Event::Reject(message) => self.native.reject_with(message.as_deref()),
            Event::FailPlayback(Some(message)) => self.media.fail_playback(message),
            Event::FailPlayback(None) => self.media.allow_playback(),
            Event::Hold => self.native.hold_requests(true),
            Event::Grant => {
                self.native.hold_requests(false);
                self.native.grant_pending();
            }
            Event::Unload => self.environment.unload(),
            Event::Restore => self.environment.restore(),
        }
        self.pool.run_until_stalled();
        self.changes.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;
    use wakelock::Backend;

    fn run(script: &str, native_supported: bool, fallback_supported: bool) -> Simulation {
        let mut simulation = Simulation::new(Config::default(), native_supported, fallback_supported);
        for (_, event) in parse_script(script).unwrap() {
            simulation.apply(&event);
        }
        simulation
    }

    #[test]
    fn hidden_tab() {
        let simulation = run("toggle\nhide\nauto-release\nshow\n", true, true);
        let status = simulation.status();
        assert!(!status.is_active);
        assert!(status.message.contains("foreground tab"));
        assert_eq!(simulation.held(), (0, 0));
    }

    #[test]
    fn fallback_scroll() {
        let simulation = run("toggle\nscroll 5\n", false, true);
        assert!(simulation.status().message.contains("scroll to the top"));
        assert_eq!(simulation.held(), (0, 0));
    }

    #[test]
    fn pending_request_then_unload() {
        let mut simulation = run("hold\ntoggle\n", true, true);
        assert!(simulation.status().pending);
        simulation.apply(&Event::Unload);
        simulation.apply(&Event::Grant);
        assert_eq!(simulation.status().backend, Backend::None);
        assert_eq!(simulation.held(), (0, 0));
    }

    #[test]
    fn reports_every_change() {
        let mut simulation = Simulation::new(Config::default(), true, true);
        assert!(simulation.apply(&Event::Hold).is_empty());

        let changes = simulation.apply(&Event::Toggle);
        assert_eq!(changes.len(), 1);
        assert!(changes[0].pending);

        let changes = simulation.apply(&Event::Grant);
        assert_eq!(
            changes
                .iter()
                .map(|status| (status.backend, status.pending))
                .collect::<Vec<_>>(),
            vec![(Backend::Native, false)]
        );

        let changes = simulation.apply(&Event::Scroll(10.0));
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].backend, Backend::None);
        assert!(simulation.apply(&Event::Scroll(20.0)).is_empty());
    }

    #[test]
    fn restore_after_unload() {
        let mut simulation = run("toggle
unload
toggle
", true, true);
        assert_eq!(simulation.status().backend, Backend::None);
        simulation.apply(&Event::Restore);
        simulation.apply(&Event::Toggle);
        assert_eq!(simulation.status().backend, Backend::Native);
        assert_eq!(simulation.held(), (1, 0));
    }

    #[test]
    fn rejected_then_accepted() {
        let mut simulation = run("reject NotAllowedError\ntoggle\n", true, true);
        assert_eq!(
            simulation.status().message,
            "Failed to obtain native Wake Lock: NotAllowedError"
        );
        simulation.apply(&Event::Reject(None));
        simulation.apply(&Event::Toggle);
        assert_eq!(simulation.status().backend, Backend::Native);
    }
}
