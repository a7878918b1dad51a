// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Keeps the device awake without a native wake lock, by looping a silent hidden video.

use crate::error::FallbackError;
use log::info;
use std::cell::{Cell, RefCell};

/// The document operations needed to play a hidden video.
#[allow(async_fn_in_trait)]
pub trait MediaHost {
    type Element: Clone;

    /// Returns whether video elements can be created and attached.
    fn is_supported(&self) -> bool;

    /// Creates a hidden, muted, looping, inline video element playing `source` and attaches it
    /// to the document.
    fn attach(&self, source: &str) -> Result<Self::Element, FallbackError>;

    /// Starts playback, resolving once the platform has accepted or rejected it.
    async fn play(&self, element: &Self::Element) -> Result<(), FallbackError>;

    fn pause(&self, element: &Self::Element);

    fn clear_source(&self, element: &Self::Element);

    /// Removes the element from the document.
    fn detach(&self, element: Self::Element);
}

/// The fallback backend. Enabling and disabling are both idempotent.
#[derive(Debug)]
pub struct FallbackBackend<H: MediaHost> {
    host: H,
    source: String,
    video: RefCell<Option<Video<H::Element>>>,
    next_id: Cell<u64>,
}

#[derive(Debug)]
struct Video<E> {
    id: u64,
    element: E,
}

impl<H: MediaHost> FallbackBackend<H> {
    /// Creates a disabled backend. Nothing is added to the document until [`Self::enable`].
    pub fn new(host: H, source: impl Into<String>) -> Self {
        Self {
            host,
            source: source.into(),
            video: RefCell::new(None),
            next_id: Cell::new(0),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn is_supported(&self) -> bool {
        self.host.is_supported()
    }

    pub fn is_enabled(&self) -> bool {
        self.video.borrow().is_some()
    }

    /// Attaches the hidden video and starts playing it.
    ///
    /// Does nothing if already enabled. If playback is rejected the video is removed again and
    /// the error returned.
    pub async fn enable(&self) -> Result<(), FallbackError> {
        if self.is_enabled() {
            return Ok(());
        }
        if !self.host.is_supported() {
            return Err(FallbackError::Unsupported(
                "video elements can't be attached to the document".to_string(),
            ));
        }

        let element = self.host.attach(&self.source)?;
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.video.replace(Some(Video {
            id,
            element: element.clone(),
        }));
        info!("Fallback enabled.");

        if let Err(e) = self.host.play(&element).await {
            // The video may have been disabled, or even replaced, while playback was pending.
            let still_current = matches!(&*self.video.borrow(), Some(video) if video.id == id);
            if still_current {
                self.disable();
            }
            return Err(e);
        }
        Ok(())
    }

    /// Stops and removes the hidden video. Does nothing if not enabled.
    pub fn disable(&self) {
        let Some(video) = self.video.take() else {
            return;
        };
        self.host.pause(&video.element);
        self.host.clear_source(&video.element);
        self.host.detach(video.element);
        info!("Fallback disabled.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::BLANK_VIDEO, memory::MemoryMediaHost};
    use futures::{executor::block_on, join};

    fn backend() -> FallbackBackend<MemoryMediaHost> {
        FallbackBackend::new(MemoryMediaHost::default(), BLANK_VIDEO)
    }

    #[test]
    fn enable_twice() {
        let fallback = backend();
        block_on(fallback.enable()).unwrap();
        block_on(fallback.enable()).unwrap();
        assert!(fallback.is_enabled());
        assert_eq!(fallback.host().attached_count(), 1);
        assert!(fallback.host().is_playing());
        assert_eq!(fallback.host().sources(), vec![BLANK_VIDEO.to_string()]);
    }

    #[test]
    fn disable_twice() {
        let fallback = backend();
        block_on(fallback.enable()).unwrap();
        fallback.disable();
        fallback.disable();
        assert!(!fallback.is_enabled());
        assert_eq!(fallback.host().attached_count(), 0);
    }

    #[test]
    fn disable_without_enable() {
        let fallback = backend();
        fallback.disable();
        assert!(!fallback.is_enabled());
        assert_eq!(fallback.host().attached_count(), 0);
    }

    #[test]
    fn enable_disable_enable() {
        let fallback = backend();
        block_on(fallback.enable()).unwrap();
        fallback.disable();
        block_on(fallback.enable()).unwrap();
        assert_eq!(fallback.host().attached_count(), 1);
        assert_eq!(fallback.host().created_count(), 2);
    }

    #[test]
    fn concurrent_enable() {
        let fallback = backend();
        let (first, second) = block_on(async { join!(fallback.enable(), fallback.enable()) });
        assert_eq!(first, Ok(()));
        assert_eq!(second, Ok(()));
        assert_eq!(fallback.host().attached_count(), 1);
    }

    #[test]
    fn playback_rejected() {
        let fallback = backend();
        fallback.host().fail_playback("NotAllowedError");
        assert_eq!(
            block_on(fallback.enable()),
            Err(FallbackError::Playback("NotAllowedError".to_string()))
        );
        assert!(!fallback.is_enabled());
        assert_eq!(fallback.host().attached_count(), 0);
    }

    #[test]
    fn unsupported() {
        let fallback = backend();
        fallback.host().set_supported(false);
        assert!(matches!(
            block_on(fallback.enable()),
            Err(FallbackError::Unsupported(_))
        ));
        assert!(!fallback.is_enabled());
    }
}
