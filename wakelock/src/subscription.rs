// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use std::fmt::{self, Debug, Formatter};

/// A registered callback, which is unregistered when the subscription is cancelled or dropped.
#[must_use = "dropping a subscription unregisters its callback"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Creates a subscription which calls `unsubscribe` exactly once when it ends.
    pub fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Unregisters the callback now.
    pub fn cancel(mut self) {
        self.unsubscribe();
    }

    fn unsubscribe(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl Debug for Subscription {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.unsubscribe.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn unsubscribes_once() {
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let subscription = Subscription::new(move || count_clone.set(count_clone.get() + 1));
        subscription.cancel();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn drop_unsubscribes() {
        let count = Rc::new(Cell::new(0));
        {
            let count = count.clone();
            let _subscription = Subscription::new(move || count.set(count.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }
}
