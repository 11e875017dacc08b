//! Wake-up handles for feeding scroll signals into an observer

use std::sync::{Arc, Weak};

use scrollwatch_core::TriggerCallback;

use crate::observer::ObserverShared;

/// Cloneable entry point for scroll signals
///
/// Obtained from [`ScrollObserver::signal`](crate::ScrollObserver::signal).
/// Holds only a weak reference, so a signal outliving its observer is
/// harmless. After the observer stops, notifications are ignored.
#[derive(Clone)]
pub struct ScrollSignal {
    shared: Weak<ObserverShared>,
}

impl ScrollSignal {
    pub(crate) fn new(shared: Weak<ObserverShared>) -> Self {
        Self { shared }
    }

    /// Mark the observer dirty
    pub fn notify(&self) {
        if let Some(shared) = self.shared.upgrade() {
            shared.signal();
        }
    }

    /// Check if notifications still reach a live, unstopped observer
    pub fn is_attached(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| !shared.is_stopped())
    }

    /// Convert into a trigger callback for a scroll source
    ///
    /// ```rust
    /// use scrollwatch::ScrollObserver;
    /// use scrollwatch_core::{NoElements, ScrollPosition};
    ///
    /// let observer = ScrollObserver::builder().build(&NoElements).unwrap();
    /// let page = ScrollPosition::with_trigger(observer.signal().into_trigger());
    ///
    /// page.scroll_by(0.0, 40.0);
    /// assert!(observer.is_dirty());
    /// ```
    pub fn into_trigger(self) -> TriggerCallback {
        Arc::new(move || self.notify())
    }
}

impl std::fmt::Debug for ScrollSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollSignal")
            .field("attached", &self.is_attached())
            .finish()
    }
}
