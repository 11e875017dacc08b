//! Conditions: a predicate plus optional outcome callbacks

use std::sync::Arc;

use scrollwatch_core::WatchHandle;

use crate::error::ConditionStage;

/// Predicate evaluated against a watched handle
pub type TestFn = Arc<dyn Fn(&WatchHandle) -> bool + Send + Sync>;

/// Callback invoked with the watched handle for one outcome
pub type OutcomeFn = Arc<dyn Fn(&WatchHandle) + Send + Sync>;

/// One test/action pair attached to a watched element
///
/// A condition without a callback for the outcome that occurred simply does
/// nothing for that check.
///
/// # Example
///
/// ```rust
/// use scrollwatch::Condition;
///
/// let sticky = Condition::new(|handle| handle.bounds().is_some_and(|b| b.top() < 0.0))
///     .on_true(|_| println!("pin header"))
///     .on_false(|_| println!("unpin header"));
/// assert!(sticky.has_on_true() && sticky.has_on_false());
/// ```
#[derive(Clone)]
pub struct Condition {
    test: TestFn,
    on_true: Option<OutcomeFn>,
    on_false: Option<OutcomeFn>,
}

impl Condition {
    /// Create a condition with no callbacks
    pub fn new<F>(test: F) -> Self
    where
        F: Fn(&WatchHandle) -> bool + Send + Sync + 'static,
    {
        Self {
            test: Arc::new(test),
            on_true: None,
            on_false: None,
        }
    }

    /// Set the callback for a true outcome
    pub fn on_true<F>(mut self, callback: F) -> Self
    where
        F: Fn(&WatchHandle) + Send + Sync + 'static,
    {
        self.on_true = Some(Arc::new(callback));
        self
    }

    /// Set the callback for a false outcome
    pub fn on_false<F>(mut self, callback: F) -> Self
    where
        F: Fn(&WatchHandle) + Send + Sync + 'static,
    {
        self.on_false = Some(Arc::new(callback));
        self
    }

    pub fn has_on_true(&self) -> bool {
        self.on_true.is_some()
    }

    pub fn has_on_false(&self) -> bool {
        self.on_false.is_some()
    }

    /// Run the predicate and the callback for its outcome
    ///
    /// `stage` tracks which closure is running so a panic can be attributed.
    pub(crate) fn evaluate(&self, handle: &WatchHandle, stage: &mut ConditionStage) -> bool {
        *stage = ConditionStage::Test;
        let passed = (self.test)(handle);

        if passed {
            if let Some(callback) = &self.on_true {
                *stage = ConditionStage::OnTrue;
                callback(handle);
            }
        } else if let Some(callback) = &self.on_false {
            *stage = ConditionStage::OnFalse;
            callback(handle);
        }

        passed
    }
}

impl std::fmt::Debug for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Condition")
            .field("on_true", &self.on_true.is_some())
            .field("on_false", &self.on_false.is_some())
            .finish()
    }
}
