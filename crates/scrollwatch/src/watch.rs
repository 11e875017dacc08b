//! Watch specifications and their resolved entries

use std::sync::Arc;

use smallvec::SmallVec;

use scrollwatch_core::{ElementResolver, WatchHandle, Watchable};

use crate::condition::Condition;
use crate::error::{ObserverError, Result};

/// Conditions attached to one entry, in registration order
pub type Conditions = SmallVec<[Condition; 2]>;

/// What to watch
#[derive(Clone)]
pub enum Selector {
    /// A string identifying a native element, resolved once at construction
    Native(String),
    /// A widget that already exposes the positional query surface
    Widget(WatchHandle),
}

impl Selector {
    /// Wrap a widget
    pub fn widget<W: Watchable + 'static>(widget: W) -> Self {
        Selector::Widget(Arc::new(widget))
    }

    /// Resolve to a live handle
    ///
    /// Widgets are used as-is; native selectors go through `resolver`.
    pub fn resolve(&self, resolver: &dyn ElementResolver) -> Result<WatchHandle> {
        match self {
            Selector::Widget(handle) => Ok(Arc::clone(handle)),
            Selector::Native(selector) => resolver.resolve(selector).ok_or_else(|| {
                tracing::warn!("Selector '{}' did not match any element", selector);
                ObserverError::Unresolved(selector.clone())
            }),
        }
    }

    /// Name used in log output
    pub fn describe(&self) -> String {
        match self {
            Selector::Native(selector) => selector.clone(),
            Selector::Widget(handle) => handle.label().unwrap_or_else(|| "<widget>".to_string()),
        }
    }
}

impl std::fmt::Debug for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Native(selector) => f.debug_tuple("Native").field(selector).finish(),
            Selector::Widget(handle) => f.debug_tuple("Widget").field(&handle.label()).finish(),
        }
    }
}

impl From<&str> for Selector {
    fn from(selector: &str) -> Self {
        Selector::Native(selector.to_string())
    }
}

impl From<String> for Selector {
    fn from(selector: String) -> Self {
        Selector::Native(selector)
    }
}

impl From<WatchHandle> for Selector {
    fn from(handle: WatchHandle) -> Self {
        Selector::Widget(handle)
    }
}

/// One subject to watch together with its conditions
#[derive(Debug, Clone)]
pub struct WatchSpec {
    pub selector: Selector,
    pub conditions: Conditions,
}

impl WatchSpec {
    pub fn new(selector: impl Into<Selector>) -> Self {
        Self {
            selector: selector.into(),
            conditions: SmallVec::new(),
        }
    }

    /// Append a condition (evaluated after those added before it)
    pub fn condition(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn conditions(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.conditions.extend(conditions);
        self
    }
}

/// A watch spec whose selector has been resolved
pub(crate) struct WatchEntry {
    pub(crate) label: String,
    pub(crate) handle: WatchHandle,
    pub(crate) conditions: Conditions,
}

impl WatchEntry {
    pub(crate) fn resolve(spec: WatchSpec, resolver: &dyn ElementResolver) -> Result<Self> {
        let handle = spec.selector.resolve(resolver)?;
        Ok(Self {
            label: spec.selector.describe(),
            handle,
            conditions: spec.conditions,
        })
    }
}
