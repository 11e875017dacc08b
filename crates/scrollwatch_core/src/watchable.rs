//! Positional query surface shared by native element handles and widgets

use std::sync::Arc;

use crate::geometry::ElementBounds;

/// Anything whose position can be watched
///
/// Native elements resolved from the [`ElementRegistry`](crate::ElementRegistry)
/// implement this through [`ElementHandle`](crate::ElementHandle). Widgets that
/// track their own geometry implement it directly and are watched as-is.
pub trait Watchable: Send + Sync {
    /// Current bounds in document coordinates
    ///
    /// Returns None if the subject has no layout (not yet laid out, or removed).
    fn bounds(&self) -> Option<ElementBounds>;

    /// Whether the subject currently takes part in layout
    fn is_visible(&self) -> bool {
        self.bounds().is_some()
    }

    /// Human-readable name used in log output
    fn label(&self) -> Option<String> {
        None
    }
}

/// Shared, already-resolved handle passed to conditions and callbacks
pub type WatchHandle = Arc<dyn Watchable>;

/// Resolves a string selector to a live handle
///
/// Implementations perform a single best-match lookup. Returning None means the
/// selector matched nothing.
pub trait ElementResolver {
    fn resolve(&self, selector: &str) -> Option<WatchHandle>;
}

/// Resolver for observers that only watch widgets
///
/// Every string selector fails to resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoElements;

impl ElementResolver for NoElements {
    fn resolve(&self, _selector: &str) -> Option<WatchHandle> {
        None
    }
}
