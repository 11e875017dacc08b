//! ScrollPosition - shared scroll state for a scroll container

use std::sync::{Arc, Mutex};

use crate::geometry::Viewport;

/// Callback fired whenever the scroll state changes
pub type TriggerCallback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct ScrollPositionInner {
    /// Current scroll offset (x, y)
    offset: (f32, f32),
    /// Content size (for scroll limits)
    content_size: Option<(f32, f32)>,
    /// Viewport size
    viewport_size: Option<(f32, f32)>,
    /// Notified after every change
    trigger: Option<TriggerCallback>,
}

/// Scroll state of one scroll container, shared between the host and observers
///
/// The host calls [`update`](Self::update) (or the `scroll_*` helpers) as the
/// container scrolls. Each change fires the connected trigger, which is how a
/// scroll container wakes an observer.
///
/// # Example
///
/// ```rust
/// use scrollwatch_core::ScrollPosition;
///
/// let page = ScrollPosition::new();
/// page.update((0.0, 120.0), (800.0, 4000.0), (800.0, 600.0));
///
/// assert_eq!(page.scroll_y(), 120.0);
/// assert_eq!(page.max_scroll(), Some((0.0, 3400.0)));
/// ```
#[derive(Clone, Default)]
pub struct ScrollPosition {
    inner: Arc<Mutex<ScrollPositionInner>>,
}

impl std::fmt::Debug for ScrollPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollPosition")
            .field("offset", &self.offset())
            .field("viewport_size", &self.viewport_size())
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl ScrollPosition {
    /// Create a scroll position with no trigger connected
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scroll position that fires `trigger` on every change
    pub fn with_trigger(trigger: TriggerCallback) -> Self {
        let position = Self::new();
        position.connect(trigger);
        position
    }

    /// Connect a trigger, replacing any previous one
    pub fn connect(&self, trigger: TriggerCallback) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.trigger = Some(trigger);
        }
    }

    /// Disconnect the trigger
    pub fn disconnect(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.trigger = None;
        }
    }

    /// Check if a trigger is connected
    pub fn is_connected(&self) -> bool {
        self.inner
            .lock()
            .ok()
            .is_some_and(|inner| inner.trigger.is_some())
    }

    /// Apply a change and fire the trigger outside the lock
    fn modify(&self, f: impl FnOnce(&mut ScrollPositionInner)) {
        let trigger = match self.inner.lock() {
            Ok(mut inner) => {
                f(&mut *inner);
                inner.trigger.clone()
            }
            Err(_) => None,
        };

        if let Some(trigger) = trigger {
            trigger();
        }
    }

    // =========================================================================
    // Host updates
    // =========================================================================

    /// Update scroll state from the host after layout or scrolling
    pub fn update(&self, offset: (f32, f32), content_size: (f32, f32), viewport_size: (f32, f32)) {
        self.modify(|inner| {
            inner.offset = offset;
            inner.content_size = Some(content_size);
            inner.viewport_size = Some(viewport_size);
        });
    }

    /// Set absolute scroll offset, clamped to the scroll range when known
    pub fn scroll_to(&self, x: f32, y: f32) {
        self.modify(|inner| {
            inner.offset = clamp_offset(inner, (x, y));
        });
    }

    /// Scroll by a relative amount
    pub fn scroll_by(&self, dx: f32, dy: f32) {
        self.modify(|inner| {
            let target = (inner.offset.0 + dx, inner.offset.1 + dy);
            inner.offset = clamp_offset(inner, target);
        });
    }

    /// Scroll to the top of the content
    pub fn scroll_to_top(&self) {
        self.modify(|inner| inner.offset.1 = 0.0);
    }

    // =========================================================================
    // Query current state
    // =========================================================================

    /// Get current scroll offset
    pub fn offset(&self) -> (f32, f32) {
        self.inner.lock().ok().map(|i| i.offset).unwrap_or_default()
    }

    /// Get current horizontal scroll offset
    pub fn scroll_x(&self) -> f32 {
        self.offset().0
    }

    /// Get current vertical scroll offset
    pub fn scroll_y(&self) -> f32 {
        self.offset().1
    }

    /// Get content size
    pub fn content_size(&self) -> Option<(f32, f32)> {
        self.inner.lock().ok()?.content_size
    }

    /// Get viewport size
    pub fn viewport_size(&self) -> Option<(f32, f32)> {
        self.inner.lock().ok()?.viewport_size
    }

    /// The visible window, once the viewport size is known
    pub fn viewport(&self) -> Option<Viewport> {
        let inner = self.inner.lock().ok()?;
        Some(Viewport::new(inner.offset, inner.viewport_size?))
    }

    /// Get maximum scroll offset
    pub fn max_scroll(&self) -> Option<(f32, f32)> {
        let inner = self.inner.lock().ok()?;
        max_scroll(&inner)
    }

    /// Check if scrolled to top
    pub fn is_at_top(&self) -> bool {
        self.scroll_y() <= 0.0
    }

    /// Check if scrolled to bottom
    pub fn is_at_bottom(&self) -> bool {
        if let Some((_, max_y)) = self.max_scroll() {
            self.scroll_y() >= max_y - 1.0 // Small tolerance
        } else {
            true
        }
    }

    /// Get scroll progress (0.0 = top, 1.0 = bottom)
    pub fn scroll_progress(&self) -> f32 {
        match self.max_scroll() {
            Some((_, max_y)) if max_y > 0.0 => (self.scroll_y() / max_y).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

fn max_scroll(inner: &ScrollPositionInner) -> Option<(f32, f32)> {
    let content = inner.content_size?;
    let viewport = inner.viewport_size?;
    Some((
        (content.0 - viewport.0).max(0.0),
        (content.1 - viewport.1).max(0.0),
    ))
}

fn clamp_offset(inner: &ScrollPositionInner, (x, y): (f32, f32)) -> (f32, f32) {
    match max_scroll(inner) {
        Some((max_x, max_y)) => (x.clamp(0.0, max_x), y.clamp(0.0, max_y)),
        None => (x.max(0.0), y.max(0.0)),
    }
}
