//! Ready-made position predicates
//!
//! Each function returns a closure suitable for [`Condition::new`](crate::Condition::new).
//! They read the element's bounds and the current scroll state at check time.
//! An element without bounds, or a scroll position without a known viewport
//! size, never satisfies a predicate.
//!
//! ```rust
//! use scrollwatch::{predicates, Condition};
//! use scrollwatch_core::ScrollPosition;
//!
//! let page = ScrollPosition::new();
//! let reveal = Condition::new(predicates::in_view(&page)).on_true(|_| println!("fade in"));
//! ```

use scrollwatch_core::{ElementBounds, ScrollPosition, Viewport, WatchHandle};

fn with_layout(
    position: &ScrollPosition,
    handle: &WatchHandle,
    f: impl FnOnce(&Viewport, &ElementBounds) -> bool,
) -> bool {
    match (position.viewport(), handle.bounds()) {
        (Some(viewport), Some(bounds)) => f(&viewport, &bounds),
        _ => false,
    }
}

/// Any part of the element is inside the viewport
pub fn in_view(position: &ScrollPosition) -> impl Fn(&WatchHandle) -> bool + Send + Sync + 'static {
    let position = position.clone();
    move |handle| with_layout(&position, handle, |viewport, bounds| viewport.shows(bounds))
}

/// The whole element is inside the viewport
pub fn fully_in_view(
    position: &ScrollPosition,
) -> impl Fn(&WatchHandle) -> bool + Send + Sync + 'static {
    let position = position.clone();
    move |handle| {
        with_layout(&position, handle, |viewport, bounds| {
            viewport.shows_fully(bounds)
        })
    }
}

/// The element's top edge sits within a band of the viewport
///
/// `top` and `bottom` are distances from the top of the viewport, inclusive.
/// This is the usual "trigger zone" check: fire when a section's heading
/// crosses into the upper third of the screen, for example.
pub fn in_band(
    position: &ScrollPosition,
    top: f32,
    bottom: f32,
) -> impl Fn(&WatchHandle) -> bool + Send + Sync + 'static {
    let position = position.clone();
    move |handle| {
        with_layout(&position, handle, |viewport, bounds| {
            let y = viewport.to_viewport_space(bounds).top();
            y >= top && y <= bottom
        })
    }
}

/// The element's bottom edge has scrolled above a line `y` pixels below the
/// top of the viewport
pub fn scrolled_past(
    position: &ScrollPosition,
    y: f32,
) -> impl Fn(&WatchHandle) -> bool + Send + Sync + 'static {
    let position = position.clone();
    move |handle| {
        with_layout(&position, handle, |viewport, bounds| {
            viewport.to_viewport_space(bounds).bottom() < y
        })
    }
}

/// The scroll container is at the end of its content
///
/// Ignores the element; useful for load-more triggers attached to a footer.
pub fn reached_bottom(
    position: &ScrollPosition,
) -> impl Fn(&WatchHandle) -> bool + Send + Sync + 'static {
    let position = position.clone();
    move |_| position.max_scroll().is_some() && position.is_at_bottom()
}
