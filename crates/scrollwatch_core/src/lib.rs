//! Scrollwatch Core
//!
//! Host-side building blocks for the scroll observer:
//!
//! - **Geometry**: document-space bounds and viewports
//! - **Watchable**: the positional query surface conditions read from
//! - **Element registry**: string selectors resolved to pinned element handles
//! - **Scroll position**: shared scroll state that fires a trigger on change

pub mod geometry;
pub mod node;
pub mod selector;
pub mod watchable;

pub use geometry::{ElementBounds, Viewport};
pub use node::LayoutNodeId;
pub use selector::{ElementHandle, ElementRegistry, ScrollPosition, TriggerCallback};
pub use watchable::{ElementResolver, NoElements, WatchHandle, Watchable};
