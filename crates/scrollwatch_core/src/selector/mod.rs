//! Element selection and scroll state
//!
//! - `ElementRegistry` - O(1) lookup of elements by string ID
//! - `ElementHandle` - Resolved element with live bounds
//! - `ScrollPosition` - Shared scroll offset and viewport of a scroll container
//!
//! # Example
//!
//! ```rust
//! use scrollwatch_core::{ElementBounds, ElementRegistry, Watchable};
//!
//! let registry = ElementRegistry::new_shared();
//! let node = registry.insert_node(Some(ElementBounds::new(0.0, 1200.0, 800.0, 300.0)));
//! registry.register("pricing", node);
//!
//! let handle = registry.query("#pricing").unwrap();
//! assert_eq!(handle.bounds().map(|b| b.top()), Some(1200.0));
//! ```

mod handle;
mod registry;
mod scroll_position;

pub use handle::ElementHandle;
pub use registry::ElementRegistry;
pub use scroll_position::{ScrollPosition, TriggerCallback};
