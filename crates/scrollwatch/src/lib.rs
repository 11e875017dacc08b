//! Scrollwatch
//!
//! A throttled scroll observer. Scroll sources only flag the observer as
//! dirty; a background check runs at a fixed interval and, when dirty,
//! evaluates every watched element's conditions in registration order,
//! invoking the true or false callback of each.
//!
//! - **Selectors**: watch native elements by string ID or pass widgets directly
//! - **Conditions**: a predicate with optional outcome callbacks
//! - **Signals**: cheap, cloneable wake-up handles
//! - **Predicates**: common viewport checks built on `ScrollPosition`
//!
//! # Example
//!
//! ```rust
//! use scrollwatch::{predicates, Condition, ScrollObserver, WatchSpec};
//! use scrollwatch_core::{ElementBounds, ElementRegistry, ScrollPosition};
//!
//! let registry = ElementRegistry::new_shared();
//! let hero = registry.insert_node(Some(ElementBounds::new(0.0, 900.0, 800.0, 400.0)));
//! registry.register("hero", hero);
//!
//! let page = ScrollPosition::new();
//! page.update((0.0, 0.0), (800.0, 3000.0), (800.0, 600.0));
//!
//! let observer = ScrollObserver::builder()
//!     .watch(WatchSpec::new("#hero").condition(
//!         Condition::new(predicates::in_view(&page))
//!             .on_true(|_| println!("hero visible"))
//!             .on_false(|_| println!("hero hidden")),
//!     ))
//!     .build(&registry)
//!     .unwrap();
//!
//! page.connect(observer.signal().into_trigger());
//! page.scroll_by(0.0, 500.0);
//!
//! // Normally the background thread started by `init` does this
//! observer.check().unwrap();
//! ```

pub mod condition;
pub mod config;
pub mod error;
pub mod observer;
pub mod predicates;
pub mod signal;
pub mod watch;

pub use condition::{Condition, OutcomeFn, TestFn};
pub use config::{ObserverConfig, DEFAULT_INTERVAL_MS};
pub use error::{ConditionStage, ObserverError, Result};
pub use observer::{CheckOutcome, ObserverBuilder, ObserverState, ObserverStats, ScrollObserver};
pub use signal::ScrollSignal;
pub use watch::{Conditions, Selector, WatchSpec};
