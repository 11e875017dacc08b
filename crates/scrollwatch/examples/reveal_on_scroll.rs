//! Reveal-on-Scroll Example
//!
//! Simulates a long page scrolling past three sections and a footer. Scroll
//! updates arrive every few milliseconds; the observer only evaluates its
//! conditions once per interval.
//!
//! Features demonstrated:
//! - Native elements resolved by ID through `ElementRegistry`
//! - A widget watched directly through `Watchable`
//! - `ScrollPosition` wired to the observer as its wake-up source
//! - Interval loaded from TOML configuration
//!
//! Run with: RUST_LOG=info cargo run -p scrollwatch --example reveal_on_scroll

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use scrollwatch::{predicates, Condition, ObserverConfig, Selector, ScrollObserver, WatchSpec};
use scrollwatch_core::{ElementBounds, ElementRegistry, ScrollPosition, Watchable};

/// A progress bar widget that tracks its own geometry
struct ProgressBar {
    page: ScrollPosition,
    last_percent: AtomicU32,
}

impl Watchable for ProgressBar {
    fn bounds(&self) -> Option<ElementBounds> {
        let (width, _) = self.page.viewport_size()?;
        let fill = width * self.page.scroll_progress();
        Some(ElementBounds::new(0.0, self.page.scroll_y(), fill, 4.0))
    }

    fn label(&self) -> Option<String> {
        Some("progress-bar".to_string())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("scrollwatch=debug".parse()?),
        )
        .init();

    // Lay out the page
    let registry = ElementRegistry::new_shared();
    for (i, y) in [700.0, 1600.0, 2500.0].into_iter().enumerate() {
        let node = registry.insert_node(Some(ElementBounds::new(0.0, y, 800.0, 500.0)));
        registry.register(format!("section-{}", i + 1), node);
    }
    let footer = registry.insert_node(Some(ElementBounds::new(0.0, 3300.0, 800.0, 200.0)));
    registry.register("footer", footer);

    let page = ScrollPosition::new();
    page.update((0.0, 0.0), (800.0, 3500.0), (800.0, 600.0));

    let progress = Arc::new(ProgressBar {
        page: page.clone(),
        last_percent: AtomicU32::new(0),
    });

    // Watch specs
    let mut specs: Vec<WatchSpec> = (1..=3)
        .map(|i| {
            let name = format!("section-{}", i);
            let (shown, hidden) = (name.clone(), name.clone());
            WatchSpec::new(format!("#{}", name)).condition(
                Condition::new(predicates::in_band(&page, 0.0, 400.0))
                    .on_true(move |_| tracing::info!("{} entered the reading zone", shown))
                    .on_false(move |_| tracing::debug!("{} outside the reading zone", hidden)),
            )
        })
        .collect();

    specs.push(
        WatchSpec::new("#footer").condition(
            Condition::new(predicates::reached_bottom(&page))
                .on_true(|_| tracing::info!("footer reached, load more content")),
        ),
    );

    let bar = Arc::clone(&progress);
    specs.push(WatchSpec::new(Selector::Widget(progress)).condition(
        Condition::new(|handle| handle.bounds().is_some_and(|b| b.width > 0.0)).on_true(
            move |handle| {
                let width = handle.bounds().map(|b| b.width).unwrap_or_default();
                let percent = (width / 8.0).round() as u32;
                if bar.last_percent.swap(percent, Ordering::Relaxed) != percent {
                    tracing::info!("read {}%", percent);
                }
            },
        ),
    ));

    let config = ObserverConfig::from_toml_str("interval_ms = 50")?;
    let mut observer = ScrollObserver::start(specs, config, &registry)?;
    page.connect(observer.signal().into_trigger());

    // Scroll down the page in small steps, far faster than the check interval
    while !page.is_at_bottom() {
        page.scroll_by(0.0, 12.0);
        thread::sleep(Duration::from_millis(4));
    }
    thread::sleep(Duration::from_millis(150));

    observer.stop();
    let stats = observer.stats();
    tracing::info!(
        "{} scroll signals handled in {} check passes",
        stats.signals,
        stats.passes
    );

    Ok(())
}
