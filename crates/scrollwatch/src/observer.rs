//! The scroll observer: a throttled check loop over watched elements
//!
//! Signals only set a dirty flag. A dedicated thread wakes every interval and,
//! if the flag is set, runs one check pass over all entries. However many
//! signals arrive between two ticks, the pass runs once.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use scrollwatch_core::{ElementResolver, WatchHandle};

use crate::config::ObserverConfig;
use crate::error::{ConditionStage, ObserverError, Result};
use crate::signal::ScrollSignal;
use crate::watch::{WatchEntry, WatchSpec};

/// Lifecycle state of an observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// Constructed, check thread not started
    Idle,
    /// Check thread running
    Running,
    /// Stopped for good
    Stopped,
}

/// Result of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// No signal since the last completed pass; nothing ran
    Clean,
    /// A full pass ran
    Checked {
        /// Entries visited
        entries: usize,
        /// Conditions evaluated across all entries
        conditions: usize,
    },
    /// The observer is stopped; nothing ran
    Stopped,
}

/// Counters describing observer activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObserverStats {
    /// Completed check passes
    pub passes: u64,
    /// Passes aborted by a panicking condition
    pub failed_passes: u64,
    /// Signals that marked the observer dirty
    pub signals: u64,
    /// Signals that arrived after stop and were ignored
    pub ignored_signals: u64,
}

/// State shared between the observer, its signals, and the check thread
pub(crate) struct ObserverShared {
    dirty: AtomicBool,
    stopped: AtomicBool,
    /// Held for the duration of a pass, so passes never overlap
    entries: Mutex<Vec<WatchEntry>>,
    /// Copies of the resolved handles and labels, readable during a pass
    handles: Vec<WatchHandle>,
    labels: Vec<String>,
    passes: AtomicU64,
    failed_passes: AtomicU64,
    signals: AtomicU64,
    ignored_signals: AtomicU64,
}

impl ObserverShared {
    fn new(entries: Vec<WatchEntry>) -> Self {
        let handles = entries.iter().map(|e| Arc::clone(&e.handle)).collect();
        let labels = entries.iter().map(|e| e.label.clone()).collect();
        Self {
            handles,
            labels,
            dirty: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            entries: Mutex::new(entries),
            passes: AtomicU64::new(0),
            failed_passes: AtomicU64::new(0),
            signals: AtomicU64::new(0),
            ignored_signals: AtomicU64::new(0),
        }
    }

    pub(crate) fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Mark dirty; ignored once stopped
    pub(crate) fn signal(&self) {
        if self.is_stopped() {
            self.ignored_signals.fetch_add(1, Ordering::Relaxed);
            tracing::trace!("ScrollObserver: signal after stop ignored");
            return;
        }
        self.signals.fetch_add(1, Ordering::Relaxed);
        self.dirty.store(true, Ordering::Release);
    }

    fn check(&self) -> Result<CheckOutcome> {
        if self.is_stopped() {
            return Ok(CheckOutcome::Stopped);
        }

        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        // Taking the flag up front keeps signals that arrive mid-pass; a failed
        // pass puts it back so the next tick retries.
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(CheckOutcome::Clean);
        }

        let started = Instant::now();
        let mut conditions = 0;

        for (entry_index, entry) in entries.iter().enumerate() {
            for (condition_index, condition) in entry.conditions.iter().enumerate() {
                let mut stage = ConditionStage::Test;
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    condition.evaluate(&entry.handle, &mut stage)
                }));

                if let Err(payload) = result {
                    self.dirty.store(true, Ordering::Release);
                    self.failed_passes.fetch_add(1, Ordering::Relaxed);
                    return Err(ObserverError::CallbackPanicked {
                        entry: entry_index,
                        condition: condition_index,
                        stage,
                        message: panic_message(&*payload),
                    });
                }

                conditions += 1;
            }
        }

        self.passes.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(
            "ScrollObserver: checked {} entries ({} conditions) in {:?}",
            entries.len(),
            conditions,
            started.elapsed()
        );

        Ok(CheckOutcome::Checked {
            entries: entries.len(),
            conditions,
        })
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Watches elements and evaluates their conditions on a throttled timer
///
/// # Example
///
/// ```rust
/// use scrollwatch::{Condition, ScrollObserver, WatchSpec};
/// use scrollwatch_core::{ElementBounds, ElementRegistry};
///
/// let registry = ElementRegistry::new_shared();
/// let footer = registry.insert_node(Some(ElementBounds::new(0.0, 2400.0, 800.0, 120.0)));
/// registry.register("footer", footer);
///
/// let mut observer = ScrollObserver::builder()
///     .interval_ms(100)
///     .watch(
///         WatchSpec::new("#footer")
///             .condition(Condition::new(|h| h.is_visible()).on_true(|_| println!("footer laid out"))),
///     )
///     .start(&registry)
///     .unwrap();
///
/// // Wire `signal` into whatever reports scrolling
/// let signal = observer.signal();
/// signal.notify();
///
/// observer.stop();
/// ```
pub struct ScrollObserver {
    shared: Arc<ObserverShared>,
    interval: Duration,
    state: ObserverState,
    /// Check thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ScrollObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollObserver")
            .field("state", &self.state)
            .field("interval", &self.interval)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

impl ScrollObserver {
    /// Create an observer, resolving every selector once
    ///
    /// Fails with [`ObserverError::Unresolved`] if a native selector matches
    /// nothing. The check thread is not started; call [`init`](Self::init).
    pub fn new(
        specs: impl IntoIterator<Item = WatchSpec>,
        config: ObserverConfig,
        resolver: &dyn ElementResolver,
    ) -> Result<Self> {
        let entries = specs
            .into_iter()
            .map(|spec| WatchEntry::resolve(spec, resolver))
            .collect::<Result<Vec<_>>>()?;

        let interval = config.interval();
        tracing::debug!(
            "ScrollObserver: watching {} entries every {:?}",
            entries.len(),
            interval
        );

        Ok(Self {
            shared: Arc::new(ObserverShared::new(entries)),
            interval,
            state: ObserverState::Idle,
            thread_handle: None,
        })
    }

    /// Create and immediately start an observer
    pub fn start(
        specs: impl IntoIterator<Item = WatchSpec>,
        config: ObserverConfig,
        resolver: &dyn ElementResolver,
    ) -> Result<Self> {
        let mut observer = Self::new(specs, config, resolver)?;
        observer.init()?;
        Ok(observer)
    }

    pub fn builder() -> ObserverBuilder {
        ObserverBuilder::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the repeating check on a background thread
    ///
    /// Calling this while already running does nothing. A stopped observer
    /// cannot be restarted.
    pub fn init(&mut self) -> Result<()> {
        match self.state {
            ObserverState::Stopped => return Err(ObserverError::Stopped),
            ObserverState::Running => {
                tracing::debug!("ScrollObserver: init called while running, ignoring");
                return Ok(());
            }
            ObserverState::Idle => {}
        }

        let shared = Arc::clone(&self.shared);
        let interval = self.interval;

        let handle = thread::Builder::new()
            .name("scrollwatch-check".to_string())
            .spawn(move || {
                let mut next_tick = Instant::now() + interval;

                while !shared.is_stopped() {
                    let now = Instant::now();
                    if now < next_tick {
                        thread::park_timeout(next_tick - now);
                        continue;
                    }

                    if let Err(err) = shared.check() {
                        tracing::error!("ScrollObserver: {}", err);
                    }

                    // Missed ticks are dropped rather than run back to back
                    next_tick += interval;
                    let now = Instant::now();
                    if next_tick <= now {
                        next_tick = now + interval;
                    }
                }
            })
            .map_err(ObserverError::Spawn)?;

        self.thread_handle = Some(handle);
        self.state = ObserverState::Running;
        tracing::debug!("ScrollObserver: started ({:?} interval)", self.interval);
        Ok(())
    }

    /// Stop checking for good
    ///
    /// Cancels the timer, waits for an in-flight pass to finish, and detaches
    /// all signals: later signals are ignored even though the dirty flag may
    /// still be set. Safe to call more than once.
    pub fn stop(&mut self) {
        if self.state == ObserverState::Stopped {
            return;
        }

        self.shared.stopped.store(true, Ordering::Release);

        if let Some(handle) = self.thread_handle.take() {
            handle.thread().unpark();
            // A callback stopping its own observer must not join itself
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }

        self.state = ObserverState::Stopped;
        tracing::debug!("ScrollObserver: stopped");
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    /// Check if the check thread is running
    pub fn is_running(&self) -> bool {
        self.state == ObserverState::Running
    }

    // =========================================================================
    // Signals and checks
    // =========================================================================

    /// Note that something scroll-relevant happened
    ///
    /// Only sets the dirty flag; cheap enough to call on every scroll event.
    pub fn scroll_event(&self) {
        self.shared.signal();
    }

    /// Get a cloneable wake-up handle for this observer
    pub fn signal(&self) -> ScrollSignal {
        ScrollSignal::new(Arc::downgrade(&self.shared))
    }

    /// Run one check now, exactly as the timer does
    ///
    /// Does nothing unless a signal arrived since the last completed pass. A
    /// panicking predicate or callback aborts the pass; the observer stays
    /// dirty so the next check retries it.
    ///
    /// Passes hold a non-reentrant lock, so a predicate or callback must not
    /// call `check` on its own observer; doing so deadlocks.
    pub fn check(&self) -> Result<CheckOutcome> {
        self.shared.check()
    }

    /// Check if a signal arrived since the last completed pass
    pub fn is_dirty(&self) -> bool {
        self.shared.dirty.load(Ordering::Acquire)
    }

    // =========================================================================
    // Inspection
    // =========================================================================

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Resolved handles in registration order
    ///
    /// Does not wait for a running pass, so callbacks may call it.
    pub fn handles(&self) -> Vec<WatchHandle> {
        self.shared.handles.clone()
    }

    /// Labels of the watched entries in registration order
    pub fn labels(&self) -> Vec<String> {
        self.shared.labels.clone()
    }

    pub fn stats(&self) -> ObserverStats {
        ObserverStats {
            passes: self.shared.passes.load(Ordering::Relaxed),
            failed_passes: self.shared.failed_passes.load(Ordering::Relaxed),
            signals: self.shared.signals.load(Ordering::Relaxed),
            ignored_signals: self.shared.ignored_signals.load(Ordering::Relaxed),
        }
    }
}

impl Drop for ScrollObserver {
    fn drop(&mut self) {
        // Stop the check thread when the observer is dropped
        self.stop();
    }
}

/// Builder for [`ScrollObserver`]
#[derive(Debug, Default)]
pub struct ObserverBuilder {
    specs: Vec<WatchSpec>,
    config: ObserverConfig,
}

impl ObserverBuilder {
    /// Add a watched element
    pub fn watch(mut self, spec: WatchSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Set the check interval in milliseconds (0 means the default)
    pub fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.config.interval_ms = Some(interval_ms);
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ObserverConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve selectors and build an idle observer
    pub fn build(self, resolver: &dyn ElementResolver) -> Result<ScrollObserver> {
        ScrollObserver::new(self.specs, self.config, resolver)
    }

    /// Resolve selectors, build, and start the check thread
    pub fn start(self, resolver: &dyn ElementResolver) -> Result<ScrollObserver> {
        ScrollObserver::start(self.specs, self.config, resolver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::Condition;
    use crate::watch::Selector;
    use scrollwatch_core::{ElementBounds, ElementRegistry, NoElements, Watchable};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Weak;

    type Log = Arc<Mutex<Vec<String>>>;

    fn new_log() -> Log {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(log: &Log, entry: &str) -> impl Fn(&WatchHandle) + Send + Sync + 'static {
        let log = log.clone();
        let entry = entry.to_string();
        move |_| log.lock().unwrap().push(entry.clone())
    }

    struct Widget(&'static str);

    impl Watchable for Widget {
        fn bounds(&self) -> Option<ElementBounds> {
            Some(ElementBounds::new(0.0, 0.0, 100.0, 100.0))
        }

        fn label(&self) -> Option<String> {
            Some(self.0.to_string())
        }
    }

    fn counting_observer(interval_ms: u64) -> (ScrollObserver, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let observer = ScrollObserver::builder()
            .interval_ms(interval_ms)
            .watch(
                WatchSpec::new(Selector::widget(Widget("w"))).condition(
                    Condition::new(|_| true).on_true(move |_| {
                        count_clone.fetch_add(1, Ordering::SeqCst);
                    }),
                ),
            )
            .build(&NoElements)
            .unwrap();
        (observer, count)
    }

    fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        done()
    }

    // =========================================================================
    // Throttling
    // =========================================================================

    #[test]
    fn test_many_signals_one_pass() {
        let (observer, count) = counting_observer(200);

        for _ in 0..500 {
            observer.scroll_event();
        }

        assert_eq!(
            observer.check().unwrap(),
            CheckOutcome::Checked {
                entries: 1,
                conditions: 1
            }
        );
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(observer.stats().signals, 500);
        assert_eq!(observer.stats().passes, 1);
    }

    #[test]
    fn test_clean_check_is_noop() {
        let (observer, count) = counting_observer(200);

        assert_eq!(observer.check().unwrap(), CheckOutcome::Clean);

        observer.scroll_event();
        observer.check().unwrap();
        assert!(!observer.is_dirty());

        assert_eq!(observer.check().unwrap(), CheckOutcome::Clean);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // Condition protocol
    // =========================================================================

    #[test]
    fn test_true_and_false_callbacks_in_order() {
        let log = new_log();
        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new(Selector::widget(Widget("hero")))
                    .condition(Condition::new(|_| true).on_true(record(&log, "c1-true")))
                    .condition(Condition::new(|_| false).on_false(record(&log, "c2-false"))),
            )
            .build(&NoElements)
            .unwrap();

        observer.scroll_event();
        observer.check().unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["c1-true", "c2-false"]);

        observer.scroll_event();
        observer.check().unwrap();
        assert_eq!(log.lock().unwrap().len(), 4);
    }

    #[test]
    fn test_missing_outcome_callback_does_nothing() {
        let log = new_log();
        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new(Selector::widget(Widget("a")))
                    .condition(Condition::new(|_| true).on_false(record(&log, "never")))
                    .condition(Condition::new(|_| false).on_true(record(&log, "never")))
                    .condition(Condition::new(|_| true)),
            )
            .build(&NoElements)
            .unwrap();

        observer.scroll_event();
        let outcome = observer.check().unwrap();

        assert_eq!(
            outcome,
            CheckOutcome::Checked {
                entries: 1,
                conditions: 3
            }
        );
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_entries_then_conditions_in_registration_order() {
        let log = new_log();
        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new(Selector::widget(Widget("first")))
                    .condition(Condition::new(|_| true).on_true(record(&log, "first/0")))
                    .condition(Condition::new(|_| false).on_false(record(&log, "first/1"))),
            )
            .watch(
                WatchSpec::new(Selector::widget(Widget("second")))
                    .condition(Condition::new(|_| true).on_true(record(&log, "second/0"))),
            )
            .watch(
                WatchSpec::new(Selector::widget(Widget("third")))
                    .condition(Condition::new(|_| false).on_false(record(&log, "third/0")))
                    .condition(Condition::new(|_| true).on_true(record(&log, "third/1"))),
            )
            .build(&NoElements)
            .unwrap();

        observer.scroll_event();
        observer.check().unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["first/0", "first/1", "second/0", "third/0", "third/1"]
        );
        assert_eq!(observer.labels(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_callbacks_receive_resolved_handle() {
        let widget: WatchHandle = Arc::new(Widget("panel"));
        let seen = Arc::new(Mutex::new(Vec::<WatchHandle>::new()));
        let seen_clone = seen.clone();

        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new(widget.clone()).condition(
                    Condition::new(|_| true)
                        .on_true(move |h| seen_clone.lock().unwrap().push(Arc::clone(h))),
                ),
            )
            .build(&NoElements)
            .unwrap();

        observer.scroll_event();
        observer.check().unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(Arc::ptr_eq(&seen[0], &widget));
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    #[test]
    fn test_unresolved_selector_fails_construction() {
        let registry = ElementRegistry::new_shared();
        let node = registry.insert_node(None);
        registry.register("present", node);

        let err = ScrollObserver::builder()
            .watch(WatchSpec::new("#present"))
            .watch(WatchSpec::new("#absent"))
            .build(&registry)
            .unwrap_err();

        assert!(matches!(err, ObserverError::Unresolved(s) if s == "#absent"));
    }

    #[test]
    fn test_resolution_is_cached() {
        let registry = ElementRegistry::new_shared();
        let original = registry.insert_node(Some(ElementBounds::new(0.0, 100.0, 50.0, 50.0)));
        let replacement = registry.insert_node(Some(ElementBounds::new(0.0, 5000.0, 50.0, 50.0)));
        registry.register("teaser", original);

        let tops = Arc::new(Mutex::new(Vec::new()));
        let tops_clone = tops.clone();
        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new("#teaser").condition(Condition::new(move |h| {
                    tops_clone.lock().unwrap().push(h.bounds().map(|b| b.top()));
                    true
                })),
            )
            .build(&registry)
            .unwrap();

        // Swap the element out from under the observer
        registry.register("teaser", replacement);

        observer.scroll_event();
        observer.check().unwrap();

        assert_eq!(*tops.lock().unwrap(), vec![Some(100.0)]);
        assert_eq!(observer.handles()[0].label(), None);
    }

    #[test]
    fn test_removed_element_fails_construction() {
        let registry = ElementRegistry::new_shared();
        let node = registry.insert_node(Some(ElementBounds::default()));
        registry.register("old-name", node);
        registry.register("new-name", node);
        registry.remove_node(node);

        for selector in ["#old-name", "#new-name"] {
            let err = ScrollObserver::builder()
                .watch(WatchSpec::new(selector))
                .build(&registry)
                .unwrap_err();
            assert!(matches!(err, ObserverError::Unresolved(ref s) if s == selector));
        }
    }

    #[test]
    fn test_callbacks_may_inspect_own_observer() {
        let slot: Arc<Mutex<Option<Weak<ScrollObserver>>>> = Arc::new(Mutex::new(None));
        let slot_clone = slot.clone();
        let log = new_log();
        let log_clone = log.clone();

        let observer = Arc::new(
            ScrollObserver::builder()
                .watch(
                    WatchSpec::new(Selector::widget(Widget("nav"))).condition(
                        Condition::new(|_| true).on_true(move |_| {
                            let observer =
                                slot_clone.lock().unwrap().as_ref().and_then(Weak::upgrade);
                            if let Some(observer) = observer {
                                let mut log = log_clone.lock().unwrap();
                                log.extend(observer.labels());
                                log.push(observer.handles().len().to_string());
                            }
                        }),
                    ),
                )
                .build(&NoElements)
                .unwrap(),
        );
        *slot.lock().unwrap() = Some(Arc::downgrade(&observer));

        observer.scroll_event();
        observer.check().unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["nav", "1"]);
    }

    // =========================================================================
    // Failure policy
    // =========================================================================

    #[test]
    fn test_panicking_callback_aborts_pass() {
        let log = new_log();
        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new(Selector::widget(Widget("a")))
                    .condition(Condition::new(|_| true).on_true(record(&log, "a/0")))
                    .condition(Condition::new(|_| true).on_true(|_| panic!("boom"))),
            )
            .watch(
                WatchSpec::new(Selector::widget(Widget("b")))
                    .condition(Condition::new(|_| true).on_true(record(&log, "b/0"))),
            )
            .build(&NoElements)
            .unwrap();

        observer.scroll_event();
        let err = observer.check().unwrap_err();

        match err {
            ObserverError::CallbackPanicked {
                entry,
                condition,
                stage,
                message,
            } => {
                assert_eq!((entry, condition), (0, 1));
                assert_eq!(stage, ConditionStage::OnTrue);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert_eq!(*log.lock().unwrap(), vec!["a/0"]);
        assert!(observer.is_dirty());
        assert_eq!(observer.stats().failed_passes, 1);
        assert_eq!(observer.stats().passes, 0);

        // Still dirty, so the next check retries and fails the same way
        assert!(observer.check().is_err());
        assert_eq!(*log.lock().unwrap(), vec!["a/0", "a/0"]);
    }

    #[test]
    fn test_panicking_predicate_reports_test_stage() {
        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new(Selector::widget(Widget("a")))
                    .condition(Condition::new(|_| panic!("{}", String::from("bad layout")))),
            )
            .build(&NoElements)
            .unwrap();

        observer.scroll_event();
        let err = observer.check().unwrap_err();

        assert!(matches!(
            err,
            ObserverError::CallbackPanicked { stage: ConditionStage::Test, ref message, .. }
                if message == "bad layout"
        ));
    }

    #[test]
    fn test_signal_during_pass_is_kept() {
        let observer_signal: Arc<Mutex<Option<ScrollSignal>>> = Arc::new(Mutex::new(None));
        let signal_slot = observer_signal.clone();
        let runs = Arc::new(AtomicUsize::new(0));
        let runs_clone = runs.clone();

        let observer = ScrollObserver::builder()
            .watch(
                WatchSpec::new(Selector::widget(Widget("a"))).condition(
                    Condition::new(|_| true).on_true(move |_| {
                        // Only the first pass re-signals
                        if runs_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                            if let Some(signal) = signal_slot.lock().unwrap().as_ref() {
                                signal.notify();
                            }
                        }
                    }),
                ),
            )
            .build(&NoElements)
            .unwrap();
        *observer_signal.lock().unwrap() = Some(observer.signal());

        observer.scroll_event();
        observer.check().unwrap();
        assert!(observer.is_dirty());

        observer.check().unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
        assert_eq!(observer.check().unwrap(), CheckOutcome::Clean);
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[test]
    fn test_default_interval() {
        let unset = ScrollObserver::builder().build(&NoElements).unwrap();
        let zero = ScrollObserver::builder()
            .interval_ms(0)
            .build(&NoElements)
            .unwrap();
        let custom = ScrollObserver::builder()
            .interval_ms(35)
            .build(&NoElements)
            .unwrap();

        assert_eq!(unset.interval(), Duration::from_millis(200));
        assert_eq!(zero.interval(), Duration::from_millis(200));
        assert_eq!(custom.interval(), Duration::from_millis(35));
    }

    #[test]
    fn test_timer_runs_pass_after_signal() {
        let (mut observer, count) = counting_observer(10);
        observer.init().unwrap();
        assert!(observer.is_running());

        observer.scroll_event();
        assert!(wait_until(Duration::from_secs(2), || {
            count.load(Ordering::SeqCst) == 1
        }));
        assert!(wait_until(Duration::from_secs(2), || !observer.is_dirty()));

        observer.stop();
        assert_eq!(observer.state(), ObserverState::Stopped);
    }

    #[test]
    fn test_timer_does_not_run_when_clean() {
        let (mut observer, count) = counting_observer(5);
        observer.init().unwrap();

        thread::sleep(Duration::from_millis(50));
        observer.stop();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(observer.stats().passes, 0);
    }

    #[test]
    fn test_burst_of_signals_is_throttled_by_timer() {
        let (mut observer, count) = counting_observer(40);
        observer.init().unwrap();

        for _ in 0..1000 {
            observer.scroll_event();
        }
        assert!(wait_until(Duration::from_secs(2), || {
            count.load(Ordering::SeqCst) >= 1
        }));
        thread::sleep(Duration::from_millis(120));
        observer.stop();

        // A burst this short spans at most one tick boundary
        assert!(count.load(Ordering::SeqCst) <= 2);
        assert_eq!(observer.stats().signals, 1000);
    }

    #[test]
    fn test_no_checks_after_stop() {
        let (mut observer, count) = counting_observer(10);
        observer.init().unwrap();
        observer.stop();

        observer.scroll_event();
        thread::sleep(Duration::from_millis(50));

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(observer.check().unwrap(), CheckOutcome::Stopped);
        assert_eq!(observer.stats().ignored_signals, 1);
    }

    #[test]
    fn test_dirty_flag_ignored_after_stop() {
        let (mut observer, count) = counting_observer(10);

        observer.scroll_event();
        observer.stop();

        assert!(observer.is_dirty());
        assert_eq!(observer.check().unwrap(), CheckOutcome::Stopped);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_stop_is_idempotent_and_terminal() {
        let (mut observer, _count) = counting_observer(10);
        observer.init().unwrap();

        observer.stop();
        observer.stop();

        assert!(matches!(observer.init(), Err(ObserverError::Stopped)));
        assert_eq!(observer.state(), ObserverState::Stopped);
    }

    #[test]
    fn test_double_init_keeps_single_timer() {
        let (mut observer, _count) = counting_observer(10);

        observer.init().unwrap();
        observer.init().unwrap();

        assert!(observer.is_running());
        observer.stop();
    }

    #[test]
    fn test_stop_detaches_signals() {
        let (mut observer, _count) = counting_observer(10);
        let signal = observer.signal();
        assert!(signal.is_attached());

        observer.stop();
        signal.notify();

        assert!(!signal.is_attached());
        assert_eq!(observer.stats().ignored_signals, 1);
    }

    #[test]
    fn test_signal_outliving_observer_is_harmless() {
        let (observer, _count) = counting_observer(10);
        let signal = observer.signal();
        drop(observer);

        signal.notify();
        assert!(!signal.is_attached());
    }
}
