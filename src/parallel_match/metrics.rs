//! Completion tracking and progress reporting for dispatches.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Receives progress callbacks from the collector.
///
/// The engine decides when to call it; what to do with the numbers is up to
/// the implementation.
pub trait ProgressObserver: Send + Sync {
    /// `completed` of `total` tasks have been collected.
    fn on_progress(&self, completed: usize, total: usize);
}

/// Observer that ignores progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressObserver for NoopProgress {
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Observer that logs progress at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, completed: usize, total: usize) {
        let ratio = if total == 0 {
            1.0
        } else {
            completed as f64 / total as f64
        };
        log::info!("{completed} / {total} -----> {ratio:.2}");
    }
}

/// Counting barrier between the producer and the collector.
///
/// Every dispatched task is added before it is queued and every collected
/// result is marked done; the dispatch is complete once the producer has
/// finished and nothing is pending.
#[derive(Debug, Default)]
pub struct CompletionBarrier {
    dispatched: AtomicUsize,
    completed: AtomicUsize,
    sealed: AtomicBool,
}

impl CompletionBarrier {
    /// Create an empty barrier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one dispatched task.
    pub fn add(&self) {
        self.dispatched.fetch_add(1, Ordering::AcqRel);
    }

    /// Register one collected result.
    pub fn done(&self) {
        self.completed.fetch_add(1, Ordering::AcqRel);
    }

    /// No more tasks will be added.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
    }

    /// Tasks dispatched so far.
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::Acquire)
    }

    /// Results collected so far.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Acquire)
    }

    /// Dispatched but not yet collected.
    pub fn pending(&self) -> usize {
        self.dispatched().saturating_sub(self.completed())
    }

    /// Sealed with nothing pending.
    pub fn is_complete(&self) -> bool {
        self.sealed.load(Ordering::Acquire) && self.pending() == 0
    }
}

/// Snapshot of one finished dispatch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchStats {
    /// Pages in the input site.
    pub input_pages: usize,

    /// Pages left after task-volume truncation.
    pub dispatched_pages: usize,

    /// Keywords dispatched.
    pub keywords: usize,

    /// Tasks queued.
    pub tasks_dispatched: usize,

    /// Results collected.
    pub tasks_completed: usize,

    /// Worker threads used.
    pub worker_threads: usize,

    /// Wall time of the dispatch.
    pub elapsed: Duration,
}

impl DispatchStats {
    /// Whether pages were dropped by the task ceiling.
    pub fn truncated(&self) -> bool {
        self.dispatched_pages < self.input_pages
    }
}

/// Helper for timing operations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
