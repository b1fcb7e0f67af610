//! Configuration for parallel match dispatch.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, SiteScoreError};

/// Default cap on `pages x keywords` tasks per dispatch.
pub const DEFAULT_MAX_TOTAL_TASKS: usize = 5_000_000;

/// Default number of collected results between progress callbacks.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Configuration for the parallel match engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelMatchConfig {
    /// Number of worker threads.
    /// If None, uses the number of CPU cores.
    pub worker_threads: Option<usize>,

    /// Capacity of the bounded task queue.
    /// If 0, uses the number of keywords plus one.
    pub queue_capacity: usize,

    /// Upper bound on `pages x keywords`; pages beyond
    /// `max_total_tasks / keywords` are dropped from the tail.
    pub max_total_tasks: usize,

    /// Collected results between progress callbacks. 0 disables them.
    pub progress_interval: usize,

    /// Deadline for a whole dispatch.
    pub timeout: Option<Duration>,
}

impl Default for ParallelMatchConfig {
    fn default() -> Self {
        Self {
            worker_threads: None,
            queue_capacity: 0,
            max_total_tasks: DEFAULT_MAX_TOTAL_TASKS,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            timeout: None,
        }
    }
}

impl ParallelMatchConfig {
    /// Set the number of worker threads.
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = Some(threads);
        self
    }

    /// Set the task queue capacity.
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the total task ceiling.
    pub fn with_max_total_tasks(mut self, max_total_tasks: usize) -> Self {
        self.max_total_tasks = max_total_tasks;
        self
    }

    /// Set the progress interval.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }

    /// Set the dispatch deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Effective worker count.
    pub fn effective_worker_threads(&self) -> usize {
        self.worker_threads.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Effective queue capacity for a dispatch over `keyword_count` keywords.
    pub fn effective_queue_capacity(&self, keyword_count: usize) -> usize {
        if self.queue_capacity == 0 {
            keyword_count + 1
        } else {
            self.queue_capacity
        }
    }

    /// Number of pages that may be dispatched for `keyword_count` keywords.
    pub fn page_limit(&self, keyword_count: usize) -> usize {
        if keyword_count == 0 {
            return 0;
        }
        self.max_total_tasks / keyword_count
    }

    /// Reject settings that would score nothing.
    pub fn validate(&self) -> Result<()> {
        if self.max_total_tasks == 0 {
            return Err(SiteScoreError::invalid_config(
                "max_total_tasks must be at least 1",
            ));
        }
        Ok(())
    }
}
