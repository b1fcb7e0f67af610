//! Parallel dispatch of (page, keyword) scoring tasks.
//!
//! This module provides functionality to:
//! - Build the page x keyword task set under a total-task ceiling
//! - Score tasks on a fixed worker pool fed by a bounded queue
//! - Group the records by keyword on a single collector
//! - Report progress and honor cancellation and deadlines

pub mod config;
pub mod engine;
pub mod metrics;
pub mod task;

pub use config::ParallelMatchConfig;
pub use engine::{DetailMatch, ParallelMatchEngine};
pub use metrics::{CompletionBarrier, DispatchStats, LogProgress, NoopProgress, ProgressObserver};
pub use task::{CancellationToken, MatchTask, TaskResult};
