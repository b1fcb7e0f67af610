//! Main parallel match engine implementation.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crossbeam_channel::{RecvTimeoutError, bounded, unbounded};

use crate::error::{Result, SiteScoreError};
use crate::matching::{Keyword, MatchRecord};
use crate::parallel_match::config::ParallelMatchConfig;
use crate::parallel_match::metrics::{
    CompletionBarrier, DispatchStats, NoopProgress, ProgressObserver, Timer,
};
use crate::parallel_match::task::{CancellationToken, MatchTask, TaskResult};
use crate::site::PageRecord;

/// Match records grouped by keyword, plus how the dispatch went.
#[derive(Debug)]
pub struct DetailMatch<'a> {
    /// Keyword -> one record per dispatched page, in arrival order.
    pub records: HashMap<String, Vec<MatchRecord<'a>>>,

    /// Dispatch statistics.
    pub stats: DispatchStats,
}

/// Scores every (page, keyword) pair on a fixed pool of worker threads.
///
/// A producer feeds a bounded task queue, workers score tasks and hand the
/// records to the calling thread, which is the only writer of the
/// keyword -> records grouping.
pub struct ParallelMatchEngine {
    /// Configuration for the engine.
    config: ParallelMatchConfig,

    /// Progress hook.
    observer: Arc<dyn ProgressObserver>,

    /// Caller-controlled cancellation.
    cancel_token: CancellationToken,
}

impl ParallelMatchEngine {
    /// Create a new parallel match engine.
    pub fn new(config: ParallelMatchConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopProgress),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Report progress to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Stop dispatching when `token` is cancelled.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// The engine's cancellation token.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Engine configuration.
    pub fn config(&self) -> &ParallelMatchConfig {
        &self.config
    }

    /// Score `pages x keywords` and group the records by keyword.
    ///
    /// Keywords must be unique. Every keyword gets an entry, even if the
    /// task ceiling left no pages to score.
    pub fn detail_match<'a>(
        &self,
        pages: &'a [PageRecord],
        keywords: &'a [Keyword],
    ) -> Result<DetailMatch<'a>> {
        let timer = Timer::start();
        self.config.validate()?;

        if pages.is_empty() {
            return Err(SiteScoreError::invalid_input("site has no pages"));
        }

        let mut seen = HashSet::with_capacity(keywords.len());
        for keyword in keywords {
            if !seen.insert(keyword.as_str()) {
                return Err(SiteScoreError::invalid_input(format!(
                    "duplicate keyword: {:?}",
                    keyword.as_str()
                )));
            }
        }

        if self.cancel_token.is_cancelled() {
            return Err(SiteScoreError::cancelled("dispatch cancelled before start"));
        }

        let input_pages = pages.len();
        let page_limit = self.config.page_limit(keywords.len()).min(input_pages);
        if page_limit < pages.len() {
            log::debug!(
                "Task ceiling {} reached: scoring {} of {} pages",
                self.config.max_total_tasks,
                page_limit,
                pages.len()
            );
        }
        let pages = &pages[..page_limit];
        let total = pages.len() * keywords.len();

        let mut grouped: Vec<Vec<MatchRecord<'a>>> = keywords
            .iter()
            .map(|_| Vec::with_capacity(pages.len()))
            .collect();

        let mut stats = DispatchStats {
            input_pages,
            dispatched_pages: page_limit,
            keywords: keywords.len(),
            ..Default::default()
        };

        if total > 0 {
            let worker_threads = self.config.effective_worker_threads();
            stats.worker_threads = worker_threads;
            let barrier = CompletionBarrier::new();
            self.dispatch(pages, keywords, total, worker_threads, &barrier, &mut grouped)?;
            stats.tasks_dispatched = barrier.dispatched();
            stats.tasks_completed = barrier.completed();
        }

        stats.elapsed = timer.elapsed();

        let records = keywords
            .iter()
            .zip(grouped)
            .map(|(keyword, records)| (keyword.as_str().to_string(), records))
            .collect();

        Ok(DetailMatch { records, stats })
    }

    /// Run the producer, the workers and the collector until the barrier
    /// clears, the token is cancelled or the deadline passes.
    fn dispatch<'a>(
        &self,
        pages: &'a [PageRecord],
        keywords: &'a [Keyword],
        total: usize,
        worker_threads: usize,
        barrier: &CompletionBarrier,
        grouped: &mut [Vec<MatchRecord<'a>>],
    ) -> Result<()> {
        let deadline = self.config.timeout.map(|timeout| Instant::now() + timeout);
        let capacity = self.config.effective_queue_capacity(keywords.len());
        let interval = self.config.progress_interval;
        let observer = self.observer.as_ref();

        log::debug!(
            "Dispatching {total} tasks ({} pages x {} keywords) to {worker_threads} workers",
            pages.len(),
            keywords.len()
        );

        // Internal stop flag for deadlines; the caller's token stays untouched.
        let stop = CancellationToken::new();
        let stop = &stop;
        let cancel = &self.cancel_token;
        let expired = move || deadline.is_some_and(|deadline| Instant::now() >= deadline);
        let halted = move || stop.is_cancelled() || cancel.is_cancelled() || expired();

        let mut timed_out = false;

        thread::scope(|scope| -> Result<()> {
            let (task_tx, task_rx) = bounded::<MatchTask<'a>>(capacity);
            let (result_tx, result_rx) = unbounded::<TaskResult<'a>>();

            let mut workers = Vec::with_capacity(worker_threads);
            for i in 0..worker_threads {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let worker = thread::Builder::new()
                    .name(format!("parallel-match-{i}"))
                    .spawn_scoped(scope, move || {
                        for task in task_rx.iter() {
                            // keep draining so the producer never blocks on a full queue
                            if halted() {
                                continue;
                            }
                            if result_tx.send(task.run()).is_err() {
                                break;
                            }
                        }
                    })
                    .map_err(|e| SiteScoreError::internal(format!("Failed to spawn worker: {e}")))?;
                workers.push(worker);
            }
            drop(task_rx);
            drop(result_tx);

            let producer = thread::Builder::new()
                .name("parallel-match-producer".to_string())
                .spawn_scoped(scope, move || {
                    for (keyword_index, keyword) in keywords.iter().enumerate() {
                        for page in pages {
                            if halted() {
                                return;
                            }
                            barrier.add();
                            if task_tx
                                .send(MatchTask::new(keyword_index, keyword, page))
                                .is_err()
                            {
                                return;
                            }
                        }
                    }
                    barrier.seal();
                })
                .map_err(|e| SiteScoreError::internal(format!("Failed to spawn producer: {e}")))?;

            loop {
                let next = match deadline {
                    Some(deadline) => result_rx.recv_deadline(deadline),
                    None => result_rx
                        .recv()
                        .map_err(|_| RecvTimeoutError::Disconnected),
                };

                match next {
                    Ok(result) => {
                        grouped[result.keyword_index].push(result.record);
                        barrier.done();

                        let completed = barrier.completed();
                        if interval > 0 && completed % interval == 0 {
                            observer.on_progress(completed, total);
                        }
                        if barrier.is_complete() {
                            break;
                        }
                        // recv_deadline keeps yielding ready results past the deadline
                        if expired() {
                            stop.cancel();
                            timed_out = true;
                            break;
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {
                        stop.cancel();
                        timed_out = true;
                        break;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            producer
                .join()
                .map_err(|_| SiteScoreError::ThreadJoinError("producer panicked".to_string()))?;
            for worker in workers {
                worker
                    .join()
                    .map_err(|_| SiteScoreError::ThreadJoinError("worker panicked".to_string()))?;
            }

            Ok(())
        })?;

        if barrier.is_complete() {
            log::debug!("Dispatch complete: {} results", barrier.completed());
            return Ok(());
        }
        if timed_out || expired() {
            return Err(SiteScoreError::timeout(format!(
                "dispatch deadline exceeded with {} of {total} tasks collected",
                barrier.completed()
            )));
        }
        if cancel.is_cancelled() {
            return Err(SiteScoreError::cancelled(format!(
                "dispatch cancelled with {} of {total} tasks collected",
                barrier.completed()
            )));
        }
        Err(SiteScoreError::internal(format!(
            "dispatch ended with {} tasks pending",
            barrier.pending()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;

    fn keywords(words: &[&str]) -> Vec<Keyword> {
        words.iter().map(|w| Keyword::new(w).unwrap()).collect()
    }

    fn pages(count: usize) -> Vec<PageRecord> {
        (0..count)
            .map(|i| {
                PageRecord::new(format!("https://example.com/{i}"))
                    .with_quote_count(i as u32)
                    .with_title(format!("page {i} shoes"))
            })
            .collect()
    }

    #[test]
    fn test_every_pair_is_scored() {
        let engine = ParallelMatchEngine::new(ParallelMatchConfig::default().with_worker_threads(4));
        let pages = pages(25);
        let keywords = keywords(&["shoes", "boots", "socks"]);

        let detail = engine.detail_match(&pages, &keywords).unwrap();

        assert_eq!(detail.records.len(), 3);
        for keyword in ["shoes", "boots", "socks"] {
            let records = &detail.records[keyword];
            assert_eq!(records.len(), 25, "keyword {keyword}");

            let mut urls: Vec<&str> = records.iter().map(|r| r.url()).collect();
            urls.sort();
            urls.dedup();
            assert_eq!(urls.len(), 25);
        }
        assert!(detail.records["shoes"].iter().all(|r| r.title.is_full_match()));
        assert!(detail.records["boots"].iter().all(|r| !r.title.is_full_match()));

        assert_eq!(detail.stats.tasks_dispatched, 75);
        assert_eq!(detail.stats.tasks_completed, 75);
        assert_eq!(detail.stats.worker_threads, 4);
        assert!(!detail.stats.truncated());
    }

    #[test]
    fn test_task_ceiling_truncates_page_tail() {
        let config = ParallelMatchConfig::default()
            .with_worker_threads(2)
            .with_max_total_tasks(10);
        let engine = ParallelMatchEngine::new(config);
        let pages = pages(8);
        let keywords = keywords(&["shoes", "boots", "socks"]);

        let detail = engine.detail_match(&pages, &keywords).unwrap();

        // 10 / 3 = 3 pages
        assert_eq!(detail.stats.dispatched_pages, 3);
        assert!(detail.stats.truncated());
        for records in detail.records.values() {
            let mut urls: Vec<&str> = records.iter().map(|r| r.url()).collect();
            urls.sort();
            assert_eq!(
                urls,
                vec![
                    "https://example.com/0",
                    "https://example.com/1",
                    "https://example.com/2"
                ]
            );
        }
    }

    #[test]
    fn test_ceiling_below_keyword_count_keeps_every_keyword() {
        let config = ParallelMatchConfig::default().with_max_total_tasks(1);
        let engine = ParallelMatchEngine::new(config);
        let pages = pages(3);
        let keywords = keywords(&["a", "b"]);

        let detail = engine.detail_match(&pages, &keywords).unwrap();
        assert_eq!(detail.records.len(), 2);
        assert!(detail.records.values().all(|r| r.is_empty()));
        assert_eq!(detail.stats.tasks_dispatched, 0);
    }

    #[test]
    fn test_no_keywords() {
        let engine = ParallelMatchEngine::new(ParallelMatchConfig::default());
        let pages = pages(3);
        let detail = engine.detail_match(&pages, &[]).unwrap();
        assert!(detail.records.is_empty());
    }

    #[test]
    fn test_empty_site_is_rejected() {
        let engine = ParallelMatchEngine::new(ParallelMatchConfig::default());
        let keywords = keywords(&["shoes"]);
        let err = engine.detail_match(&[], &keywords).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_duplicate_keywords_are_rejected() {
        let engine = ParallelMatchEngine::new(ParallelMatchConfig::default());
        let pages = pages(1);
        let keywords = keywords(&["shoes", "shoes"]);
        let err = engine.detail_match(&pages, &keywords).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let engine =
            ParallelMatchEngine::new(ParallelMatchConfig::default()).with_cancellation_token(token);
        let pages = pages(4);
        let keywords = keywords(&["shoes"]);

        let err = engine.detail_match(&pages, &keywords).unwrap_err();
        assert!(matches!(err, SiteScoreError::OperationCancelled(_)));
    }

    struct CancelAfter {
        after: usize,
        token: CancellationToken,
    }

    impl ProgressObserver for CancelAfter {
        fn on_progress(&self, completed: usize, _total: usize) {
            if completed >= self.after {
                self.token.cancel();
            }
        }
    }

    #[test]
    fn test_cancelled_mid_dispatch() {
        let token = CancellationToken::new();
        let config = ParallelMatchConfig::default()
            .with_worker_threads(1)
            .with_queue_capacity(1)
            .with_progress_interval(1);
        let engine = ParallelMatchEngine::new(config)
            .with_cancellation_token(token.clone())
            .with_observer(Arc::new(CancelAfter { after: 5, token }));
        let pages = pages(5000);
        let keywords = keywords(&["shoes", "boots"]);

        let err = engine.detail_match(&pages, &keywords).unwrap_err();
        assert!(matches!(err, SiteScoreError::OperationCancelled(_)));
    }

    struct SlowProgress(Duration);

    impl ProgressObserver for SlowProgress {
        fn on_progress(&self, _completed: usize, _total: usize) {
            thread::sleep(self.0);
        }
    }

    #[test]
    fn test_deadline_exceeded_while_results_keep_arriving() {
        let config = ParallelMatchConfig::default()
            .with_worker_threads(4)
            .with_progress_interval(1)
            .with_timeout(Duration::from_millis(20));
        let engine = ParallelMatchEngine::new(config)
            .with_observer(Arc::new(SlowProgress(Duration::from_millis(5))));
        let pages = pages(200);
        let keywords = keywords(&["shoes"]);

        let start = Instant::now();
        let err = engine.detail_match(&pages, &keywords).unwrap_err();
        assert!(matches!(err, SiteScoreError::Timeout(_)), "{err:?}");
        // 200 results at 5ms each would take a full second
        assert!(start.elapsed() < Duration::from_millis(500), "{:?}", start.elapsed());
        assert!(!engine.cancellation_token().is_cancelled());
    }

    #[test]
    fn test_zero_deadline_times_out() {
        let config = ParallelMatchConfig::default()
            .with_worker_threads(1)
            .with_timeout(Duration::ZERO);
        let engine = ParallelMatchEngine::new(config);
        let pages = pages(100);
        let keywords = keywords(&["shoes"]);

        let err = engine.detail_match(&pages, &keywords).unwrap_err();
        assert!(matches!(err, SiteScoreError::Timeout(_)));
    }

    struct Recording(Mutex<Vec<(usize, usize)>>);

    impl ProgressObserver for Recording {
        fn on_progress(&self, completed: usize, total: usize) {
            self.0.lock().unwrap().push((completed, total));
        }
    }

    #[test]
    fn test_progress_hook() {
        let recording = Arc::new(Recording(Mutex::new(Vec::new())));
        let config = ParallelMatchConfig::default()
            .with_worker_threads(3)
            .with_progress_interval(10);
        let engine = ParallelMatchEngine::new(config).with_observer(recording.clone());
        let pages = pages(20);
        let keywords = keywords(&["shoes", "boots"]);

        engine.detail_match(&pages, &keywords).unwrap();

        let calls = recording.0.lock().unwrap().clone();
        assert_eq!(calls, vec![(10, 40), (20, 40), (30, 40), (40, 40)]);
    }
}
