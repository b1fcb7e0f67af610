//! Task definitions for parallel match dispatch.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::matching::{Keyword, MatchRecord, score_page};
use crate::site::PageRecord;

/// One (page, keyword) pair to score.
#[derive(Debug, Clone, Copy)]
pub struct MatchTask<'a> {
    /// Position of the keyword in the dispatch's keyword list.
    pub keyword_index: usize,

    /// The validated keyword.
    pub keyword: &'a Keyword,

    /// The page to score.
    pub page: &'a PageRecord,
}

impl<'a> MatchTask<'a> {
    /// Create a new match task.
    pub fn new(keyword_index: usize, keyword: &'a Keyword, page: &'a PageRecord) -> Self {
        Self {
            keyword_index,
            keyword,
            page,
        }
    }

    /// Score the page.
    pub fn run(self) -> TaskResult<'a> {
        TaskResult {
            keyword_index: self.keyword_index,
            record: score_page(self.page, self.keyword),
        }
    }
}

/// Result of executing a match task.
#[derive(Debug)]
pub struct TaskResult<'a> {
    /// Keyword the record belongs to.
    pub keyword_index: usize,

    /// Match record for the page.
    pub record: MatchRecord<'a>,
}

/// Shared flag asking a dispatch to stop.
///
/// Clones observe the same flag. Workers check it between tasks.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_run() {
        let keyword = Keyword::new("shoes").unwrap();
        let page = PageRecord::new("https://example.com/").with_title("Shoes");

        let result = MatchTask::new(2, &keyword, &page).run();
        assert_eq!(result.keyword_index, 2);
        assert!(result.record.title.is_full_match());
        assert_eq!(result.record.url(), "https://example.com/");
    }

    #[test]
    fn test_cancellation_token_is_shared() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();
        assert!(clone.is_cancelled());
    }
}
