//! Scoring a whole site against a keyword list.
//!
//! # Examples
//!
//! ```
//! use sitescore::site::{PageRecord, PageType, SiteInfo};
//! use sitescore::site_match::{MatchConfig, match_site};
//! use sitescore::aggregation::HomePageMatchType;
//!
//! let site = SiteInfo::new(vec![
//!     PageRecord::new("https://shop.example/")
//!         .with_page_type(PageType::Home)
//!         .with_quote_count(3)
//!         .with_title("Shoes for everyone"),
//! ]);
//!
//! let scores = match_site(&site, &["shoes".to_string()], &MatchConfig::default()).unwrap();
//! assert_eq!(scores["shoes"].home_page_match_type(), HomePageMatchType::Full);
//! assert_eq!(scores["shoes"].match_index, 9.0);
//! ```

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregation::{Aggregator, KeywordScore};
use crate::error::{Result, SiteScoreError};
use crate::matching::Keyword;
use crate::parallel_match::{
    CancellationToken, DetailMatch, DispatchStats, NoopProgress, ParallelMatchConfig,
    ParallelMatchEngine, ProgressObserver,
};
use crate::site::SiteInfo;

/// Configuration for [`SiteMatcher`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Dispatch engine settings.
    pub parallel: ParallelMatchConfig,

    /// Record count from which a keyword's records are folded in parallel.
    pub aggregate_parallel_threshold: Option<usize>,
}

impl MatchConfig {
    /// Load a configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: MatchConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Set the dispatch engine settings.
    pub fn with_parallel(mut self, parallel: ParallelMatchConfig) -> Self {
        self.parallel = parallel;
        self
    }

    fn aggregator(&self) -> Aggregator {
        match self.aggregate_parallel_threshold {
            Some(threshold) => Aggregator::new().with_parallel_threshold(threshold),
            None => Aggregator::new(),
        }
    }
}

/// Keyword scores of one site, with dispatch statistics.
#[derive(Debug, Clone)]
pub struct SiteScores {
    /// Keyword -> score. Every requested keyword is present.
    pub scores: HashMap<String, KeywordScore>,

    /// How the dispatch went.
    pub stats: DispatchStats,
}

/// Validate keywords and drop repeats, keeping first occurrences in order.
pub fn prepare_keywords(keywords: &[String]) -> Result<Vec<Keyword>> {
    let mut seen = HashSet::with_capacity(keywords.len());
    let mut prepared = Vec::with_capacity(keywords.len());

    for keyword in keywords {
        if !seen.insert(keyword.as_str()) {
            log::debug!("Skipping duplicate keyword {keyword:?}");
            continue;
        }
        prepared.push(Keyword::new(keyword)?);
    }

    Ok(prepared)
}

/// Runs the dispatch engine and the aggregator over a site.
pub struct SiteMatcher {
    config: MatchConfig,
    observer: Arc<dyn ProgressObserver>,
    cancel_token: CancellationToken,
}

impl SiteMatcher {
    /// Create a matcher.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            config,
            observer: Arc::new(NoopProgress),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Report dispatch progress to `observer`.
    pub fn with_observer(mut self, observer: Arc<dyn ProgressObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Abort when `token` is cancelled.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Matcher configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    fn engine(&self) -> ParallelMatchEngine {
        ParallelMatchEngine::new(self.config.parallel.clone())
            .with_observer(Arc::clone(&self.observer))
            .with_cancellation_token(self.cancel_token.clone())
    }

    /// Per-page match records for each keyword, without aggregation.
    pub fn detail_match<'a>(
        &self,
        site: &'a SiteInfo,
        keywords: &'a [Keyword],
    ) -> Result<DetailMatch<'a>> {
        site.validate()?;
        self.engine().detail_match(&site.pages, keywords)
    }

    /// Score `site` against `keywords`.
    ///
    /// An empty keyword list yields an empty map.
    pub fn score(&self, site: &SiteInfo, keywords: &[String]) -> Result<SiteScores> {
        site.validate()?;
        let keywords = prepare_keywords(keywords)?;
        if keywords.is_empty() {
            return Ok(SiteScores {
                scores: HashMap::new(),
                stats: DispatchStats {
                    input_pages: site.len(),
                    ..Default::default()
                },
            });
        }

        let detail = self.engine().detail_match(&site.pages, &keywords)?;
        if detail.stats.truncated() {
            log::warn!(
                "Only the first {} of {} pages were scored",
                detail.stats.dispatched_pages,
                detail.stats.input_pages
            );
        }

        let scores = self.config.aggregator().aggregate_all(detail.records);
        if scores.len() != keywords.len() {
            return Err(SiteScoreError::internal(format!(
                "expected {} keyword scores, got {}",
                keywords.len(),
                scores.len()
            )));
        }

        Ok(SiteScores {
            scores,
            stats: detail.stats,
        })
    }
}

/// Score `site` against `keywords` with a default matcher.
pub fn match_site(
    site: &SiteInfo,
    keywords: &[String],
    config: &MatchConfig,
) -> Result<HashMap<String, KeywordScore>> {
    let scores = SiteMatcher::new(config.clone()).score(site, keywords)?;
    Ok(scores.scores)
}
