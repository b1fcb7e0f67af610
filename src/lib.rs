//! # sitescore
//!
//! Keyword relevance scoring over a crawled site's link graph.
//!
//! ## Features
//!
//! - Grapheme-aware fuzzy matching of keywords against page fields
//! - Windowed anchor-text selection from crawler histograms
//! - Parallel page x keyword dispatch with a task ceiling, cancellation and deadlines
//! - Order-independent aggregation into a composite score per keyword
//! - Home page match classification

pub mod aggregation;
pub mod cli;
pub mod error;
pub mod matching;
pub mod parallel_match;
pub mod site;
pub mod site_match;

pub mod prelude {
    pub use crate::aggregation::{HomePageMatchType, KeywordScore};
    pub use crate::error::{Result, SiteScoreError};
    pub use crate::matching::{FieldMatch, Keyword, MatchRecord};
    pub use crate::parallel_match::{CancellationToken, ParallelMatchConfig, ProgressObserver};
    pub use crate::site::{PageRecord, PageType, SiteInfo};
    pub use crate::site_match::{MatchConfig, SiteMatcher, match_site};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
