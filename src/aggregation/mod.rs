//! Aggregation of match records into per-keyword scores.

pub mod aggregator;
pub mod score;

pub use aggregator::Aggregator;
pub use score::{HomePageMatch, HomePageMatchType, KeywordScore, MatchField};
