//! Keyword matching against page fields.

pub mod link_scorer;
pub mod matcher;

pub use link_scorer::{MatchRecord, score_link, score_page, select_anchor_text};
pub use matcher::{FieldMatch, Keyword, calculate_match_rate};
