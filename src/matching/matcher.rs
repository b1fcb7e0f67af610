//! Fuzzy keyword matcher.
//!
//! A keyword matches a text fully when the text contains it verbatim
//! (case-insensitive). Otherwise the keyword is split into extended grapheme
//! clusters (UAX #29) and the rate is the share of clusters that occur anywhere
//! in the text. Splitting on graphemes rather than bytes keeps CJK, accented
//! and emoji keywords intact.
//!
//! # Examples
//!
//! ```
//! use sitescore::matching::matcher::calculate_match_rate;
//!
//! let m = calculate_match_rate("shoe", "We sell shoes online").unwrap();
//! assert!(m.is_full_match());
//! assert_eq!(m.rate(), 1.0);
//!
//! let m = calculate_match_rate("xyz", "abc def").unwrap();
//! assert!(!m.is_full_match());
//! assert_eq!(m.rate(), 0.0);
//! ```

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::error::{Result, SiteScoreError};

/// Outcome of matching one keyword against one text field.
///
/// `full_match` is only ever set by verbatim containment and then the rate
/// is exactly 1.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldMatch {
    rate: f64,
    full_match: bool,
}

impl FieldMatch {
    /// The keyword occurs verbatim.
    pub fn full() -> Self {
        Self {
            rate: 1.0,
            full_match: true,
        }
    }

    /// Nothing matched.
    pub fn none() -> Self {
        Self::default()
    }

    /// `found` of `total` keyword units occur in the text.
    pub fn partial(found: usize, total: usize) -> Self {
        let rate = if total == 0 {
            0.0
        } else {
            (found.min(total) as f64) / (total as f64)
        };
        Self {
            rate,
            full_match: false,
        }
    }

    /// Match rate in `[0, 1]`.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Whether the keyword occurred verbatim.
    pub fn is_full_match(&self) -> bool {
        self.full_match
    }
}

/// A validated, lowercased keyword with its grapheme units precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keyword {
    original: String,
    normalized: String,
    units: Vec<String>,
    char_len: usize,
}

impl Keyword {
    /// Validate and normalize a keyword.
    pub fn new(keyword: &str) -> Result<Self> {
        if keyword.is_empty() {
            return Err(SiteScoreError::invalid_input("keyword must not be empty"));
        }

        let normalized = keyword.to_lowercase();
        let units = normalized.graphemes(true).map(str::to_string).collect();
        let char_len = keyword.chars().count();

        Ok(Self {
            original: keyword.to_string(),
            normalized,
            units,
            char_len,
        })
    }

    /// The keyword as given by the caller.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Length in chars, used for anchor-text windowing.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Grapheme units of the lowercased keyword.
    pub fn units(&self) -> &[String] {
        &self.units
    }

    /// Match this keyword against `text`.
    pub fn match_text(&self, text: &str) -> FieldMatch {
        let text = text.to_lowercase();
        if text.contains(self.normalized.as_str()) {
            return FieldMatch::full();
        }

        let found = self
            .units
            .iter()
            .filter(|unit| text.contains(unit.as_str()))
            .count();

        FieldMatch::partial(found, self.units.len())
    }
}

/// Match `keyword` against `text`.
///
/// Fails with `InvalidInput` when the keyword is empty.
pub fn calculate_match_rate(keyword: &str, text: &str) -> Result<FieldMatch> {
    Ok(Keyword::new(keyword)?.match_text(text))
}
