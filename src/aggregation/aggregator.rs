//! Folding match records into keyword scores.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::aggregation::score::KeywordScore;
use crate::matching::MatchRecord;

/// Record lists at least this long are folded in parallel.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Folds each keyword's records into a [`KeywordScore`].
///
/// Scores do not depend on record order, so large lists are split across
/// the rayon pool and the partial scores merged.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator {
    parallel_threshold: usize,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self {
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl Aggregator {
    /// Create an aggregator with the default parallel threshold.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold lists of at least `threshold` records in parallel.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    /// Score one keyword's records.
    pub fn aggregate(&self, records: &[MatchRecord<'_>]) -> KeywordScore {
        if records.len() < self.parallel_threshold {
            let mut score = KeywordScore::new();
            for record in records {
                score.add(record);
            }
            return score;
        }

        records
            .par_iter()
            .fold(KeywordScore::new, |mut score, record| {
                score.add(record);
                score
            })
            .reduce(KeywordScore::new, KeywordScore::merge)
    }

    /// Score every keyword, consuming the records.
    pub fn aggregate_all(
        &self,
        grouped: HashMap<String, Vec<MatchRecord<'_>>>,
    ) -> HashMap<String, KeywordScore> {
        grouped
            .into_par_iter()
            .map(|(keyword, records)| {
                let score = self.aggregate(&records);
                (keyword, score)
            })
            .collect()
    }
}
