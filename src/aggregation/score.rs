//! Per-keyword score accumulation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::matching::{FieldMatch, MatchRecord};

/// Page fields in bonus priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    AnchorText,
    Title,
    Heading,
    Body,
}

impl MatchField {
    /// Fields in the order the flat bonus is awarded.
    pub const PRIORITY: [MatchField; 4] = [
        MatchField::AnchorText,
        MatchField::Title,
        MatchField::Heading,
        MatchField::Body,
    ];

    /// Multiplier of the flat bonus for a full match.
    pub fn weight(self) -> f64 {
        match self {
            MatchField::AnchorText => 4.0,
            MatchField::Title => 3.0,
            MatchField::Heading => 2.0,
            MatchField::Body => 1.0,
        }
    }

    /// Exponent applied to `rate / 2` for partial matches.
    pub fn exponent(self) -> i32 {
        match self {
            MatchField::AnchorText => 1,
            MatchField::Title => 2,
            MatchField::Heading => 3,
            MatchField::Body => 5,
        }
    }

    /// This field's match in `record`.
    pub fn of(self, record: &MatchRecord<'_>) -> FieldMatch {
        match self {
            MatchField::AnchorText => record.anchor_text,
            MatchField::Title => record.title,
            MatchField::Heading => record.heading,
            MatchField::Body => record.body,
        }
    }
}

/// How well the home page title matches a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HomePageMatchType {
    /// The title contains the keyword verbatim.
    Full,
    /// Some keyword units occur in the title.
    Partial,
    /// No match, or no home page was scored.
    #[default]
    None,
}

impl HomePageMatchType {
    /// Classify a title match.
    pub fn classify(title: FieldMatch) -> Self {
        if title.is_full_match() {
            HomePageMatchType::Full
        } else if title.rate() > 0.0 {
            HomePageMatchType::Partial
        } else {
            HomePageMatchType::None
        }
    }

    fn rank(self) -> u8 {
        match self {
            HomePageMatchType::Full => 2,
            HomePageMatchType::Partial => 1,
            HomePageMatchType::None => 0,
        }
    }
}

/// Title match of one home page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HomePageMatch {
    /// URL of the home page.
    pub url: String,

    /// Title match rate.
    pub rate: f64,

    /// Title match classification.
    pub match_type: HomePageMatchType,
}

impl HomePageMatch {
    /// Home page match carried by `record`.
    pub fn from_record(record: &MatchRecord<'_>) -> Self {
        Self {
            url: record.url().to_string(),
            rate: record.title.rate(),
            match_type: HomePageMatchType::classify(record.title),
        }
    }

    /// Ordering used when a site reports several home pages: the better
    /// classification wins, then the higher rate, then the smaller URL.
    pub fn preference(&self, other: &Self) -> Ordering {
        self.match_type
            .rank()
            .cmp(&other.match_type.rank())
            .then_with(|| self.rate.total_cmp(&other.rate))
            .then_with(|| other.url.cmp(&self.url))
    }
}

/// Aggregate relevance of a site for one keyword.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    /// Records folded in.
    pub records: usize,

    /// Pages whose title fully matches.
    pub title_match_count: usize,

    /// Pages whose heading fully matches.
    pub heading_match_count: usize,

    /// Pages whose body fully matches.
    pub content_match_count: usize,

    /// Pages whose selected anchor text fully matches.
    pub anchor_text_match_count: usize,

    /// Highest body match rate seen.
    pub max_content_match_rate: f64,

    /// Composite ranking score.
    pub match_index: f64,

    /// Preferred home page match, if a home page was scored.
    pub home_page: Option<HomePageMatch>,
}

impl KeywordScore {
    /// Create an empty score.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in.
    pub fn add(&mut self, record: &MatchRecord<'_>) {
        self.records += 1;

        if record.body.rate() > self.max_content_match_rate {
            self.max_content_match_rate = record.body.rate();
        }

        if record.page.is_home() {
            self.offer_home_page(HomePageMatch::from_record(record));
        }

        let quote_count = f64::from(record.quote_count);
        let mut bonus_awarded = false;

        for field in MatchField::PRIORITY {
            let field_match = field.of(record);
            if field_match.is_full_match() {
                *self.match_count_mut(field) += 1;
                if !bonus_awarded {
                    self.match_index += quote_count * field.weight();
                    bonus_awarded = true;
                }
            } else {
                self.match_index += quote_count * (field_match.rate() / 2.0).powi(field.exponent());
            }
        }
    }

    /// Combine two partial scores of the same keyword.
    pub fn merge(mut self, other: KeywordScore) -> KeywordScore {
        self.records += other.records;
        self.title_match_count += other.title_match_count;
        self.heading_match_count += other.heading_match_count;
        self.content_match_count += other.content_match_count;
        self.anchor_text_match_count += other.anchor_text_match_count;
        self.match_index += other.match_index;
        if other.max_content_match_rate > self.max_content_match_rate {
            self.max_content_match_rate = other.max_content_match_rate;
        }
        if let Some(home_page) = other.home_page {
            self.offer_home_page(home_page);
        }
        self
    }

    /// Full-match count of `field`.
    pub fn match_count(&self, field: MatchField) -> usize {
        match field {
            MatchField::AnchorText => self.anchor_text_match_count,
            MatchField::Title => self.title_match_count,
            MatchField::Heading => self.heading_match_count,
            MatchField::Body => self.content_match_count,
        }
    }

    /// Title match rate of the home page, 0 without one.
    pub fn home_page_match_rate(&self) -> f64 {
        self.home_page.as_ref().map(|h| h.rate).unwrap_or(0.0)
    }

    /// Home page classification, `None` without a home page.
    pub fn home_page_match_type(&self) -> HomePageMatchType {
        self.home_page
            .as_ref()
            .map(|h| h.match_type)
            .unwrap_or_default()
    }

    fn match_count_mut(&mut self, field: MatchField) -> &mut usize {
        match field {
            MatchField::AnchorText => &mut self.anchor_text_match_count,
            MatchField::Title => &mut self.title_match_count,
            MatchField::Heading => &mut self.heading_match_count,
            MatchField::Body => &mut self.content_match_count,
        }
    }

    fn offer_home_page(&mut self, candidate: HomePageMatch) {
        let replace = match &self.home_page {
            Some(current) => candidate.preference(current) == Ordering::Greater,
            None => true,
        };
        if replace {
            if self.home_page.is_some() {
                log::debug!("Several home pages scored; preferring {}", candidate.url);
            }
            self.home_page = Some(candidate);
        }
    }
}
