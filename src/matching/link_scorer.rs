//! Per-(page, keyword) scoring.

use serde::Serialize;

use crate::error::Result;
use crate::matching::matcher::{FieldMatch, Keyword};
use crate::site::PageRecord;

/// Anchor-text variants at least this many chars longer than the keyword are
/// ignored.
pub const ANCHOR_TEXT_WINDOW: usize = 30;

/// Match outcome of one keyword against one page.
///
/// Borrows the page it was computed from; records live only until the
/// aggregator has folded them.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MatchRecord<'a> {
    /// Title match.
    pub title: FieldMatch,

    /// Heading match.
    pub heading: FieldMatch,

    /// Body text match.
    pub body: FieldMatch,

    /// Selected anchor-text match.
    pub anchor_text: FieldMatch,

    /// Inbound-reference count of the page.
    pub quote_count: u32,

    /// The scored page.
    #[serde(skip)]
    pub page: &'a PageRecord,
}

impl<'a> MatchRecord<'a> {
    /// URL of the scored page.
    pub fn url(&self) -> &'a str {
        &self.page.url
    }
}

/// Pick the anchor text to score `keyword` against.
///
/// Only variants whose char length `l` satisfies
/// `keyword_len <= l < keyword_len + ANCHOR_TEXT_WINDOW` qualify; the most
/// frequent one wins and ties go to the first variant in map order. Pages
/// without a histogram fall back to their single `href_text`.
pub fn select_anchor_text<'a>(page: &'a PageRecord, keyword: &Keyword) -> &'a str {
    if page.anchor_texts.is_empty() {
        return page.href_text.as_deref().unwrap_or("");
    }

    let min_len = keyword.char_len();
    let max_len = min_len + ANCHOR_TEXT_WINDOW;

    let mut best: Option<(&str, u32)> = None;
    for (text, &count) in &page.anchor_texts {
        let len = text.chars().count();
        if len < min_len || len >= max_len {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((text.as_str(), count)),
        }
    }

    best.map(|(text, _)| text).unwrap_or("")
}

/// Score one page against an already validated keyword.
pub fn score_page<'a>(page: &'a PageRecord, keyword: &Keyword) -> MatchRecord<'a> {
    let title = page.title.as_deref().unwrap_or("");
    let anchor_text = select_anchor_text(page, keyword);

    MatchRecord {
        title: keyword.match_text(title),
        heading: keyword.match_text(&page.heading),
        body: keyword.match_text(&page.body),
        anchor_text: keyword.match_text(anchor_text),
        quote_count: page.quote_count,
        page,
    }
}

/// Score one page against a raw keyword string.
pub fn score_link<'a>(page: &'a PageRecord, keyword: &str) -> Result<MatchRecord<'a>> {
    let keyword = Keyword::new(keyword)?;
    Ok(score_page(page, &keyword))
}
