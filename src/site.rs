//! Site aggregate produced by the crawler.
//!
//! The crawler fills these records (including the anchor-text histogram)
//! before scoring starts; nothing in this crate mutates them.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiteScoreError};

/// Role of a page within its site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    /// The site's root/entry page.
    Home,
    /// Any other page.
    #[default]
    Other,
}

/// One crawled page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageRecord {
    /// Absolute URL of the page.
    pub url: String,

    /// Page role.
    pub page_type: PageType,

    /// Number of links pointing at this page.
    pub quote_count: u32,

    /// `<title>`, if the page had one.
    pub title: Option<String>,

    /// Heading text (h1).
    pub heading: String,

    /// Extracted body text.
    pub body: String,

    /// Anchor-text variant -> occurrence count, for links pointing here.
    pub anchor_texts: BTreeMap<String, u32>,

    /// Single anchor text recorded by crawlers that do not build a histogram.
    pub href_text: Option<String>,
}

impl PageRecord {
    /// Create a page of type [`PageType::Other`] with no content.
    pub fn new<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the page type.
    pub fn with_page_type(mut self, page_type: PageType) -> Self {
        self.page_type = page_type;
        self
    }

    /// Set the inbound-reference count.
    pub fn with_quote_count(mut self, quote_count: u32) -> Self {
        self.quote_count = quote_count;
        self
    }

    /// Set the title.
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the heading text.
    pub fn with_heading<S: Into<String>>(mut self, heading: S) -> Self {
        self.heading = heading.into();
        self
    }

    /// Set the body text.
    pub fn with_body<S: Into<String>>(mut self, body: S) -> Self {
        self.body = body.into();
        self
    }

    /// Record `count` more occurrences of an anchor-text variant.
    pub fn with_anchor_text<S: Into<String>>(mut self, text: S, count: u32) -> Self {
        *self.anchor_texts.entry(text.into()).or_insert(0) += count;
        self
    }

    /// Set the single fallback anchor text.
    pub fn with_href_text<S: Into<String>>(mut self, text: S) -> Self {
        self.href_text = Some(text.into());
        self
    }

    /// Whether this is the site's home page.
    pub fn is_home(&self) -> bool {
        self.page_type == PageType::Home
    }
}

/// All crawled pages of one site, in crawl order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteInfo {
    /// Root URL of the site.
    #[serde(default)]
    pub root_url: Option<String>,

    /// Crawled pages. Order matters for task-volume truncation.
    pub pages: Vec<PageRecord>,
}

impl SiteInfo {
    /// Create a site from its pages.
    pub fn new(pages: Vec<PageRecord>) -> Self {
        Self {
            root_url: None,
            pages,
        }
    }

    /// Load a site aggregate from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let site: SiteInfo = serde_json::from_str(&content)?;
        Ok(site)
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the site has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Fail fast on a site with nothing to score.
    pub fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            return Err(SiteScoreError::invalid_input("site has no pages"));
        }
        Ok(())
    }
}
