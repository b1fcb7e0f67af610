//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::aggregation::{HomePageMatchType, KeywordScore};
use crate::cli::args::{OutputFormat, SiteScoreArgs};
use crate::error::Result;
use crate::matching::MatchRecord;

/// One keyword's score, flattened for output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordScoreRow {
    pub keyword: String,
    pub match_index: f64,
    pub title_match_count: usize,
    pub heading_match_count: usize,
    pub content_match_count: usize,
    pub anchor_text_match_count: usize,
    pub max_content_match_rate: f64,
    pub home_page_match_rate: f64,
    pub home_page_match_type: HomePageMatchType,
}

impl KeywordScoreRow {
    /// Flatten a keyword score.
    pub fn new(keyword: &str, score: &KeywordScore) -> Self {
        Self {
            keyword: keyword.to_string(),
            match_index: score.match_index,
            title_match_count: score.title_match_count,
            heading_match_count: score.heading_match_count,
            content_match_count: score.content_match_count,
            anchor_text_match_count: score.anchor_text_match_count,
            max_content_match_rate: score.max_content_match_rate,
            home_page_match_rate: score.home_page_match_rate(),
            home_page_match_type: score.home_page_match_type(),
        }
    }
}

/// One (page, keyword) match record, flattened for output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecordRow {
    pub keyword: String,
    pub url: String,
    pub quote_count: u32,
    pub title_rate: f64,
    pub title_full_match: bool,
    pub heading_rate: f64,
    pub heading_full_match: bool,
    pub content_rate: f64,
    pub content_full_match: bool,
    pub anchor_text_rate: f64,
    pub anchor_text_full_match: bool,
}

impl MatchRecordRow {
    /// Flatten a match record.
    pub fn new(keyword: &str, record: &MatchRecord<'_>) -> Self {
        Self {
            keyword: keyword.to_string(),
            url: record.url().to_string(),
            quote_count: record.quote_count,
            title_rate: record.title.rate(),
            title_full_match: record.title.is_full_match(),
            heading_rate: record.heading.rate(),
            heading_full_match: record.heading.is_full_match(),
            content_rate: record.body.rate(),
            content_full_match: record.body.is_full_match(),
            anchor_text_rate: record.anchor_text.rate(),
            anchor_text_full_match: record.anchor_text.is_full_match(),
        }
    }
}

/// Output rows in the format selected on the command line.
pub fn output_rows<T: Serialize>(message: &str, rows: &[T], args: &SiteScoreArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, rows, args),
        OutputFormat::Json => output_json(rows, args),
        OutputFormat::Csv => output_csv(rows, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, rows: &[T], args: &SiteScoreArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!("═══════════════");
    }

    for (i, row) in rows.iter().enumerate() {
        let value = serde_json::to_value(row)?;
        println!();
        println!("Result {}:", i + 1);
        println!("─────────────");
        if let serde_json::Value::Object(obj) = value {
            for (key, val) in obj {
                println!("{key}: {}", format_value(&val));
            }
        }
    }

    if args.verbosity() > 0 {
        println!();
        println!("Total: {}", rows.len());
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(rows: &[T], args: &SiteScoreArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(rows)?
    } else {
        serde_json::to_string(rows)?
    };

    println!("{json}");
    Ok(())
}

/// Output in CSV format.
fn output_csv<T: Serialize>(rows: &[T], _args: &SiteScoreArgs) -> Result<()> {
    for (i, row) in rows.iter().enumerate() {
        let value = serde_json::to_value(row)?;
        if let Some(obj) = value.as_object() {
            if i == 0 {
                let headers: Vec<&str> = obj.keys().map(String::as_str).collect();
                println!("{}", headers.join(","));
            }
            let values: Vec<String> = obj.values().map(format_csv_value).collect();
            println!("{}", values.join(","));
        }
    }
    Ok(())
}

/// Format a JSON value for human output.
pub fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => format!("{f:.4}"),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Format a JSON value as a CSV cell.
pub fn format_csv_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
