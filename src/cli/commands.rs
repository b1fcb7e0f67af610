//! Command implementations for the sitescore CLI.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::error::Result;
use crate::parallel_match::LogProgress;
use crate::site::SiteInfo;
use crate::site_match::{MatchConfig, SiteMatcher, prepare_keywords};

/// Execute a CLI command.
pub fn execute_command(args: SiteScoreArgs) -> Result<()> {
    match &args.command {
        Command::Match(match_args) => match_keywords(match_args.clone(), &args),
        Command::Detail(detail_args) => show_detail(detail_args.clone(), &args),
    }
}

/// Read a keyword file: one keyword per line, `#` starts a comment line.
pub fn load_keywords<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let content = fs::read_to_string(path.as_ref())?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Build the matcher configuration from the config file and flag overrides.
pub fn build_config(engine: &EngineArgs) -> Result<MatchConfig> {
    let mut config = match &engine.config {
        Some(path) => MatchConfig::from_json_file(path)?,
        None => MatchConfig::default(),
    };

    if let Some(threads) = engine.threads {
        config.parallel.worker_threads = Some(threads);
    }
    if let Some(max_tasks) = engine.max_tasks {
        config.parallel.max_total_tasks = max_tasks;
    }
    if let Some(secs) = engine.timeout_secs {
        config.parallel.timeout = Some(Duration::from_secs(secs));
    }

    config.parallel.validate()?;
    Ok(config)
}

fn build_matcher(engine: &EngineArgs) -> Result<SiteMatcher> {
    let config = build_config(engine)?;
    Ok(SiteMatcher::new(config).with_observer(Arc::new(LogProgress)))
}

/// Score a site against a keyword file.
fn match_keywords(args: MatchArgs, cli_args: &SiteScoreArgs) -> Result<()> {
    log::info!("Loading site from {}", args.site_file.display());
    let site = SiteInfo::from_json_file(&args.site_file)?;
    let keywords = load_keywords(&args.keywords_file)?;
    log::info!("Scoring {} pages against {} keywords", site.len(), keywords.len());

    let matcher = build_matcher(&args.engine)?;
    let result = matcher.score(&site, &keywords)?;
    log::info!(
        "Scored {} tasks in {:?} on {} workers",
        result.stats.tasks_completed,
        result.stats.elapsed,
        result.stats.worker_threads
    );

    // report in keyword file order
    let rows: Vec<KeywordScoreRow> = prepare_keywords(&keywords)?
        .iter()
        .filter_map(|keyword| {
            result
                .scores
                .get(keyword.as_str())
                .map(|score| KeywordScoreRow::new(keyword.as_str(), score))
        })
        .collect();

    output_rows("Keyword scores", &rows, cli_args)
}

/// Show per-page match records for the given keywords.
fn show_detail(args: DetailArgs, cli_args: &SiteScoreArgs) -> Result<()> {
    let site = SiteInfo::from_json_file(&args.site_file)?;
    let keywords = prepare_keywords(&args.keywords)?;

    let matcher = build_matcher(&args.engine)?;
    let detail = matcher.detail_match(&site, &keywords)?;

    let mut rows = Vec::new();
    for keyword in &keywords {
        let Some(records) = detail.records.get(keyword.as_str()) else {
            continue;
        };
        let mut keyword_rows: Vec<MatchRecordRow> = records
            .iter()
            .map(|record| MatchRecordRow::new(keyword.as_str(), record))
            .collect();
        keyword_rows.sort_by(|a, b| a.url.cmp(&b.url));
        if let Some(limit) = args.limit {
            keyword_rows.truncate(limit);
        }
        rows.extend(keyword_rows);
    }

    output_rows("Match records", &rows, cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_keywords_skips_blank_and_comment_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# target keywords").unwrap();
        writeln!(file, "running shoes").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  boots  ").unwrap();

        let keywords = load_keywords(file.path()).unwrap();
        assert_eq!(keywords, vec!["running shoes".to_string(), "boots".to_string()]);
    }

    #[test]
    fn test_build_config_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"parallel": {{"worker_threads": 2, "max_total_tasks": 50}}}}"#).unwrap();

        let engine = EngineArgs {
            config: Some(file.path().to_path_buf()),
            threads: Some(6),
            max_tasks: None,
            timeout_secs: Some(3),
        };
        let config = build_config(&engine).unwrap();
        assert_eq!(config.parallel.worker_threads, Some(6));
        assert_eq!(config.parallel.max_total_tasks, 50);
        assert_eq!(config.parallel.timeout, Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_build_config_rejects_zero_task_ceiling() {
        let engine = EngineArgs {
            max_tasks: Some(0),
            ..Default::default()
        };
        let err = build_config(&engine).unwrap_err();
        assert!(matches!(err, crate::error::SiteScoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_missing_keyword_file() {
        let err = load_keywords("/nonexistent/keywords.txt").unwrap_err();
        assert!(matches!(err, crate::error::SiteScoreError::Io(_)));
    }
}
