use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;
use crate::types::{SortKey, SortOrder};

#[derive(Parser, Debug, PartialEq)]
#[command(name = "hubsearch", version)]
#[command(about = "Search GitHub repositories from the terminal")]
pub struct CliArgs {
    /// Keyword to search for on startup
    pub keyword: Option<String>,

    /// Results per page (1-100, overrides config)
    #[arg(long)]
    pub per_page: Option<u8>,

    /// Sort order of results (overrides config)
    #[arg(long, value_enum)]
    pub sort: Option<SortKey>,

    /// Direction of the sort (overrides config)
    #[arg(long, value_enum)]
    pub order: Option<SortOrder>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl CliArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(per_page) = self.per_page {
            config.search.per_page = crate::config::clamp_per_page(per_page);
        }
        if let Some(sort) = self.sort {
            config.search.sort = sort;
        }
        if let Some(order) = self.order {
            config.search.order = order;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_args() {
        let args = CliArgs::parse_from(["hubsearch"]);
        assert_eq!(args.keyword, None);
        assert_eq!(args.per_page, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn parse_keyword_and_flags() {
        let args = CliArgs::parse_from([
            "hubsearch",
            "tui language:rust",
            "--per-page",
            "50",
            "--sort",
            "stars",
            "--order",
            "asc",
            "--log-file",
            "/tmp/hubsearch.log",
        ]);
        assert_eq!(args.keyword.as_deref(), Some("tui language:rust"));
        assert_eq!(args.per_page, Some(50));
        assert_eq!(args.sort, Some(SortKey::Stars));
        assert_eq!(args.order, Some(SortOrder::Asc));
        assert_eq!(args.log_file, Some(PathBuf::from("/tmp/hubsearch.log")));
    }

    #[test]
    fn unknown_sort_rejected() {
        assert!(CliArgs::try_parse_from(["hubsearch", "--sort", "popularity"]).is_err());
    }

    #[test]
    fn multi_word_sort_uses_config_spelling() {
        let args = CliArgs::parse_from(["hubsearch", "--sort", "best-match", "--order", "desc"]);
        assert_eq!(args.sort, Some(SortKey::BestMatch));
        assert_eq!(args.order, Some(SortOrder::Desc));
        assert!(CliArgs::try_parse_from(["hubsearch", "--sort", "best_match"]).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let mut config = Config::default();
        let args = CliArgs::parse_from(["hubsearch", "--per-page", "200", "--sort", "updated"]);
        args.apply(&mut config);
        assert_eq!(config.search.per_page, 100);
        assert_eq!(config.search.sort, SortKey::Updated);
        assert_eq!(config.search.order, SortOrder::Desc);
    }
}
