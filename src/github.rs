use async_trait::async_trait;
use octocrab::Octocrab;

use crate::config::{clamp_per_page, GitHubConfig, SearchConfig};
use crate::error::{HubError, Result};
use crate::forge::Forge;
use crate::types::{PageCursor, Repository, ResultPage, SortKey, SortOrder};

/// GitHub only serves the first 1000 results of any search
const SEARCH_RESULT_LIMIT: u64 = 1000;

pub struct GitHub {
    client: Octocrab,
    per_page: u8,
    sort: SortKey,
    order: SortOrder,
}

impl std::fmt::Debug for GitHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHub")
            .field("per_page", &self.per_page)
            .field("sort", &self.sort)
            .finish_non_exhaustive()
    }
}

impl From<octocrab::Error> for HubError {
    fn from(err: octocrab::Error) -> Self {
        HubError::Api(err.to_string())
    }
}

impl GitHub {
    pub fn new(
        token: Option<String>,
        github: &GitHubConfig,
        search: &SearchConfig,
    ) -> Result<Self> {
        let mut builder = Octocrab::builder();
        if let Some(token) = token {
            builder = builder.personal_token(token);
        }
        if let Some(api_url) = &github.api_url {
            builder = builder
                .base_uri(api_url.as_str())
                .map_err(|e| HubError::Config(format!("invalid api_url {}: {}", api_url, e)))?;
        }
        let client = builder.build().map_err(|e| HubError::Auth(e.to_string()))?;

        Ok(Self {
            client,
            per_page: clamp_per_page(search.per_page),
            sort: search.sort,
            order: search.order,
        })
    }

    async fn search_page(&self, cursor: &PageCursor) -> Result<ResultPage> {
        tracing::debug!(
            keyword = %cursor.keyword,
            page = cursor.page,
            per_page = cursor.per_page,
            "searching repositories"
        );

        let mut query = self
            .client
            .search()
            .repositories(cursor.keyword.as_str())
            .per_page(cursor.per_page)
            .page(cursor.page);
        if let Some(sort) = self.sort.as_api_str() {
            query = query.sort(sort).order(self.order.as_api_str());
        }
        let page = query.send().await?;

        let total = clamp_total(page.total_count.unwrap_or(page.items.len() as u64));
        let items: Vec<Repository> = page
            .items
            .into_iter()
            .map(|repo| Repository {
                owner: repo
                    .owner
                    .map(|o| o.login)
                    .unwrap_or_else(|| "unknown".to_string()),
                name: repo.name,
                description: repo.description,
                url: repo.html_url.map(|u| u.to_string()).unwrap_or_default(),
                stars: repo.stargazers_count.unwrap_or(0),
                forks: repo.forks_count.unwrap_or(0),
                language: repo
                    .language
                    .and_then(|l| l.as_str().map(str::to_string)),
                updated_at: repo.updated_at.unwrap_or_else(chrono::Utc::now),
            })
            .collect();

        Ok(ResultPage {
            items,
            total,
            next: next_cursor(cursor, total),
        })
    }
}

fn clamp_total(total_count: u64) -> u64 {
    total_count.min(SEARCH_RESULT_LIMIT)
}

/// Cursor for the page after `cursor`, or None once `total` is covered.
fn next_cursor(cursor: &PageCursor, total: u64) -> Option<PageCursor> {
    let fetched = cursor.page as u64 * cursor.per_page as u64;
    if fetched >= total {
        return None;
    }
    Some(PageCursor {
        keyword: cursor.keyword.clone(),
        page: cursor.page + 1,
        per_page: cursor.per_page,
    })
}

#[async_trait]
impl Forge for GitHub {
    fn name(&self) -> &str {
        "GitHub"
    }

    fn search_url(&self, keyword: &str) -> String {
        format!(
            "https://github.com/search?q={}&type=repositories",
            urlencoding::encode(keyword)
        )
    }

    async fn search_first_page(&self, keyword: &str) -> Result<ResultPage> {
        let cursor = PageCursor {
            keyword: keyword.to_string(),
            page: 1,
            per_page: self.per_page,
        };
        self.search_page(&cursor).await
    }

    async fn search_next_page(&self, cursor: &PageCursor) -> Result<ResultPage> {
        self.search_page(cursor).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(page: u32, per_page: u8) -> PageCursor {
        PageCursor {
            keyword: "rust".into(),
            page,
            per_page,
        }
    }

    #[test]
    fn next_cursor_advances_page() {
        let next = next_cursor(&cursor(1, 20), 50).unwrap();
        assert_eq!(next.page, 2);
        assert_eq!(next.per_page, 20);
        assert_eq!(next.keyword, "rust");
    }

    #[test]
    fn last_page_has_no_cursor() {
        assert!(next_cursor(&cursor(2, 20), 50).is_some());
        assert!(next_cursor(&cursor(3, 20), 50).is_none());
        assert!(next_cursor(&cursor(1, 30), 30).is_none());
        assert!(next_cursor(&cursor(1, 30), 0).is_none());
    }

    #[test]
    fn totals_clamped_to_search_limit() {
        assert_eq!(clamp_total(50), 50);
        assert_eq!(clamp_total(1000), 1000);
        assert_eq!(clamp_total(250_000), 1000);
        assert!(next_cursor(&cursor(10, 100), clamp_total(250_000)).is_none());
    }

    #[tokio::test]
    async fn search_url_encodes_keyword() {
        let github =
            GitHub::new(None, &GitHubConfig::default(), &SearchConfig::default()).unwrap();
        assert_eq!(
            github.search_url("tui language:rust"),
            "https://github.com/search?q=tui%20language%3Arust&type=repositories"
        );
    }

    #[tokio::test]
    async fn per_page_from_config_is_clamped() {
        let search = SearchConfig {
            per_page: 0,
            ..SearchConfig::default()
        };
        let github = GitHub::new(None, &GitHubConfig::default(), &search).unwrap();
        assert_eq!(github.per_page, 1);
    }
}
