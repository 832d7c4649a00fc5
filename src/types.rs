use std::ops::Range;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Repository as shown in the result list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub owner: String,
    pub name: String,
    pub description: Option<String>,
    pub url: String,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl Repository {
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// Where the next page of a search starts. Produced by a forge, handed back to it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    pub keyword: String,
    pub page: u32,
    pub per_page: u8,
}

/// One batch of search results plus the server's total match count
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage {
    pub items: Vec<Repository>,
    pub total: u64,
    pub next: Option<PageCursor>,
}

impl ResultPage {
    pub fn has_more(&self) -> bool {
        (self.items.len() as u64) < self.total
    }

    /// Append `page` to this one and return the index range the new items occupy.
    ///
    /// The running `total` is kept from the first page. An empty follow-up page
    /// means the server has nothing more, whatever cursor it sent.
    pub fn merge(&mut self, page: ResultPage) -> Range<usize> {
        let start = self.items.len();
        let empty = page.items.is_empty();

        self.items.extend(page.items);
        self.next = if empty { None } else { page.next };
        self.settle();

        start..self.items.len()
    }

    /// Reconcile `total` with what we hold: never fewer than the items, and
    /// exactly the items once there is no cursor left to follow.
    pub fn settle(&mut self) {
        let held = self.items.len() as u64;
        if self.next.is_none() {
            self.total = held;
        } else {
            self.total = self.total.max(held);
        }
    }
}

/// Names are kebab-case for both the config file and `--sort`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    BestMatch,
    Stars,
    Forks,
    Updated,
}

impl SortKey {
    pub fn as_api_str(&self) -> Option<&'static str> {
        match self {
            SortKey::BestMatch => None,
            SortKey::Stars => Some("stars"),
            SortKey::Forks => Some("forks"),
            SortKey::Updated => Some("updated"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_api_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_repo(i: usize) -> Repository {
    Repository {
        owner: format!("owner{}", i),
        name: format!("repo{}", i),
        description: None,
        url: format!("https://github.com/owner{}/repo{}", i, i),
        stars: i as u32,
        forks: 0,
        language: None,
        updated_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

#[cfg(test)]
pub(crate) fn sample_page(range: Range<usize>, total: u64) -> ResultPage {
    ResultPage {
        items: range.map(sample_repo).collect(),
        total,
        next: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(page: u32) -> PageCursor {
        PageCursor {
            keyword: "rust".into(),
            page,
            per_page: 20,
        }
    }

    #[test]
    fn merge_appends_in_order_and_reports_range() {
        let mut page = sample_page(0..20, 50);
        let mut next = sample_page(20..40, 50);
        next.next = Some(cursor(3));
        let range = page.merge(next);

        assert_eq!(range, 20..40);
        assert_eq!(page.items.len(), 40);
        assert_eq!(page.items[0], sample_repo(0));
        assert_eq!(page.items[39], sample_repo(39));
        assert_eq!(page.total, 50);
        assert!(page.has_more());
    }

    #[test]
    fn merge_takes_cursor_from_new_page() {
        let mut page = sample_page(0..2, 10);
        let mut next = sample_page(2..4, 10);
        next.next = Some(cursor(3));

        page.merge(next);
        assert_eq!(page.next, Some(cursor(3)));
        assert_eq!(page.total, 10);
    }

    #[test]
    fn short_last_page_closes_result_set() {
        // server said 40, but the last page stops at 35 with no cursor
        let mut page = sample_page(0..20, 40);
        page.next = Some(cursor(2));
        let range = page.merge(sample_page(20..35, 40));

        assert_eq!(range, 20..35);
        assert_eq!(page.total, 35);
        assert!(!page.has_more());
    }

    #[test]
    fn settle_without_cursor_drops_unreachable_total() {
        let mut page = sample_page(0..20, 40);
        page.settle();
        assert_eq!(page.total, 20);
        assert!(!page.has_more());

        let mut page = sample_page(0..20, 40);
        page.next = Some(cursor(2));
        page.settle();
        assert_eq!(page.total, 40);
        assert!(page.has_more());
    }

    #[test]
    fn empty_follow_up_page_ends_pagination() {
        let mut page = sample_page(0..20, 50);
        let range = page.merge(sample_page(0..0, 50));

        assert!(range.is_empty());
        assert_eq!(page.total, 20);
        assert!(!page.has_more());
    }

    #[test]
    fn total_never_below_item_count() {
        let mut page = sample_page(0..5, 6);
        let mut next = sample_page(5..10, 6);
        next.next = Some(cursor(3));
        page.merge(next);
        assert_eq!(page.total, 10);
        assert!(!page.has_more());
    }

    #[test]
    fn cli_and_config_names_agree() {
        #[derive(Deserialize)]
        struct Wrap {
            sort: SortKey,
            order: SortOrder,
        }
        for sort in SortKey::value_variants() {
            for order in SortOrder::value_variants() {
                let text = format!(
                    "sort = \"{}\"\norder = \"{}\"",
                    sort.to_possible_value().unwrap().get_name(),
                    order.to_possible_value().unwrap().get_name()
                );
                let w: Wrap = toml::from_str(&text).unwrap();
                assert_eq!(w.sort, *sort);
                assert_eq!(w.order, *order);
            }
        }
    }

    #[test]
    fn sort_key_parses_from_toml_names() {
        #[derive(Deserialize)]
        struct Wrap {
            sort: SortKey,
        }
        let w: Wrap = toml::from_str(r#"sort = "best-match""#).unwrap();
        assert_eq!(w.sort, SortKey::BestMatch);
        let w: Wrap = toml::from_str(r#"sort = "stars""#).unwrap();
        assert_eq!(w.sort, SortKey::Stars);
    }
}
