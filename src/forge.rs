use async_trait::async_trait;

use crate::error::Result;
use crate::types::{PageCursor, ResultPage};

/// A repository host that can be searched page by page.
///
/// Pagination state lives in the returned `ResultPage::next` cursor, never in the forge itself.
#[async_trait]
pub trait Forge: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;

    /// Web page showing the same search, for opening in a browser
    fn search_url(&self, keyword: &str) -> String;

    async fn search_first_page(&self, keyword: &str) -> Result<ResultPage>;
    async fn search_next_page(&self, cursor: &PageCursor) -> Result<ResultPage>;
}
