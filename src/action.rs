use crate::search::Completion;

#[derive(Debug, Clone)]
pub enum Action {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,

    // Keyword input
    EnterSearchMode,
    ExitSearchMode,
    SearchInput(char),
    SearchBackspace,
    SearchConfirm,
    /// Submit a keyword directly, e.g. one given on the command line
    Search(String),

    // Pagination
    Refresh,
    LoadMore,
    SearchCompleted(Completion),

    // Selected repository
    OpenInBrowser,
    OpenSearchInBrowser,
    YankUrl,

    Resize(u16, u16),
    None,
}
