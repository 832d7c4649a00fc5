use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HubError>;

/// Failure of a search operation, as reported to the renderer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Search failed: {0}")]
    FetchFailed(String),

    #[error("Loading more results failed: {0}")]
    AppendFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display_carries_message() {
        let err = FetchError::FetchFailed("rate limited".into());
        assert_eq!(err.to_string(), "Search failed: rate limited");
    }

    #[test]
    fn append_error_display_carries_message() {
        let err = FetchError::AppendFailed("timeout".into());
        assert_eq!(err.to_string(), "Loading more results failed: timeout");
    }
}
