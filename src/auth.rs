use std::path::PathBuf;

use crate::config::{config_dir, GitHubConfig};

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

/// Stored token path: ~/.config/hubsearch/token
fn token_path() -> Option<PathBuf> {
    Some(config_dir()?.join("token"))
}

fn load_stored_token() -> Option<String> {
    let path = token_path()?;
    let token = std::fs::read_to_string(path).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Find a GitHub token, trying in order:
/// 1. Env var named in config
/// 2. Stored token from ~/.config/hubsearch/token
/// 3. CLI command from config
///
/// None means searching anonymously, which GitHub allows at a lower rate limit.
pub fn load_token(github: &GitHubConfig) -> Option<String> {
    if let Some(env_var) = &github.token_env {
        if let Ok(token) = std::env::var(env_var) {
            if !token.is_empty() {
                tracing::debug!(env_var, "using token from environment");
                return Some(token);
            }
        }
    }

    if let Some(token) = load_stored_token() {
        tracing::debug!("using stored token");
        return Some(token);
    }

    if let Some(cmd) = &github.token_command {
        if let Some(token) = try_cli_token(cmd) {
            tracing::debug!(cmd, "using token from command");
            return Some(token);
        }
    }

    tracing::info!("no GitHub token found, searching anonymously");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_token_trims_output() {
        assert_eq!(try_cli_token("echo '  abc123  '"), Some("abc123".to_string()));
    }

    #[test]
    fn cli_token_failure_or_empty_is_none() {
        assert_eq!(try_cli_token("false"), None);
        assert_eq!(try_cli_token("printf ''"), None);
    }

    #[test]
    fn env_token_wins() {
        std::env::set_var("HUBSEARCH_TEST_TOKEN", "from-env");
        let github = GitHubConfig {
            api_url: None,
            token_env: Some("HUBSEARCH_TEST_TOKEN".to_string()),
            token_command: Some("echo from-command".to_string()),
        };
        assert_eq!(load_token(&github), Some("from-env".to_string()));
        std::env::remove_var("HUBSEARCH_TEST_TOKEN");
    }
}
