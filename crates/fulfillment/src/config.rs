//! Host configuration loaded from environment variables.

use common::UserId;

/// Host configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `DENIED_USERS` — comma-separated user ids payment must refuse
///   (default: `"99999"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub denied_users: Vec<UserId>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let denied_users = std::env::var("DENIED_USERS")
            .map(|raw| Self::parse_denied_users(&raw))
            .unwrap_or_else(|_| Self::default().denied_users);
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            denied_users,
        }
    }

    /// Parses a comma-separated denylist, skipping malformed entries.
    fn parse_denied_users(raw: &str) -> Vec<UserId> {
        raw.split(',')
            .filter_map(|part| part.trim().parse::<u64>().ok())
            .map(UserId::new)
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            denied_users: vec![UserId::new(99_999)],
        }
    }
}
