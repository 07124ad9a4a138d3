use std::time::Duration;

/// Default GitHub REST API base URL.
const DEFAULT_API_URL: &str = "https://api.github.com";
/// Default `User-Agent` header (GitHub rejects requests without one).
const DEFAULT_USER_AGENT: &str = "repodeck";
/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the hosting platform API.
#[derive(Debug, Clone)]
pub struct HostingConfig {
    /// Base REST URL without trailing slash.
    pub api_url: String,
    /// Bearer token sent with every request.
    pub token: String,
    /// Create repositories under this organization instead of the
    /// authenticated user.
    pub organization: Option<String>,
    pub user_agent: String,
    /// Per-request timeout. The only timeout the control plane applies.
    pub timeout: Duration,
}

impl HostingConfig {
    /// Config with defaults for everything except the token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            organization: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Required | Default                  |
    /// |-----------------------|----------|--------------------------|
    /// | `GITHUB_TOKEN`        | **yes**  | --                       |
    /// | `GITHUB_API_URL`      | no       | `https://api.github.com` |
    /// | `GITHUB_ORG`          | no       | unset                    |
    /// | `GITHUB_USER_AGENT`   | no       | `repodeck`               |
    /// | `GITHUB_TIMEOUT_SECS` | no       | `30`                     |
    ///
    /// # Panics
    ///
    /// Panics if `GITHUB_TOKEN` is not set or is empty, or if
    /// `GITHUB_TIMEOUT_SECS` is not a valid u64.
    pub fn from_env() -> Self {
        let token = std::env::var("GITHUB_TOKEN").expect("GITHUB_TOKEN must be set in the environment");
        assert!(!token.trim().is_empty(), "GITHUB_TOKEN must not be empty");

        let api_url = std::env::var("GITHUB_API_URL")
            .unwrap_or_else(|_| DEFAULT_API_URL.into())
            .trim_end_matches('/')
            .to_string();

        let organization = std::env::var("GITHUB_ORG")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let user_agent =
            std::env::var("GITHUB_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.into());

        let timeout_secs: u64 = std::env::var("GITHUB_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("GITHUB_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            token,
            organization,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
