use repodeck_hosting::HostingConfig;

/// Which [`HostingPlatform`](repodeck_hosting::HostingPlatform) the server
/// talks to.
#[derive(Debug, Clone)]
pub enum HostingBackend {
    /// GitHub REST API.
    GitHub(HostingConfig),
    /// Process-local store for development. `owner` owns created repos.
    Memory { owner: String },
}

/// Server configuration loaded from environment variables.
///
/// All server fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests after a shutdown signal.
    pub shutdown_timeout_secs: u64,
    pub hosting: HostingBackend,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `HOSTING_BACKEND`       | `github`                |
    /// | `MEMORY_OWNER`          | `local`                 |
    ///
    /// With the `github` backend the `GITHUB_*` variables are read by
    /// [`HostingConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparseable numbers, an unknown `HOSTING_BACKEND`, or a
    /// missing `GITHUB_TOKEN` when the backend is `github`.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let backend = std::env::var("HOSTING_BACKEND").unwrap_or_else(|_| "github".into());
        let hosting = match backend.trim().to_ascii_lowercase().as_str() {
            "github" => HostingBackend::GitHub(HostingConfig::from_env()),
            "memory" => HostingBackend::Memory {
                owner: std::env::var("MEMORY_OWNER").unwrap_or_else(|_| "local".into()),
            },
            other => panic!("HOSTING_BACKEND must be 'github' or 'memory', got '{other}'"),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            hosting,
        }
    }
}
