//! Errors from the hosting platform layer.

/// Errors returned by any [`HostingPlatform`](crate::HostingPlatform) call.
///
/// The control plane only branches on [`HostingError::is_not_found`];
/// every other variant is propagated to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum HostingError {
    /// The platform reported that the resource does not exist (HTTP 404).
    #[error("Not found: {resource}")]
    NotFound {
        /// What was being looked up, e.g. `variable acme/svc:REPODECK_REGISTRY`.
        resource: String,
    },

    /// The credential was rejected or lacks permission (HTTP 401/403).
    #[error("Hosting platform rejected credentials ({status}): {body}")]
    Unauthorized { status: u16, body: String },

    /// Any other non-2xx response.
    #[error("Hosting platform API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// A 2xx response whose body did not have the expected shape.
    #[error("Unexpected response body: {0}")]
    Decode(String),

    /// The configured API base URL cannot be used to build request URLs.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

impl HostingError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Whether the platform reported the target as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
