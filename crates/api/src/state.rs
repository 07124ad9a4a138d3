use std::sync::Arc;

use repodeck_hosting::HostingPlatform;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Hosting platform client shared by every request.
    pub platform: Arc<dyn HostingPlatform>,
}
