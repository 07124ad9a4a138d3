//! Hosting platform interface and its GitHub REST implementation.
//!
//! The control plane talks to the hosting platform only through the
//! [`HostingPlatform`] trait. [`GitHubApi`] implements it over the GitHub
//! REST v3 API with [`reqwest`]; [`MemoryHosting`] keeps everything in
//! process memory for local development and tests.

pub mod config;
pub mod error;
pub mod github;
pub mod memory;
pub mod platform;
pub mod types;

pub use config::HostingConfig;
pub use error::HostingError;
pub use github::GitHubApi;
pub use memory::MemoryHosting;
pub use platform::HostingPlatform;
