//! Repository control plane orchestration.
//!
//! Multi-step operations that mutate state on the hosting platform:
//! scaffolding repositories from templates, keeping the registry stored in
//! a repository variable, and provisioning environment branches. Every
//! operation is a sequence of awaited calls against a
//! [`HostingPlatform`](repodeck_hosting::HostingPlatform); there is no
//! rollback when a later step fails.

pub mod environment;
pub mod error;
pub mod registry;
pub mod scaffold;

pub use error::ControlError;
