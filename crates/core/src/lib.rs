//! Pure domain logic for the Repodeck repository control plane.
//!
//! Nothing in this crate performs I/O. Orchestration against the hosting
//! platform lives in `repodeck-control`; this crate supplies the data model,
//! the template catalog, and the derivation rules those orchestrators and
//! the API layer call into.

pub mod commands;
pub mod encoding;
pub mod environment;
pub mod error;
pub mod registry;
pub mod status;
pub mod templates;
pub mod types;
