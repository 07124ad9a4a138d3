//! Shared response envelope.
//!
//! All API responses use a `{ "data": ... }` envelope. Handlers return
//! [`DataResponse`] rather than ad-hoc `json!` values.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
