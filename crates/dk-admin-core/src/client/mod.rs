//! Remote Resource Client for the admin REST backend.
//!
//! [`ApiClient`] exposes `get/post/put/delete` returning decoded bodies or a
//! [`RequestError`]. The wire is abstracted behind [`Transport`] so the rest
//! of the crate never touches `reqwest` directly.

pub mod api;
pub mod errors;
pub mod http;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use api::ApiClient;
pub use errors::{RequestError, backend_message};
pub use http::{ADMIN_TOKEN_HEADER, HttpTransport};
pub use types::{ApiRequest, ApiResponse, Method, Query, Transport};
