#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the LISA analysis service and the request session that
//! keeps stale responses from overwriting newer state.

pub mod api;
pub mod session;

pub use api::{API_BASE_ENV, ApiClient, DEFAULT_API_BASE};
pub use lisa_map_client_models::{DatasetFile, parse_headers};
pub use session::{AnalysisSession, RequestTicket, RequestTracker, RunRequest};

use thiserror::Error;

/// Errors that can occur talking to the analysis service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The service answered with a non-success status. `message` is the
    /// response body, or a generic message when the body is empty.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// User-facing message.
        message: String,
    },
}
