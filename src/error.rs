//! Error taxonomy for the content pipeline.
//!
//! Every failure that can cross the HTTP boundary is one of these variants,
//! and each variant maps to exactly one status code in the server layer.
//! Anything the store reports that is not a clean not-found or
//! permission-denied collapses into [`StoreError::Upstream`] so upstream
//! details never leak into a response body.

use thiserror::Error;

/// Failures surfaced by the Drive client and the listing/fetch pipeline
/// built on top of it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required folder or file id is absent from configuration. Detected
    /// before any store call is made.
    #[error("{0} not configured")]
    MissingConfig(&'static str),

    /// The store says the id does not resolve to a file.
    #[error("file not found")]
    NotFound,

    /// The store denied access, either via HTTP 403 or a `forbidden`
    /// reason code in the error body.
    #[error("access denied by the store")]
    AccessDenied,

    /// A path id was empty or contained characters that cannot appear in a
    /// Drive file id. Rejected before any store call.
    #[error("invalid file id: {0:?}")]
    InvalidId(String),

    /// Everything else: transport failures, unexpected statuses, malformed
    /// response bodies.
    #[error("drive request failed: {0}")]
    Upstream(String),
}

impl StoreError {
    pub(crate) fn upstream(err: impl std::fmt::Display) -> Self {
        StoreError::Upstream(err.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Upstream(err.to_string())
    }
}
