//! Extractors whose failures render as the service's JSON error body.
//!
//! Request bodies are optional on every endpoint, so handlers take the raw
//! bytes and parse them with [`json`] after the caller identity is resolved.

use axum::extract::{FromRequestParts, rejection::PathRejection};
use axum_extra::extract::QueryRejection;
use serde::de::DeserializeOwned;

type Result<T> = std::result::Result<T, Error>;

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(crate::Error))]
pub struct Path<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum_extra::extract::Query), rejection(crate::Error))]
pub struct Query<T>(pub T);

/// An empty body is `T::default()`. Anything else must be valid JSON for `T`,
/// whatever content type the request claims.
pub fn json<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    serde_json::from_slice(body).map_err(|e| Error::Body(e.to_string()))
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid path: {0}")]
    Path(String),
    #[error("invalid query: {0}")]
    Query(String),
    #[error("invalid body: {0}")]
    Body(String),
}

impl From<PathRejection> for crate::Error {
    fn from(r: PathRejection) -> Self {
        Error::Path(r.body_text()).into()
    }
}

impl From<QueryRejection> for crate::Error {
    fn from(r: QueryRejection) -> Self {
        Error::Query(r.to_string()).into()
    }
}
