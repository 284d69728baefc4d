//! Error taxonomy for upstream fetches.
//!
//! Every data source failure collapses into one of three kinds: the
//! identity lookup missing entirely, a generic upstream/transport
//! problem, or a payload that parsed but is missing required fields.

use serde::Serialize;
use thiserror::Error;

/// A failed fetch against one of the upstream APIs.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FetchError {
    /// The identity endpoint answered 404. Page-level and terminal;
    /// no other section can render without a valid handle context.
    #[error("user not found")]
    NotFound,

    /// Any other non-success status, transport failure, or timeout.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// The payload parsed as JSON but a required field is absent.
    /// Distinct from zero/empty data: zero is a valid stat value,
    /// absence is not.
    #[error("malformed payload: missing {0}")]
    MalformedData(&'static str),
}

impl FetchError {
    /// Map a reqwest transport error into the taxonomy.
    pub fn from_request(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Upstream("request timed out".to_string())
        } else if err.is_connect() {
            FetchError::Upstream(format!("connection failed: {}", err))
        } else {
            FetchError::Upstream(err.to_string())
        }
    }

    /// Map a non-success HTTP status into the taxonomy.
    ///
    /// Always an `Upstream` error; only the identity endpoint promotes
    /// 404 to `NotFound`, and it does so at the call site.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        FetchError::Upstream(format!("HTTP {}", status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_server_error() {
        let err = FetchError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err, FetchError::Upstream("HTTP 500 Internal Server Error".to_string()));
    }

    #[test]
    fn test_display() {
        assert_eq!(FetchError::NotFound.to_string(), "user not found");
        assert_eq!(
            FetchError::MalformedData("totalSolved").to_string(),
            "malformed payload: missing totalSolved"
        );
    }
}
