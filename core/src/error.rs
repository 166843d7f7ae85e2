//! Failure taxonomy and per-call outcomes.
//!
//! # Design
//! Every failure a call can produce is one of the closed set of `Reason`
//! values; nothing in this layer panics across the completion boundary or
//! retries. `RequestFailed` additionally carries the response body parsed as
//! generic JSON (or the raw text when it is not JSON) so callers can inspect
//! server-side error payloads without a second decode step.

use std::fmt;

/// Why a call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// The base URL plus resolved path (and query) did not form a valid URL,
    /// or the endpoint could not be resolved to a concrete path.
    InvalidUrl,

    /// The requested method is not in the endpoint's allow-list.
    MethodNotAllowed,

    /// The request payload was absent or could not be encoded.
    BuildingPayload,

    /// The response arrived with a success status but could not be decoded
    /// into the expected type.
    CastingToExpectedType,

    /// The server replied with a non-success status, or the transport
    /// reported an error alongside HTTP metadata.
    RequestFailed,

    /// Reserved for grouped-call aggregation; no current producer.
    GroupIncomplete,

    /// Reserved for unclassifiable status codes; no current producer.
    UnknownStatus,

    /// The transport reported an error and produced no HTTP metadata.
    UnwrappingResponse,

    /// The transport produced neither HTTP metadata nor an error.
    InvalidResponseType,
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Reason::InvalidUrl => "invalid URL",
            Reason::MethodNotAllowed => "method not allowed",
            Reason::BuildingPayload => "building payload failed",
            Reason::CastingToExpectedType => "casting to expected type failed",
            Reason::RequestFailed => "request failed",
            Reason::GroupIncomplete => "group incomplete",
            Reason::UnknownStatus => "unknown status",
            Reason::UnwrappingResponse => "unwrapping response failed",
            Reason::InvalidResponseType => "invalid response type",
        };
        f.write_str(text)
    }
}

/// A classified failure, optionally carrying the response body as generic
/// JSON for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct NetworkError {
    pub reason: Reason,
    pub raw_body: Option<serde_json::Value>,
}

impl NetworkError {
    pub fn new(reason: Reason) -> Self {
        Self { reason, raw_body: None }
    }

    pub fn with_body(reason: Reason, raw_body: serde_json::Value) -> Self {
        Self { reason, raw_body: Some(raw_body) }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw_body {
            Some(body) => write!(f, "{}: {body}", self.reason),
            None => write!(f, "{}", self.reason),
        }
    }
}

impl std::error::Error for NetworkError {}

/// The result of one call, delivered to the completion callback.
///
/// Created fresh per call and never mutated after construction. `status` is
/// absent when the failure happened before any HTTP exchange (URL or payload
/// construction) or when the transport produced no HTTP metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success { status: Option<u16> },
    Failure { status: Option<u16>, error: Option<NetworkError> },
}

impl Outcome {
    pub(crate) fn failure(
        status: Option<u16>,
        reason: Reason,
        raw_body: Option<serde_json::Value>,
    ) -> Self {
        Outcome::Failure {
            status,
            error: Some(NetworkError { reason, raw_body }),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Outcome::Success { status } | Outcome::Failure { status, .. } => *status,
        }
    }

    /// The failure reason, if this outcome is a failure carrying one.
    pub fn reason(&self) -> Option<Reason> {
        match self {
            Outcome::Failure { error: Some(e), .. } => Some(e.reason),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_accessors() {
        let outcome = Outcome::Success { status: Some(204) };
        assert!(outcome.is_success());
        assert_eq!(outcome.status(), Some(204));
        assert_eq!(outcome.reason(), None);
    }

    #[test]
    fn failure_accessors() {
        let outcome = Outcome::failure(Some(500), Reason::RequestFailed, None);
        assert!(!outcome.is_success());
        assert_eq!(outcome.status(), Some(500));
        assert_eq!(outcome.reason(), Some(Reason::RequestFailed));
    }

    #[test]
    fn failure_without_error_has_no_reason() {
        let outcome = Outcome::Failure { status: None, error: None };
        assert_eq!(outcome.reason(), None);
    }

    #[test]
    fn network_error_display_includes_reason() {
        let err = NetworkError::new(Reason::MethodNotAllowed);
        assert_eq!(err.to_string(), "method not allowed");
    }
}
