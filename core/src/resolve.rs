//! Response resolution: raw transport replies into typed outcomes.
//!
//! # Design
//! Resolution is a pure function of the `TransportReply`, so it is unit
//! testable without any transport. Classification happens once, up front:
//! missing metadata and non-success statuses short-circuit, and only replies
//! in the success range reach the decode step. Failed decodes log the raw
//! body at debug level rather than carrying it in the outcome.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::ops::Range;

use crate::error::{Outcome, Reason};
use crate::http::TransportReply;

/// Status codes treated as success: 200 inclusive to 300 exclusive.
const SUCCESS_STATUSES: Range<u16> = 200..300;

/// Classify a reply, returning the status code when it is a decodable
/// success and a terminal failure `Outcome` otherwise.
fn classify(reply: &TransportReply) -> Result<u16, Outcome> {
    let Some(metadata) = &reply.metadata else {
        let reason = if reply.error.is_some() {
            Reason::UnwrappingResponse
        } else {
            Reason::InvalidResponseType
        };
        return Err(Outcome::failure(None, reason, None));
    };
    let status = metadata.status;
    if reply.error.is_some() || !SUCCESS_STATUSES.contains(&status) {
        let raw = diagnostic_body(reply.body.as_deref());
        return Err(Outcome::failure(Some(status), Reason::RequestFailed, Some(raw)));
    }
    Ok(status)
}

/// Best-effort parse of response bytes for diagnostics: generic JSON when
/// the body is JSON, otherwise the body as a (lossy) JSON string.
fn diagnostic_body(bytes: Option<&[u8]>) -> Value {
    let bytes = bytes.unwrap_or_default();
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Resolve a reply whose success body decodes into `R`.
///
/// A success-range status with a missing body decodes from the empty slice,
/// which fails like any other undecodable body.
pub fn resolve<R: DeserializeOwned>(reply: TransportReply) -> (Outcome, Option<R>) {
    let status = match classify(&reply) {
        Ok(status) => status,
        Err(outcome) => return (outcome, None),
    };
    let bytes = reply.body.unwrap_or_default();
    match serde_json::from_slice::<R>(&bytes) {
        Ok(value) => (Outcome::Success { status: Some(status) }, Some(value)),
        Err(err) => {
            log::debug!(
                "response decode failed: {err}; body: {}",
                diagnostic_body(Some(&bytes))
            );
            (Outcome::failure(Some(status), Reason::CastingToExpectedType, None), None)
        }
    }
}

/// Resolve a reply for a call that expects no response body.
///
/// The body is never read on the success path, so a malformed body cannot
/// fail a no-content call.
pub fn resolve_no_content(reply: TransportReply) -> Outcome {
    match classify(&reply) {
        Ok(status) => Outcome::Success { status: Some(status) },
        Err(outcome) => outcome,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{ResponseMetadata, TransportError};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: u64,
        name: String,
        email: String,
    }

    fn reply(status: u16, body: &[u8]) -> TransportReply {
        TransportReply {
            body: Some(body.to_vec()),
            metadata: Some(ResponseMetadata { status, headers: Vec::new() }),
            error: None,
        }
    }

    #[test]
    fn decodes_expected_type_on_success() {
        let body = br#"{"id":1,"name":"John Doe","email":"john.doe@example.com"}"#;
        let (outcome, user) = resolve::<User>(reply(200, body));
        assert_eq!(outcome, Outcome::Success { status: Some(200) });
        assert_eq!(
            user,
            Some(User {
                id: 1,
                name: "John Doe".to_string(),
                email: "john.doe@example.com".to_string(),
            })
        );
    }

    #[test]
    fn undecodable_success_body_is_casting_failure() {
        let (outcome, user) = resolve::<User>(reply(200, b"\"Invalid JSON\""));
        assert_eq!(outcome.reason(), Some(Reason::CastingToExpectedType));
        assert_eq!(outcome.status(), Some(200));
        assert_eq!(user, None);
    }

    #[test]
    fn missing_body_on_success_is_casting_failure() {
        let mut r = reply(200, b"");
        r.body = None;
        let (outcome, user) = resolve::<User>(r);
        assert_eq!(outcome.reason(), Some(Reason::CastingToExpectedType));
        assert_eq!(user, None);
    }

    #[test]
    fn success_range_is_200_inclusive_to_300_exclusive() {
        assert_eq!(resolve_no_content(reply(199, b"")).reason(), Some(Reason::RequestFailed));
        assert_eq!(resolve_no_content(reply(300, b"")).reason(), Some(Reason::RequestFailed));
        assert!(resolve_no_content(reply(200, b"")).is_success());
        assert!(resolve_no_content(reply(299, b"")).is_success());
    }

    #[test]
    fn non_success_status_attaches_parsed_json_body() {
        let (outcome, user) = resolve::<User>(reply(404, br#"{"message":"no such user"}"#));
        assert_eq!(user, None);
        let Outcome::Failure { status, error: Some(error) } = outcome else {
            panic!("expected a failure with an error");
        };
        assert_eq!(status, Some(404));
        assert_eq!(error.reason, Reason::RequestFailed);
        assert_eq!(error.raw_body, Some(serde_json::json!({"message": "no such user"})));
    }

    #[test]
    fn non_json_failure_body_falls_back_to_a_string_diagnostic() {
        let (outcome, _) = resolve::<User>(reply(500, b"stack trace here"));
        let Outcome::Failure { error: Some(error), .. } = outcome else {
            panic!("expected a failure with an error");
        };
        assert_eq!(error.raw_body, Some(Value::String("stack trace here".to_string())));
    }

    #[test]
    fn transport_error_with_metadata_is_request_failed() {
        let mut r = reply(200, b"{}");
        r.error = Some(TransportError("connection reset".to_string()));
        let outcome = resolve_no_content(r);
        assert_eq!(outcome.reason(), Some(Reason::RequestFailed));
        assert_eq!(outcome.status(), Some(200));
    }

    #[test]
    fn transport_error_without_metadata_is_unwrapping_failure() {
        let r = TransportReply {
            body: None,
            metadata: None,
            error: Some(TransportError("dns failure".to_string())),
        };
        let outcome = resolve_no_content(r);
        assert_eq!(outcome.reason(), Some(Reason::UnwrappingResponse));
        assert_eq!(outcome.status(), None);
    }

    #[test]
    fn empty_reply_without_error_is_invalid_response_type() {
        let r = TransportReply { body: None, metadata: None, error: None };
        assert_eq!(resolve_no_content(r).reason(), Some(Reason::InvalidResponseType));
    }

    #[test]
    fn no_content_success_ignores_malformed_body() {
        let outcome = resolve_no_content(reply(204, b"not json at all"));
        assert_eq!(outcome, Outcome::Success { status: Some(204) });
    }
}
