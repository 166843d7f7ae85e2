//! Payload encoding: query parameters and request bodies.
//!
//! # Design
//! Field enumeration goes through `serde_json::to_value` instead of any
//! bespoke reflection: a payload serializes to a JSON object and only fields
//! whose value is a JSON string are emitted as query/form pairs. Numeric and
//! boolean fields are deliberately dropped from query and form encoding;
//! payload types that want them sent stringify them in their own serde impl.
//! Field order is the serde_json object order (sorted by key), so output is
//! deterministic.

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::endpoint::{Encoding, MultipartPart};
use crate::error::Reason;

/// Content-type values the encoder reports alongside body bytes.
const JSON_CONTENT_TYPE: &str = "application/json";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Reflect `payload` into its string-valued fields, in key order.
///
/// Non-object payloads yield no fields. Serialization failure is the only
/// error.
fn string_fields<P: Serialize>(payload: &P) -> Result<Vec<(String, String)>, Reason> {
    let value = serde_json::to_value(payload).map_err(|_| Reason::BuildingPayload)?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key, s)),
            _ => None,
        })
        .collect())
}

/// Encode `payload` as query parameters.
///
/// Zero string-representable fields is not an error; the caller simply
/// attaches no query string.
pub fn query_parameters<P: Serialize>(payload: &P) -> Result<Vec<(String, String)>, Reason> {
    string_fields(payload)
}

/// Encode `payload` as a request body per `encoding`, returning the body
/// bytes and the `Content-Type` value to send with them.
pub fn encode_body<B: Serialize>(
    payload: &B,
    encoding: &Encoding,
) -> Result<(Vec<u8>, String), Reason> {
    match encoding {
        Encoding::Json => {
            let bytes = serde_json::to_vec(payload).map_err(|_| Reason::BuildingPayload)?;
            Ok((bytes, JSON_CONTENT_TYPE.to_string()))
        }
        Encoding::Form => {
            let fields = string_fields(payload)?;
            // Unlike query encoding, an empty form body is rejected.
            if fields.is_empty() {
                return Err(Reason::BuildingPayload);
            }
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in &fields {
                serializer.append_pair(key, value);
            }
            Ok((serializer.finish().into_bytes(), FORM_CONTENT_TYPE.to_string()))
        }
        Encoding::Multipart(parts) => assemble_multipart(parts),
    }
}

/// Assemble a `multipart/form-data` body from the declared parts, in order.
fn assemble_multipart(parts: &[MultipartPart]) -> Result<(Vec<u8>, String), Reason> {
    if parts.is_empty() {
        return Err(Reason::BuildingPayload);
    }
    let boundary = format!("courier-{}", Uuid::new_v4());
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match &part.file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.field_name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.field_name)
                    .as_bytes(),
            ),
        }
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", part.mime_type).as_bytes());
        body.extend_from_slice(&part.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    let content_type = format!("multipart/form-data; boundary={boundary}");
    Ok((body, content_type))
}
