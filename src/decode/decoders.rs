//! Decoder implementations
//!
//! Raw response bytes in, typed records or a `Validation` error out.

use super::types::{Decoded, FieldError, ResponseShape};
use crate::error::{Error, Result};
use serde::de::DeserializeOwned;

/// Decode a response body of the given shape
pub fn decode<T: DeserializeOwned>(body: &[u8], shape: ResponseShape) -> Result<Decoded<T>> {
    match shape {
        ResponseShape::Object => decode_object(body).map(Decoded::One),
        ResponseShape::BareArray => decode_array(body).map(Decoded::Many),
    }
}

/// Decode a top-level JSON object into a single record
pub fn decode_object<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    check_shape(body, ResponseShape::Object)?;
    serde_json::from_slice(body).map_err(|e| validation_error(&e, body, ResponseShape::Object))
}

/// Decode a top-level JSON array into a list of records
pub fn decode_array<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    check_shape(body, ResponseShape::BareArray)?;
    serde_json::from_slice(body).map_err(|e| validation_error(&e, body, ResponseShape::BareArray))
}

// ============================================================================
// Helpers
// ============================================================================

/// Reject a body whose top-level value is not the expected shape
///
/// Only the first significant byte is inspected; the full parse happens in
/// the typed decode that follows.
fn check_shape(body: &[u8], expected: ResponseShape) -> Result<()> {
    let first = body.iter().copied().find(|b| !b.is_ascii_whitespace());
    if first == Some(expected.opening_byte()) {
        return Ok(());
    }

    let found = match first {
        None => "empty body",
        Some(b'{') => "object",
        Some(b'[') => "array",
        Some(b'"') => "string",
        Some(b'n') => "null",
        Some(b't' | b'f') => "boolean",
        Some(b'-' | b'0'..=b'9') => "number",
        Some(_) => "non-JSON content",
    };
    let message = format!("expected top-level {expected}, found {found}");

    Err(Error::Validation {
        message: message.clone(),
        field_errors: vec![FieldError {
            field: None,
            message,
            line: 0,
            column: 0,
        }],
        response_text: String::from_utf8_lossy(body).into_owned(),
    })
}

fn validation_error(err: &serde_json::Error, body: &[u8], shape: ResponseShape) -> Error {
    let field_error = field_error(err);
    Error::Validation {
        message: format!("failed to decode {shape} response: {err}"),
        field_errors: vec![field_error],
        response_text: String::from_utf8_lossy(body).into_owned(),
    }
}

/// Turn a serde_json error into a structured field error
fn field_error(err: &serde_json::Error) -> FieldError {
    let rendered = err.to_string();
    let message = rendered
        .rsplit_once(" at line ")
        .map_or(rendered.as_str(), |(head, _)| head)
        .to_string();

    FieldError {
        field: named_field(&message),
        message,
        line: err.line(),
        column: err.column(),
    }
}

/// Pull the field name out of serde's "missing field `x`" style messages
fn named_field(message: &str) -> Option<String> {
    let start = message.find("field `")? + "field `".len();
    let len = message[start..].find('`')?;
    Some(message[start..start + len].to_string())
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_named_field() {
        assert_eq!(named_field("missing field `id`"), Some("id".to_string()));
        assert_eq!(
            named_field("duplicate field `title`"),
            Some("title".to_string())
        );
        assert_eq!(named_field("invalid type: integer `5`"), None);
    }
}
