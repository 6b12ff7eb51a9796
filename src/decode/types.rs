//! Decoder types
//!
//! Defines the expected response shapes and structured field errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level JSON shape an endpoint answers with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// `{ ... }` decoded into a single record
    #[default]
    Object,
    /// `[ ... ]` decoded into a sequence of records
    BareArray,
}

impl ResponseShape {
    /// The byte a JSON document of this shape starts with
    pub(crate) fn opening_byte(self) -> u8 {
        match self {
            ResponseShape::Object => b'{',
            ResponseShape::BareArray => b'[',
        }
    }
}

impl fmt::Display for ResponseShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseShape::Object => f.write_str("object"),
            ResponseShape::BareArray => f.write_str("array"),
        }
    }
}

/// Result of [`decode`](super::decode): one record or many
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Decoded<T> {
    /// Number of records decoded
    pub fn len(&self) -> usize {
        match self {
            Decoded::One(_) => 1,
            Decoded::Many(items) => items.len(),
        }
    }

    /// True when a bare array was empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into a list regardless of shape
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Decoded::One(item) => vec![item],
            Decoded::Many(items) => items,
        }
    }
}

/// A single structured decode failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Offending field, when the decoder could name it
    pub field: Option<String>,
    /// Decoder message without position suffix
    pub message: String,
    /// 1-based line in the response body (0 if unknown)
    pub line: usize,
    /// 1-based column in the response body (0 if unknown)
    pub column: usize,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{field}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
