//! Response decoder module
//!
//! Supports: single JSON object, bare JSON array
//!
//! # Overview
//!
//! The API is inconsistent about whether an endpoint answers with a wrapping
//! object or a top-level list, so the caller states the expected
//! [`ResponseShape`] and the decoder checks it instead of guessing. Decoding is
//! strict about required fields and lenient about unknown ones; any mismatch
//! is reported as [`Error::Validation`](crate::Error::Validation) carrying the
//! raw response text.

mod decoders;
mod types;

pub use decoders::{decode, decode_array, decode_object};
pub use types::{Decoded, FieldError, ResponseShape};
