//! Error types for the modal form state machines.
//!
//! Neither type ever escapes to the user directly: `FormError` is folded into
//! the generic `submit` entry of a form's error map and `LookupError` into the
//! `email` entry.

use thiserror::Error;

/// Unexpected failures while saving a form
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("form is not open")]
    Closed,
    #[error("draft is missing a value for {0}")]
    IncompleteDraft(&'static str),
}

/// Failures of the contact email uniqueness lookup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Request(String),
    #[error("lookup returned an unreadable response: {0}")]
    Response(String),
}
