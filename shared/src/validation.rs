//! Field validation primitives shared by the modal forms.
//!
//! Error maps are keyed by the record's field name (`company_name`, `email`,
//! ...). The special key [`SUBMIT_FIELD`] holds the generic error for an
//! unexpected failure during save.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

/// Error map key for unexpected save failures
pub const SUBMIT_FIELD: &str = "submit";

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const EMAIL_IN_USE_MESSAGE: &str = "This email is already in use";
pub const EMAIL_UNVERIFIED_MESSAGE: &str = "Unable to verify email";
pub const SELECT_PRODUCT_MESSAGE: &str = "Please select a product";
pub const SUBMIT_FAILED_MESSAGE: &str = "Something went wrong while saving. Please try again.";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Turn a field name into a display label: `company_name` -> `Company Name`
pub fn humanize(field: &str) -> String {
    field
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn required_message(field: &str) -> String {
    format!("{} is required", humanize(field))
}

pub fn non_negative_message(field: &str) -> String {
    format!("{} must be a positive number", humanize(field))
}

/// Loose `local@domain.tld` check
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Field name -> message. Any entry blocks saving.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert(field.to_string(), message.into());
    }

    pub fn remove(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(field, message)| (field.as_str(), message.as_str()))
    }
}

/// Fields the user has visited. Only affects whether an error is displayed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TouchedSet {
    fields: BTreeSet<String>,
}

impl TouchedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn touch(&mut self, field: &str) {
        self.fields.insert(field.to_string());
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.fields.contains(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

/// Result of a submit attempt
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<D> {
    /// A save was already in flight
    Ignored,
    /// At least one field failed validation; nothing is emitted
    Invalid,
    /// Unexpected failure, reported through the `submit` error
    Failed,
    /// Validation passed; the draft should be emitted to the parent
    Saved(D),
}

impl<D> SubmitOutcome<D> {
    pub fn saved(self) -> Option<D> {
        match self {
            SubmitOutcome::Saved(draft) => Some(draft),
            _ => None,
        }
    }
}
