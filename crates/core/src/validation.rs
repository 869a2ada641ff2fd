//! Pre-submit form validation.
//!
//! Validation runs before any request is built. A draft that fails never
//! reaches the network; the errors annotate the offending fields instead.

use core::fmt;

use serde::Serialize;

/// Field-level validation failures, in the order the fields appear on the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<(String, String)>,
}

impl ValidationErrors {
    /// No errors.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Record a failure for a field. A second failure for the same field is ignored.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        if self.field(field).is_none() {
            self.errors.push((field.to_owned(), message.into()));
        }
    }

    /// Record `"<label> is required"` when `value` is blank.
    pub fn require(&mut self, field: &str, label: &str, value: &str) {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
        }
    }

    /// Whether every field passed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// The message for one field, if it failed.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    /// Iterate `(field, message)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// `Ok(())` when empty, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one field failed.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|(_, m)| m.as_str()).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A form draft that can be checked before submission.
pub trait Validate {
    /// Check required fields and formats.
    ///
    /// # Errors
    ///
    /// Returns every failing field.
    fn validate(&self) -> Result<(), ValidationErrors>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_and_display() {
        let mut errors = ValidationErrors::new();
        errors.require("name", "Name", "  ");
        errors.require("email", "Email", "");
        errors.require("phone", "Phone", "555");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.field("name"), Some("Name is required"));
        assert_eq!(errors.field("phone"), None);
        assert_eq!(errors.to_string(), "Name is required; Email is required");
    }

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email is required");
        errors.add("email", "Email is invalid");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.field("email"), Some("Email is required"));
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());
        let mut errors = ValidationErrors::new();
        errors.add("date", "Date is required");
        assert!(errors.into_result().is_err());
    }
}
