//! Unified error handling for the console.
//!
//! Every failure a screen can hit maps to exactly one [`Notice`]. Nothing is
//! retried and nothing is fatal: the screen keeps its last good snapshot and
//! the user decides what to do next.

use std::fmt;

use crm_console_core::ValidationErrors;
use serde::Serialize;
use thiserror::Error;

use crate::api::ApiError;
use crate::print::PrintError;

/// Console-level error type.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// Loading a collection or record failed.
    #[error("Failed to fetch {resource}: {source}")]
    FetchFailed {
        resource: &'static str,
        #[source]
        source: ApiError,
    },

    /// A create, update or transition write failed.
    #[error("Failed to {action} {resource}: {source}")]
    SaveFailed {
        action: &'static str,
        resource: &'static str,
        #[source]
        source: ApiError,
    },

    /// A delete failed.
    #[error("Failed to delete {resource}: {source}")]
    DeleteFailed {
        resource: &'static str,
        #[source]
        source: ApiError,
    },

    /// The form has missing or malformed fields. No request was sent.
    #[error("{message}: {errors}")]
    ValidationFailed {
        message: &'static str,
        errors: ValidationErrors,
    },

    /// A dropdown filter was given a value it does not offer.
    #[error("Unknown {filter} \"{value}\"")]
    UnknownFilterValue {
        filter: String,
        value: String,
        options: Vec<String>,
    },

    /// The row action does not apply to the record in its current state.
    #[error("{0}")]
    TransitionUnavailable(String),

    /// Print export failed.
    #[error("Print error: {0}")]
    Print(#[from] PrintError),
}

impl ConsoleError {
    /// The transient message to show for this failure.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::FetchFailed { resource, .. } => {
                Notice::error(format!("Failed to fetch {resource}"))
            }
            Self::SaveFailed {
                action, resource, ..
            } => Notice::error(format!("Failed to {action} {resource}")),
            Self::DeleteFailed { resource, .. } => {
                Notice::error(format!("Failed to delete {resource}"))
            }
            Self::ValidationFailed { message, .. } => Notice::warning(*message),
            Self::UnknownFilterValue {
                filter,
                value,
                options,
            } => Notice::warning(format!(
                "Unknown {filter} \"{value}\". Choose one of: {}",
                options.join(", ")
            )),
            Self::TransitionUnavailable(reason) => Notice::warning(reason.clone()),
            Self::Print(PrintError::NoPrinterSelected) => {
                Notice::warning("Please select a printer first.")
            }
            Self::Print(_) => Notice::error("Failed to print. Is the print bridge running?"),
        }
    }
}

/// Notice severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    /// Lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transient status message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    /// A notice with the given severity.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}
