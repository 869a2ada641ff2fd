use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{Email, LeadId, LeadSource, LeadStatus};
use crate::validation::{Validate, ValidationErrors};
use crate::view::Record;

/// A prospective customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub email: String,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub phone: String,
    #[serde(default = "LeadSource::unset")]
    pub source: LeadSource,
    #[serde(default)]
    pub status: LeadStatus,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub rep: String,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub notes: String,
    /// Creation timestamp (RFC 3339 or `YYYY-MM-DD`), when the record has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Lead {
    /// The editable fields of this lead, for an edit form or a status write-back.
    #[must_use]
    pub fn to_draft(&self) -> LeadDraft {
        LeadDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            source: self.source.clone(),
            status: self.status.clone(),
            rep: self.rep.clone(),
            notes: self.notes.clone(),
            created_at: self.created_at.clone(),
        }
    }
}

impl Record for Lead {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        let value: &str = match key {
            "id" => self.id.as_str(),
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "source" => self.source.label(),
            "status" => self.status.label(),
            "rep" => &self.rep,
            "notes" => &self.notes,
            "createdAt" => self.created_at.as_deref().unwrap_or_default(),
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

/// The lead form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub rep: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Default for LeadDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            source: LeadSource::unset(),
            status: LeadStatus::New,
            rep: String::new(),
            notes: String::new(),
            created_at: None,
        }
    }
}

impl LeadDraft {
    /// A new lead with the two required fields filled in.
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// A hint for an email that is present but does not look like an
    /// address. Never blocks a submit; only presence is required.
    #[must_use]
    pub fn email_warning(&self) -> Option<String> {
        if self.email.trim().is_empty() {
            return None;
        }
        Email::parse(&self.email)
            .err()
            .map(|e| format!("Email looks invalid: {e}"))
    }
}

impl Validate for LeadDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", "Name", &self.name);
        errors.require("email", "Email", &self.email);
        errors.into_result()
    }
}
