use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{CallLogId, LeadId};
use crate::validation::{Validate, ValidationErrors};
use crate::view::Record;

/// A logged phone call with a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLog {
    pub id: CallLogId,
    #[serde(default)]
    pub lead_id: LeadId,
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "crate::records::text")]
    pub date: String,
    /// Free text, usually minutes (`"15"` or `"15 min"`).
    #[serde(default, deserialize_with = "crate::records::text")]
    pub duration: String,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub notes: String,
}

impl CallLog {
    /// The editable fields of this call.
    #[must_use]
    pub fn to_draft(&self) -> CallLogDraft {
        CallLogDraft {
            lead_id: self.lead_id.clone(),
            date: self.date.clone(),
            duration: self.duration.clone(),
            notes: self.notes.clone(),
        }
    }

    /// Minutes taken from the leading digits of `duration`, if there are any.
    #[must_use]
    pub fn duration_minutes(&self) -> Option<u32> {
        let digits: String = self
            .duration
            .trim_start()
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().ok()
    }
}

impl Record for CallLog {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        let value: &str = match key {
            "id" => self.id.as_str(),
            "leadId" => self.lead_id.as_str(),
            "date" => &self.date,
            "duration" => &self.duration,
            "notes" => &self.notes,
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

/// The call log form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallLogDraft {
    pub lead_id: LeadId,
    pub date: String,
    pub duration: String,
    pub notes: String,
}

impl CallLogDraft {
    /// Trim the free-text fields the way the form does before submitting.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.duration = self.duration.trim().to_owned();
        self.notes = self.notes.trim().to_owned();
        self
    }
}

impl Validate for CallLogDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.lead_id.is_blank() {
            errors.add("leadId", "Please select a lead");
        }
        errors.require("date", "Date", &self.date);
        errors.require("duration", "Duration", &self.duration);
        errors.into_result()
    }
}
