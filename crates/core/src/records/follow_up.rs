use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{FollowUpId, LeadId};
use crate::validation::{Validate, ValidationErrors};
use crate::view::Record;

/// A scheduled follow-up with a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: FollowUpId,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub title: String,
    /// `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "crate::records::text")]
    pub date: String,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub notes: String,
    #[serde(default)]
    pub lead_id: LeadId,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub rep: String,
}

impl FollowUp {
    /// The editable fields of this follow-up.
    #[must_use]
    pub fn to_draft(&self) -> FollowUpDraft {
        FollowUpDraft {
            title: self.title.clone(),
            date: self.date.clone(),
            notes: self.notes.clone(),
            lead_id: self.lead_id.clone(),
            rep: self.rep.clone(),
        }
    }
}

impl Record for FollowUp {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        let value: &str = match key {
            "id" => self.id.as_str(),
            "title" => &self.title,
            "date" => &self.date,
            "notes" => &self.notes,
            "leadId" => self.lead_id.as_str(),
            "rep" => &self.rep,
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

/// The follow-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpDraft {
    pub title: String,
    pub date: String,
    pub notes: String,
    pub lead_id: LeadId,
    pub rep: String,
}

impl Validate for FollowUpDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("title", "Title", &self.title);
        errors.require("date", "Date", &self.date);
        if self.lead_id.is_blank() {
            errors.add("leadId", "Please select a lead");
        }
        errors.into_result()
    }
}
