use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{Amount, LeadId, OpportunityId, OpportunityStatus};
use crate::validation::{Validate, ValidationErrors};
use crate::view::Record;

/// A potential deal attached to a lead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: OpportunityId,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub name: String,
    #[serde(default)]
    pub value: Amount,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub rep: String,
    #[serde(default)]
    pub status: OpportunityStatus,
    /// Expected close date, `YYYY-MM-DD`.
    #[serde(default, deserialize_with = "crate::records::text")]
    pub close_date: String,
    #[serde(default)]
    pub lead_id: LeadId,
}

impl Opportunity {
    /// The editable fields of this opportunity.
    #[must_use]
    pub fn to_draft(&self) -> OpportunityDraft {
        OpportunityDraft {
            name: self.name.clone(),
            value: self.value,
            rep: self.rep.clone(),
            status: self.status.clone(),
            close_date: self.close_date.clone(),
            lead_id: self.lead_id.clone(),
        }
    }
}

impl Record for Opportunity {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        let value: &str = match key {
            "id" => self.id.as_str(),
            "name" => &self.name,
            "value" => return Some(Cow::Owned(self.value.display())),
            "rep" => &self.rep,
            "status" => self.status.label(),
            "closeDate" => &self.close_date,
            "leadId" => self.lead_id.as_str(),
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

/// The opportunity form.
///
/// `value` is already coerced from its input text (see [`Amount::from_input`]),
/// so a non-numeric entry arrives here as zero and fails the positive-value
/// check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityDraft {
    pub name: String,
    pub value: Amount,
    pub rep: String,
    pub status: OpportunityStatus,
    pub close_date: String,
    pub lead_id: LeadId,
}

impl Validate for OpportunityDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", "Name", &self.name);
        if self.lead_id.is_blank() {
            errors.add("leadId", "Please select a lead");
        }
        if !self.value.is_positive() {
            errors.add("value", "Value must be a positive number");
        }
        errors.require("rep", "Rep", &self.rep);
        errors.into_result()
    }
}
