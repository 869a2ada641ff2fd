//! REST resources the console manages.

use std::fmt;

use crm_console_core::{
    CallLog, CallLogDraft, CallLogId, FollowUp, FollowUpDraft, FollowUpId, Lead, LeadDraft,
    LeadId, LeadStatus, Opportunity, OpportunityDraft, OpportunityId, Record, User, UserDraft,
    UserId, Validate,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A status change offered as a row action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// Mark a lead as converted to an opportunity.
    Convert,
}

impl Transition {
    /// Row action key that triggers this transition.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Convert => "convert",
        }
    }

    /// The transition behind a row action key, if the action is one.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "convert" => Some(Self::Convert),
            _ => None,
        }
    }

    /// Success notice for a record of kind `singular`.
    #[must_use]
    pub fn done_message(self, singular: &str) -> String {
        match self {
            Self::Convert => format!("{} converted to opportunity!", capitalize(singular)),
        }
    }
}

/// A record type served at `/{PATH}`.
pub trait Resource:
    Record + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static
{
    /// Typed record id.
    type Id: Clone + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static;
    /// Form fields sent on create and update.
    type Draft: Serialize + Validate + Clone + fmt::Debug + Send + Sync + 'static;

    /// Collection path segment.
    const PATH: &'static str;
    /// Lowercase singular noun used in notices (`lead`, `call log`).
    const SINGULAR: &'static str;
    /// Lowercase plural noun used in notices and table footers.
    const PLURAL: &'static str;
    /// Warning shown when a draft fails validation.
    const REQUIRED_MESSAGE: &'static str;

    /// This record's id.
    fn id(&self) -> &Self::Id;

    /// The editable fields of this record.
    fn to_draft(&self) -> Self::Draft;

    /// Whether `transition` can be applied to this record.
    fn allows(&self, _transition: Transition) -> bool {
        false
    }

    /// The fields to write back to apply `transition`.
    ///
    /// # Errors
    ///
    /// Returns the reason the transition is unavailable.
    fn transition(&self, transition: Transition) -> Result<Self::Draft, String> {
        Err(format!(
            "{} cannot {}",
            capitalize(Self::PLURAL),
            transition.key()
        ))
    }
}

/// `call log` -> `Call log`.
#[must_use]
pub fn capitalize(noun: &str) -> String {
    let mut chars = noun.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

impl Resource for Lead {
    type Id = LeadId;
    type Draft = LeadDraft;

    const PATH: &'static str = "leads";
    const SINGULAR: &'static str = "lead";
    const PLURAL: &'static str = "leads";
    const REQUIRED_MESSAGE: &'static str = "Name and Email are required";

    fn id(&self) -> &LeadId {
        &self.id
    }

    fn to_draft(&self) -> LeadDraft {
        Self::to_draft(self)
    }

    fn allows(&self, transition: Transition) -> bool {
        match transition {
            Transition::Convert => self.status.is_convertible(),
        }
    }

    fn transition(&self, transition: Transition) -> Result<LeadDraft, String> {
        if !self.allows(transition) {
            return Err(format!("Lead {} is already converted", self.name));
        }
        let mut draft = Self::to_draft(self);
        draft.status = LeadStatus::Converted;
        Ok(draft)
    }
}

impl Resource for Opportunity {
    type Id = OpportunityId;
    type Draft = OpportunityDraft;

    const PATH: &'static str = "opportunities";
    const SINGULAR: &'static str = "opportunity";
    const PLURAL: &'static str = "opportunities";
    const REQUIRED_MESSAGE: &'static str = "Please fill required fields";

    fn id(&self) -> &OpportunityId {
        &self.id
    }

    fn to_draft(&self) -> OpportunityDraft {
        Self::to_draft(self)
    }
}

impl Resource for FollowUp {
    type Id = FollowUpId;
    type Draft = FollowUpDraft;

    const PATH: &'static str = "followUps";
    const SINGULAR: &'static str = "follow-up";
    const PLURAL: &'static str = "follow-ups";
    const REQUIRED_MESSAGE: &'static str = "Title, Date and Lead are required";

    fn id(&self) -> &FollowUpId {
        &self.id
    }

    fn to_draft(&self) -> FollowUpDraft {
        Self::to_draft(self)
    }
}

impl Resource for CallLog {
    type Id = CallLogId;
    type Draft = CallLogDraft;

    const PATH: &'static str = "calls";
    const SINGULAR: &'static str = "call log";
    const PLURAL: &'static str = "call logs";
    const REQUIRED_MESSAGE: &'static str = "All fields except notes are required.";

    fn id(&self) -> &CallLogId {
        &self.id
    }

    fn to_draft(&self) -> CallLogDraft {
        Self::to_draft(self)
    }
}

impl Resource for User {
    type Id = UserId;
    type Draft = UserDraft;

    const PATH: &'static str = "users";
    const SINGULAR: &'static str = "user";
    const PLURAL: &'static str = "users";
    const REQUIRED_MESSAGE: &'static str = "Name and Email are required";

    fn id(&self) -> &UserId {
        &self.id
    }

    fn to_draft(&self) -> UserDraft {
        Self::to_draft(self)
    }
}
