//! Flat records served by the REST mock, and the drafts the forms submit.
//!
//! Records reference each other only through `leadId`. Nothing here checks
//! that a referenced lead exists; deleting a lead leaves its opportunities,
//! follow-ups and calls pointing at nothing.

mod call_log;
mod follow_up;
mod lead;
mod opportunity;
mod settings;
mod user;

use std::borrow::Cow;

pub use call_log::{CallLog, CallLogDraft};
pub use follow_up::{FollowUp, FollowUpDraft};
pub use lead::{Lead, LeadDraft};
pub use opportunity::{Opportunity, OpportunityDraft};
pub use settings::Settings;
pub use user::{NEVER_LOGGED_IN, User, UserDraft};

use crate::view::Record;

/// Placeholder shown when a referenced lead cannot be found.
pub const MISSING_LEAD_NAME: &str = "—";

/// Deserialize a text field, treating `null` as an empty string.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    struct TextVisitor;

    impl serde::de::Visitor<'_> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.write_str("a string, number or null")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: serde::de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

/// A record joined with the display name of the lead it references.
#[derive(Debug, Clone, PartialEq)]
pub struct WithLead<R> {
    /// The underlying record.
    pub record: R,
    /// Name of the referenced lead, or [`MISSING_LEAD_NAME`].
    pub lead_name: String,
}

impl<R> WithLead<R> {
    /// Join a record with its lead name, falling back to the placeholder.
    pub fn new(record: R, lead_name: Option<&str>) -> Self {
        Self {
            record,
            lead_name: lead_name.unwrap_or(MISSING_LEAD_NAME).to_owned(),
        }
    }
}

impl<R: Record> Record for WithLead<R> {
    fn record_id(&self) -> &str {
        self.record.record_id()
    }

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        if key == "leadName" {
            return Some(Cow::Borrowed(&self.lead_name));
        }
        self.record.field(key)
    }
}
