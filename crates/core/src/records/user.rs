use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::types::{Email, UserId, UserRole};
use crate::validation::{Validate, ValidationErrors};
use crate::view::Record;

/// `lastLogin` value for users who have never signed in.
pub const NEVER_LOGGED_IN: &str = "Never";

/// A console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub name: String,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub last_login: String,
}

impl User {
    /// The editable fields of this user.
    #[must_use]
    pub fn to_draft(&self) -> UserDraft {
        UserDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            last_login: self.last_login.clone(),
        }
    }
}

impl Record for User {
    fn record_id(&self) -> &str {
        self.id.as_str()
    }

    fn field(&self, key: &str) -> Option<Cow<'_, str>> {
        let value: &str = match key {
            "id" => self.id.as_str(),
            "name" => &self.name,
            "email" => &self.email,
            "role" => self.role.label(),
            "lastLogin" => &self.last_login,
            _ => return None,
        };
        Some(Cow::Borrowed(value))
    }
}

/// The user form. New users start with `lastLogin` set to `Never`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub last_login: String,
}

impl Default for UserDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            role: UserRole::default(),
            last_login: NEVER_LOGGED_IN.to_owned(),
        }
    }
}

impl Validate for UserDraft {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", "Name", &self.name);
        errors.require("email", "Email", &self.email);
        if let Err(e) = Email::parse(&self.email) {
            errors.add("email", format!("Email is invalid: {e}"));
        }
        errors.into_result()
    }
}
