use serde::{Deserialize, Serialize};

use crate::types::SettingsId;

/// Console preferences, stored as the single record `/settings/1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "Settings::singleton_id")]
    pub id: SettingsId,
    #[serde(default = "default_true")]
    pub notifications: bool,
    #[serde(default, deserialize_with = "crate::records::text")]
    pub default_rep: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

const fn default_true() -> bool {
    true
}

fn default_time_zone() -> String {
    "UTC".to_owned()
}

impl Settings {
    /// Id of the one settings record.
    #[must_use]
    pub fn singleton_id() -> SettingsId {
        SettingsId::from(1)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            id: Self::singleton_id(),
            notifications: true,
            default_rep: String::new(),
            time_zone: default_time_zone(),
        }
    }
}
