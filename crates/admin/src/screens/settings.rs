//! Settings screen: the `/settings/1` singleton.

use crm_console_core::Settings;
use tracing::{info, warn};

use super::Console;
use crate::api::{ApiClient, ApiError};
use crate::error::{ConsoleError, Notice};

const RESOURCE: &str = "settings";

#[derive(Debug)]
pub struct SettingsScreen {
    client: ApiClient,
    settings: Settings,
    notice: Option<Notice>,
}

impl SettingsScreen {
    #[must_use]
    pub fn new(console: &Console) -> Self {
        Self {
            client: console.client().clone(),
            settings: Settings::default(),
            notice: None,
        }
    }

    /// The settings as last loaded or saved.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Fetch the stored settings. A backend that has never stored any yields
    /// the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`.
    pub async fn load(&mut self) -> Result<&Settings, ConsoleError> {
        match self.client.get_settings().await {
            Ok(settings) => self.settings = settings,
            Err(ApiError::NotFound(url)) => {
                info!(%url, "No stored settings, using defaults");
                self.settings = Settings::default();
            }
            Err(source) => {
                let err = ConsoleError::FetchFailed {
                    resource: RESOURCE,
                    source,
                };
                self.notice = Some(err.notice());
                return Err(err);
            }
        }
        Ok(&self.settings)
    }

    /// Replace the stored settings.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::SaveFailed`; the previous settings are kept.
    pub async fn save(&mut self, settings: Settings) -> Result<&Settings, ConsoleError> {
        let settings = Settings {
            id: Settings::singleton_id(),
            ..settings
        };

        match self.client.put_settings(&settings).await {
            Ok(saved) => {
                self.settings = saved;
                self.notice = Some(Notice::success("Settings saved"));
                Ok(&self.settings)
            }
            Err(source) => {
                warn!(error = %source, "Failed to save settings");
                let err = ConsoleError::SaveFailed {
                    action: "save",
                    resource: RESOURCE,
                    source,
                };
                self.notice = Some(err.notice());
                Err(err)
            }
        }
    }

    /// One `Label: value` line per setting.
    #[must_use]
    pub fn render(&self) -> String {
        let rep = if self.settings.default_rep.is_empty() {
            "(none)"
        } else {
            self.settings.default_rep.as_str()
        };
        let notifications = if self.settings.notifications { "on" } else { "off" };
        format!(
            "Notifications: {notifications}\nDefault sales rep: {rep}\nTime zone: {}",
            self.settings.time_zone
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::config::ConsoleConfig;

    fn screen(server: &mockito::ServerGuard) -> SettingsScreen {
        let url = server.url();
        let config =
            ConsoleConfig::from_lookup(|key| (key == "CRM_API_BASE_URL").then(|| url.clone()))
                .unwrap();
        SettingsScreen::new(&Console::new(config).unwrap())
    }

    #[tokio::test]
    async fn test_load_and_save() {
        let mut server = mockito::Server::new_async().await;
        let _get = server
            .mock("GET", "/settings/1")
            .with_status(200)
            .with_body(r#"{"id": 1, "notifications": false, "defaultRep": "Bob", "timeZone": "UTC"}"#)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/settings/1")
            .match_body(Matcher::Json(serde_json::json!({
                "id": 1,
                "notifications": false,
                "defaultRep": "Carol",
                "timeZone": "Europe/Berlin"
            })))
            .with_status(200)
            .with_body(r#"{"id": 1, "notifications": false, "defaultRep": "Carol", "timeZone": "Europe/Berlin"}"#)
            .create_async()
            .await;

        let mut screen = screen(&server);
        let loaded = screen.load().await.unwrap().clone();
        assert_eq!(loaded.default_rep, "Bob");

        screen
            .save(Settings {
                default_rep: "Carol".to_string(),
                time_zone: "Europe/Berlin".to_string(),
                ..loaded
            })
            .await
            .unwrap();
        assert_eq!(screen.notice(), Some(&Notice::success("Settings saved")));
        assert_eq!(
            screen.render(),
            "Notifications: off\nDefault sales rep: Carol\nTime zone: Europe/Berlin"
        );
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_record_uses_defaults() {
        let mut server = mockito::Server::new_async().await;
        let _get = server
            .mock("GET", "/settings/1")
            .with_status(404)
            .with_body("{}")
            .create_async()
            .await;

        let mut screen = screen(&server);
        assert_eq!(screen.load().await.unwrap(), &Settings::default());
        assert_eq!(screen.notice(), None);
        assert!(screen.render().starts_with("Notifications: on\nDefault sales rep: (none)"));
    }

    #[tokio::test]
    async fn test_save_failure_keeps_previous() {
        let mut server = mockito::Server::new_async().await;
        let _put = server
            .mock("PUT", "/settings/1")
            .with_status(500)
            .create_async()
            .await;

        let mut screen = screen(&server);
        let err = screen
            .save(Settings {
                default_rep: "Alice".to_string(),
                ..Settings::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::SaveFailed { .. }));
        assert_eq!(screen.settings().default_rep, "");
        assert_eq!(screen.notice(), Some(&Notice::error("Failed to save settings")));
    }
}
