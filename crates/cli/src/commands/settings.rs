//! `crm settings` commands.

use clap::{Args, Subcommand};
use crm_console_admin::screens::SettingsScreen;
use crm_console_admin::{Console, ConsoleError};
use crm_console_core::Settings;

use super::{emit, emit_notice, fail};

#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show the stored settings
    Show,
    /// Change the given settings and keep the rest
    Set(SettingsFields),
}

#[derive(Args, Debug, Clone, Default)]
pub struct SettingsFields {
    /// Email notifications on or off
    #[arg(long)]
    pub notifications: Option<bool>,
    /// Rep preselected on new records
    #[arg(long)]
    pub default_rep: Option<String>,
    /// IANA time zone name, e.g. `Europe/Berlin`
    #[arg(long)]
    pub time_zone: Option<String>,
}

impl SettingsFields {
    fn apply(self, settings: &Settings) -> Settings {
        Settings {
            notifications: self.notifications.unwrap_or(settings.notifications),
            default_rep: self.default_rep.unwrap_or_else(|| settings.default_rep.clone()),
            time_zone: self.time_zone.unwrap_or_else(|| settings.time_zone.clone()),
            ..settings.clone()
        }
    }
}

/// Run one `crm settings` action.
///
/// # Errors
///
/// Returns the console error after printing its notice.
pub async fn run(console: &Console, action: SettingsAction) -> Result<(), ConsoleError> {
    let mut screen = SettingsScreen::new(console);
    if let Err(e) = screen.load().await {
        return fail(e);
    }

    match action {
        SettingsAction::Show => {
            emit(&screen.render());
            Ok(())
        }
        SettingsAction::Set(fields) => {
            let settings = fields.apply(screen.settings());
            let result = screen.save(settings).await.map(|_| ());
            emit_notice(screen.notice());
            result?;
            emit(&screen.render());
            Ok(())
        }
    }
}
