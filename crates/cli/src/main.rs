//! CRM Console CLI.
//!
//! # Usage
//!
//! ```bash
//! # List new website leads, 25 per page
//! crm leads list --source Website --status New --page-size 25
//!
//! # Create and convert a lead
//! crm leads create --name "Jane Smith" --email jane@example.com --rep Alice
//! crm leads convert 7
//!
//! # Pipeline of the last 30 days
//! crm reports pipeline --days 30
//! ```
//!
//! # Commands
//!
//! - `leads` - Leads: list, create, update, delete, convert, print
//! - `opportunities`, `follow-ups`, `calls`, `users` - Record management
//! - `settings` - Show or change console settings
//! - `reports` - Dashboard and pipeline reports
//! - `printers` - Print queues known to the print bridge
//!
//! Set `CRM_API_BASE_URL` (or put it in `.env`) to point at the backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use crm_console_admin::print::SpoolBridge;
use crm_console_admin::screens::LeadsScreen;
use crm_console_admin::{Console, ConsoleConfig, ConsoleError};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::leads::LeadsAction;
use commands::records::{CallsAction, FollowUpsAction, OpportunitiesAction, UsersAction};
use commands::reports::ReportsAction;
use commands::settings::SettingsAction;

#[derive(Parser)]
#[command(name = "crm")]
#[command(author, version, about = "CRM console: leads, pipeline and call tracking")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage leads
    Leads {
        #[command(subcommand)]
        action: LeadsAction,
    },
    /// Manage opportunities
    Opportunities {
        #[command(subcommand)]
        action: OpportunitiesAction,
    },
    /// Manage follow-ups
    FollowUps {
        #[command(subcommand)]
        action: FollowUpsAction,
    },
    /// Manage call logs
    Calls {
        #[command(subcommand)]
        action: CallsAction,
    },
    /// Manage console users
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Console settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Reports
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },
    /// List print queues
    Printers,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crm_console_admin=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConsoleConfig::from_env()?;
    let console = Console::new(config)?;

    match cli.command {
        Commands::Leads { action } => commands::leads::run(&console, action).await?,
        Commands::Opportunities { action } => {
            commands::records::opportunities(&console, action).await?;
        }
        Commands::FollowUps { action } => commands::records::follow_ups(&console, action).await?,
        Commands::Calls { action } => commands::records::calls(&console, action).await?,
        Commands::Users { action } => commands::records::users(&console, action).await?,
        Commands::Settings { action } => commands::settings::run(&console, action).await?,
        Commands::Reports { action } => commands::reports::run(&console, action).await?,
        Commands::Printers => printers(&console).await?,
    }
    Ok(())
}

async fn printers(console: &Console) -> Result<(), ConsoleError> {
    let bridge = SpoolBridge::new(&console.config().print_spool_dir);
    match LeadsScreen::printers(&bridge).await {
        Ok(queues) if queues.is_empty() => commands::emit("No printers found"),
        Ok(queues) => commands::emit(&queues.join("\n")),
        Err(e) => return commands::fail(e.into()),
    }
    Ok(())
}
