//! `crm leads` commands.

use clap::{Args, Subcommand};
use crm_console_admin::controller::Mutation;
use crm_console_admin::print::SpoolBridge;
use crm_console_admin::screens::LeadsScreen;
use crm_console_admin::{Console, ConsoleError, Notice};
use crm_console_core::{Lead, LeadDraft, LeadId, LeadSource, LeadStatus};

use super::{ListArgs, check_filters, emit, emit_notice, fail};

#[derive(Subcommand, Debug)]
pub enum LeadsAction {
    /// List leads
    List {
        #[command(flatten)]
        list: ListArgs,
        #[command(flatten)]
        filters: LeadFilters,
    },
    /// Create a lead
    Create {
        #[command(flatten)]
        fields: LeadFields,
    },
    /// Change fields of a lead
    Update {
        id: LeadId,
        #[command(flatten)]
        fields: LeadFields,
    },
    /// Delete a lead
    Delete { id: LeadId },
    /// Mark a lead as converted to an opportunity
    Convert { id: LeadId },
    /// Print every lead matching the filters
    Print {
        /// Print queue (defaults to `CRM_DEFAULT_PRINTER`)
        #[arg(long)]
        printer: Option<String>,
        #[arg(short, long)]
        search: Option<String>,
        #[command(flatten)]
        filters: LeadFilters,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LeadFilters {
    /// Only leads from this source
    #[arg(long)]
    pub source: Option<LeadSource>,
    /// Only leads in this status
    #[arg(long)]
    pub status: Option<LeadStatus>,
}

impl LeadFilters {
    fn pairs(&self) -> [(&'static str, Option<String>); 2] {
        [
            ("source", self.source.as_ref().map(ToString::to_string)),
            ("status", self.status.as_ref().map(ToString::to_string)),
        ]
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct LeadFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub source: Option<LeadSource>,
    #[arg(long)]
    pub status: Option<LeadStatus>,
    #[arg(long)]
    pub rep: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl LeadFields {
    /// Overwrite the fields that were given.
    fn apply(self, draft: &mut LeadDraft) {
        if let Some(v) = self.name {
            draft.name = v;
        }
        if let Some(v) = self.email {
            draft.email = v;
        }
        if let Some(v) = self.phone {
            draft.phone = v;
        }
        if let Some(v) = self.source {
            draft.source = v;
        }
        if let Some(v) = self.status {
            draft.status = v;
        }
        if let Some(v) = self.rep {
            draft.rep = v;
        }
        if let Some(v) = self.notes {
            draft.notes = v;
        }
    }
}

/// Run one `crm leads` action.
///
/// # Errors
///
/// Returns the console error after printing its notice.
pub async fn run(console: &Console, action: LeadsAction) -> Result<(), ConsoleError> {
    let mut screen = LeadsScreen::new(console);

    let mutation: Mutation<Lead> = match action {
        LeadsAction::List { list, filters } => {
            if let Err(e) = check_filters(screen.view(), &filters.pairs()) {
                return fail(e);
            }
            if let Err(e) = screen.load().await {
                return fail(e);
            }
            list.apply(screen.view_mut().state_mut(), &filters.pairs());
            let page = screen.view().page();
            emit(&screen.render(&page));
            return Ok(());
        }
        LeadsAction::Print {
            printer,
            search,
            filters,
        } => {
            if let Err(e) = check_filters(screen.view(), &filters.pairs()) {
                return fail(e);
            }
            if let Err(e) = screen.load().await {
                return fail(e);
            }
            let list = ListArgs {
                search,
                ..ListArgs::default()
            };
            list.apply(screen.view_mut().state_mut(), &filters.pairs());
            let bridge = SpoolBridge::new(&console.config().print_spool_dir);
            emit_notice(Some(&Notice::info("Connecting and printing...")));
            let result = screen.print(&bridge, printer.as_deref()).await;
            emit_notice(screen.view().notice());
            return result.map(|_| ());
        }
        LeadsAction::Create { fields } => {
            let mut draft = LeadDraft::default();
            fields.apply(&mut draft);
            Mutation::Create(draft)
        }
        LeadsAction::Update { id, fields } => {
            let mut draft = match screen.view_mut().fetch(&id).await {
                Ok(lead) => lead.to_draft(),
                Err(e) => return fail(e),
            };
            fields.apply(&mut draft);
            Mutation::Update(id, draft)
        }
        LeadsAction::Delete { id } => Mutation::Delete(id),
        LeadsAction::Convert { id } => {
            let result = screen.convert(id).await;
            emit_notice(screen.view().notice());
            return result.map(|_| ());
        }
    };

    if let Mutation::Create(draft) | Mutation::Update(_, draft) = &mutation
        && let Some(hint) = draft.email_warning()
    {
        emit_notice(Some(&Notice::warning(hint)));
    }

    let result = screen.mutate(mutation).await;
    emit_notice(screen.view().notice());
    result.map(|_| ())
}
