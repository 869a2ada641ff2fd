//! `crm opportunities`, `crm follow-ups`, `crm calls` and `crm users`.

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use crm_console_admin::api::Resource;
use crm_console_admin::controller::{DataView, Mutation};
use crm_console_admin::screens::{
    CallsScreen, FollowUpsScreen, LeadLinked, LinkedScreen, OpportunitiesScreen, ReportsScreen,
    UsersScreen,
};
use crm_console_admin::screens::reports::render_call_analytics;
use crm_console_admin::{Console, ConsoleError};
use crm_console_core::{
    Amount, CallLogDraft, CallLogId, FollowUpDraft, FollowUpId, LeadId, OpportunityDraft,
    OpportunityId, OpportunityStatus, UserDraft, UserId, UserRole,
};

use super::{ListArgs, check_filters, emit, emit_notice, fail};

/// A create, update or delete parsed from one of the record commands.
enum Write<Id, F> {
    Create(F),
    Update(Id, F),
    Delete(Id),
}

fn set_given<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

/// Fill an omitted date flag with `today`, as the forms pre-fill it.
fn date_or_today(slot: &mut Option<String>, today: NaiveDate) {
    slot.get_or_insert_with(|| today.to_string());
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

// =============================================================================
// Opportunities
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum OpportunitiesAction {
    /// List opportunities
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only opportunities in this stage
        #[arg(long)]
        status: Option<OpportunityStatus>,
        /// Only opportunities of this rep
        #[arg(long)]
        rep: Option<String>,
    },
    /// Create an opportunity
    Create {
        #[command(flatten)]
        fields: OpportunityFields,
    },
    /// Change fields of an opportunity
    Update {
        id: OpportunityId,
        #[command(flatten)]
        fields: OpportunityFields,
    },
    /// Delete an opportunity
    Delete { id: OpportunityId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct OpportunityFields {
    #[arg(long)]
    pub name: Option<String>,
    /// Deal value, e.g. `5000` or `1250.50`
    #[arg(long)]
    pub value: Option<String>,
    #[arg(long)]
    pub rep: Option<String>,
    #[arg(long)]
    pub status: Option<OpportunityStatus>,
    /// Expected close date, `YYYY-MM-DD` (today when creating)
    #[arg(long)]
    pub close_date: Option<String>,
    /// Id of the lead this deal belongs to
    #[arg(long)]
    pub lead: Option<LeadId>,
}

impl FieldsFor<OpportunityDraft> for OpportunityFields {
    fn apply(self, draft: &mut OpportunityDraft) {
        set_given(&mut draft.name, self.name);
        set_given(&mut draft.value, self.value.as_deref().map(Amount::from_input));
        set_given(&mut draft.rep, self.rep);
        set_given(&mut draft.status, self.status);
        set_given(&mut draft.close_date, self.close_date);
        set_given(&mut draft.lead_id, self.lead);
    }
}

/// Run one `crm opportunities` action.
///
/// # Errors
///
/// Returns the console error after printing its notice.
pub async fn opportunities(
    console: &Console,
    action: OpportunitiesAction,
) -> Result<(), ConsoleError> {
    let mut screen = OpportunitiesScreen::opportunities(console);
    match action {
        OpportunitiesAction::List { list, status, rep } => {
            let filters = [("status", status.as_ref().map(ToString::to_string)), ("rep", rep)];
            list_linked(&mut screen, &list, &filters).await?;
            emit(&format!("Total value: {}", screen.filtered_value().display()));
            Ok(())
        }
        OpportunitiesAction::Create { mut fields } => {
            date_or_today(&mut fields.close_date, today());
            write_linked(&mut screen, Write::Create(fields)).await
        }
        OpportunitiesAction::Update { id, fields } => {
            write_linked(&mut screen, Write::Update(id, fields)).await
        }
        OpportunitiesAction::Delete { id } => write_linked(&mut screen, Write::<_, OpportunityFields>::Delete(id)).await,
    }
}

// =============================================================================
// Follow-ups
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum FollowUpsAction {
    /// List follow-ups
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only follow-ups of this rep
        #[arg(long)]
        rep: Option<String>,
        /// Only follow-ups on this day, `YYYY-MM-DD`
        #[arg(long)]
        date: Option<String>,
    },
    /// Create a follow-up
    Create {
        #[command(flatten)]
        fields: FollowUpFields,
    },
    /// Change fields of a follow-up
    Update {
        id: FollowUpId,
        #[command(flatten)]
        fields: FollowUpFields,
    },
    /// Delete a follow-up
    Delete { id: FollowUpId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct FollowUpFields {
    #[arg(long)]
    pub title: Option<String>,
    /// Due date, `YYYY-MM-DD`
    #[arg(long)]
    pub date: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
    /// Id of the lead to follow up with
    #[arg(long)]
    pub lead: Option<LeadId>,
    #[arg(long)]
    pub rep: Option<String>,
}

impl FieldsFor<FollowUpDraft> for FollowUpFields {
    fn apply(self, draft: &mut FollowUpDraft) {
        set_given(&mut draft.title, self.title);
        set_given(&mut draft.date, self.date);
        set_given(&mut draft.notes, self.notes);
        set_given(&mut draft.lead_id, self.lead);
        set_given(&mut draft.rep, self.rep);
    }
}

/// Run one `crm follow-ups` action.
///
/// # Errors
///
/// Returns the console error after printing its notice.
pub async fn follow_ups(console: &Console, action: FollowUpsAction) -> Result<(), ConsoleError> {
    let mut screen = FollowUpsScreen::follow_ups(console);
    match action {
        FollowUpsAction::List { list, rep, date } => {
            list_linked(&mut screen, &list, &[("rep", rep), ("date", date)]).await
        }
        FollowUpsAction::Create { fields } => {
            write_linked(&mut screen, Write::Create(fields)).await
        }
        FollowUpsAction::Update { id, fields } => {
            write_linked(&mut screen, Write::Update(id, fields)).await
        }
        FollowUpsAction::Delete { id } => write_linked(&mut screen, Write::<_, FollowUpFields>::Delete(id)).await,
    }
}

// =============================================================================
// Calls
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum CallsAction {
    /// List call logs
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only calls on this day, `YYYY-MM-DD`
        #[arg(long)]
        date: Option<String>,
    },
    /// Calls per day and per lead, with average duration
    Analytics,
    /// Create a call log
    Create {
        #[command(flatten)]
        fields: CallFields,
    },
    /// Change fields of a call log
    Update {
        id: CallLogId,
        #[command(flatten)]
        fields: CallFields,
    },
    /// Delete a call log
    Delete { id: CallLogId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct CallFields {
    /// Id of the lead that was called
    #[arg(long)]
    pub lead: Option<LeadId>,
    /// Day of the call, `YYYY-MM-DD` (today when creating)
    #[arg(long)]
    pub date: Option<String>,
    /// Length in minutes
    #[arg(long)]
    pub duration: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

impl FieldsFor<CallLogDraft> for CallFields {
    fn apply(self, draft: &mut CallLogDraft) {
        set_given(&mut draft.lead_id, self.lead);
        set_given(&mut draft.date, self.date);
        set_given(&mut draft.duration, self.duration);
        set_given(&mut draft.notes, self.notes);
    }
}

/// Run one `crm calls` action.
///
/// # Errors
///
/// Returns the console error after printing its notice.
pub async fn calls(console: &Console, action: CallsAction) -> Result<(), ConsoleError> {
    let mut screen = CallsScreen::calls(console);
    match action {
        CallsAction::List { list, date } => {
            list_linked(&mut screen, &list, &[("date", date)]).await
        }
        CallsAction::Analytics => match ReportsScreen::new(console).call_analytics().await {
            Ok(analytics) => {
                emit(&render_call_analytics(&analytics));
                Ok(())
            }
            Err(e) => fail(e),
        },
        CallsAction::Create { mut fields } => {
            date_or_today(&mut fields.date, today());
            let mut draft = CallLogDraft::default();
            fields.apply(&mut draft);
            let result = screen.save(None, draft).await;
            emit_notice(screen.view().notice());
            result.map(|_| ())
        }
        CallsAction::Update { id, fields } => {
            let mut draft = match screen.view_mut().fetch(&id).await {
                Ok(call) => call.to_draft(),
                Err(e) => return fail(e),
            };
            fields.apply(&mut draft);
            let result = screen.save(Some(id), draft).await;
            emit_notice(screen.view().notice());
            result.map(|_| ())
        }
        CallsAction::Delete { id } => write_linked(&mut screen, Write::<_, CallFields>::Delete(id)).await,
    }
}

// =============================================================================
// Users
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum UsersAction {
    /// List users
    List {
        #[command(flatten)]
        list: ListArgs,
        /// Only users with this role
        #[arg(long)]
        role: Option<UserRole>,
    },
    /// Create a user
    Create {
        #[command(flatten)]
        fields: UserFields,
    },
    /// Change fields of a user
    Update {
        id: UserId,
        #[command(flatten)]
        fields: UserFields,
    },
    /// Delete a user
    Delete { id: UserId },
}

#[derive(Args, Debug, Clone, Default)]
pub struct UserFields {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub role: Option<UserRole>,
}

impl FieldsFor<UserDraft> for UserFields {
    fn apply(self, draft: &mut UserDraft) {
        set_given(&mut draft.name, self.name);
        set_given(&mut draft.email, self.email);
        set_given(&mut draft.role, self.role);
    }
}

/// Run one `crm users` action.
///
/// # Errors
///
/// Returns the console error after printing its notice.
pub async fn users(console: &Console, action: UsersAction) -> Result<(), ConsoleError> {
    let mut view = UsersScreen::users(console);
    match action {
        UsersAction::List { list, role } => {
            let filters = [("role", role.as_ref().map(ToString::to_string))];
            if let Err(e) = check_filters(&view, &filters) {
                return fail(e);
            }
            if let Err(e) = view.load().await {
                return fail(e);
            }
            list.apply(view.state_mut(), &filters);
            emit(&view.render(&view.page()));
            Ok(())
        }
        UsersAction::Create { fields } => write_view(&mut view, Write::Create(fields)).await,
        UsersAction::Update { id, fields } => {
            write_view(&mut view, Write::Update(id, fields)).await
        }
        UsersAction::Delete { id } => write_view(&mut view, Write::<_, UserFields>::Delete(id)).await,
    }
}

// =============================================================================
// Shared
// =============================================================================

/// Flags that fill in a form draft.
pub trait FieldsFor<D> {
    /// Overwrite the fields that were given.
    fn apply(self, draft: &mut D);
}

async fn list_linked<R: LeadLinked>(
    screen: &mut LinkedScreen<R>,
    list: &ListArgs,
    filters: &[(&str, Option<String>)],
) -> Result<(), ConsoleError> {
    if let Err(e) = check_filters(screen.view(), filters) {
        return fail(e);
    }
    if let Err(e) = screen.load().await {
        return fail(e);
    }
    let page = screen.refine(|state| list.apply(state, filters));
    emit(&screen.render(&page));
    Ok(())
}

async fn write_linked<R, F>(
    screen: &mut LinkedScreen<R>,
    write: Write<R::Id, F>,
) -> Result<(), ConsoleError>
where
    R: LeadLinked,
    R::Draft: Default,
    F: FieldsFor<R::Draft>,
{
    let mutation = match to_mutation(screen.view_mut(), write).await {
        Ok(mutation) => mutation,
        Err(e) => return fail(e),
    };
    let result = screen.mutate(mutation).await;
    emit_notice(screen.view().notice());
    result.map(|_| ())
}

async fn write_view<R, F>(
    view: &mut DataView<R>,
    write: Write<R::Id, F>,
) -> Result<(), ConsoleError>
where
    R: Resource,
    R::Draft: Default,
    F: FieldsFor<R::Draft>,
{
    let mutation = match to_mutation(view, write).await {
        Ok(mutation) => mutation,
        Err(e) => return fail(e),
    };
    let result = view.mutate(mutation).await;
    emit_notice(view.notice());
    result.map(|_| ())
}

/// Build the mutation for a write. Updates start from the stored record so
/// only the given flags change.
async fn to_mutation<R, F>(
    view: &mut DataView<R>,
    write: Write<R::Id, F>,
) -> Result<Mutation<R>, ConsoleError>
where
    R: Resource,
    R::Draft: Default,
    F: FieldsFor<R::Draft>,
{
    Ok(match write {
        Write::Create(fields) => {
            let mut draft = R::Draft::default();
            fields.apply(&mut draft);
            Mutation::Create(draft)
        }
        Write::Update(id, fields) => {
            let mut draft = view.fetch(&id).await?.to_draft();
            fields.apply(&mut draft);
            Mutation::Update(id, draft)
        }
        Write::Delete(id) => Mutation::Delete(id),
    })
}
