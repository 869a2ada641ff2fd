//! Call logs screen.

use crm_console_core::{CallLog, CallLogDraft, CallLogId, Page, WithLead};

use super::{Console, LinkedScreen};
use crate::components::call_logs_table_config;
use crate::controller::Mutation;
use crate::error::ConsoleError;

pub type CallsScreen = LinkedScreen<CallLog>;

impl LinkedScreen<CallLog> {
    #[must_use]
    pub fn calls(console: &Console) -> Self {
        Self::new(console, call_logs_table_config())
    }

    /// Create (`id` is `None`) or update a call log, trimming the free-text
    /// fields first.
    ///
    /// # Errors
    ///
    /// See [`LinkedScreen::mutate`].
    pub async fn save(
        &mut self,
        id: Option<CallLogId>,
        draft: CallLogDraft,
    ) -> Result<Page<WithLead<CallLog>>, ConsoleError> {
        let draft = draft.normalized();
        let mutation = match id {
            Some(id) => Mutation::Update(id, draft),
            None => Mutation::Create(draft),
        };
        self.mutate(mutation).await
    }
}
