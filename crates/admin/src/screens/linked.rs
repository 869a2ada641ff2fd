//! Screens whose rows point at a lead and show its name.

use std::sync::Arc;

use crm_console_core::{CallLog, FollowUp, LeadId, Opportunity, Page, ViewState, WithLead};

use super::Console;
use crate::api::Resource;
use crate::components::DataTableConfig;
use crate::controller::{DataView, Mutation};
use crate::directory::{LeadDirectory, LeadNames};
use crate::error::ConsoleError;

/// A record that references a lead.
pub trait LeadLinked: Resource {
    fn lead_id(&self) -> &LeadId;
}

impl LeadLinked for Opportunity {
    fn lead_id(&self) -> &LeadId {
        &self.lead_id
    }
}

impl LeadLinked for FollowUp {
    fn lead_id(&self) -> &LeadId {
        &self.lead_id
    }
}

impl LeadLinked for CallLog {
    fn lead_id(&self) -> &LeadId {
        &self.lead_id
    }
}

/// A data view whose rows are joined with lead names before filtering, so
/// the search box matches on the lead as well.
#[derive(Debug)]
pub struct LinkedScreen<R: LeadLinked> {
    view: DataView<R>,
    directory: LeadDirectory,
    names: Arc<LeadNames>,
}

impl<R: LeadLinked> LinkedScreen<R> {
    #[must_use]
    pub fn new(console: &Console, table: DataTableConfig) -> Self {
        Self {
            view: DataView::new(console.client().clone(), table, console.page_size()),
            directory: console.directory().clone(),
            names: Arc::default(),
        }
    }

    #[must_use]
    pub const fn view(&self) -> &DataView<R> {
        &self.view
    }

    pub const fn view_mut(&mut self) -> &mut DataView<R> {
        &mut self.view
    }

    /// Lead names from the last load, for lead dropdowns.
    #[must_use]
    pub fn names(&self) -> &LeadNames {
        &self.names
    }

    /// The whole snapshot joined with lead names.
    #[must_use]
    pub fn rows(&self) -> Vec<WithLead<R>> {
        self.names.join(self.view.records(), R::lead_id)
    }

    /// The visible window of the joined rows.
    #[must_use]
    pub fn page(&self) -> Page<WithLead<R>> {
        self.view.page_of(&self.rows())
    }

    /// Fetch the collection and the lead names together.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed` when either request fails.
    pub async fn load(&mut self) -> Result<Page<WithLead<R>>, ConsoleError> {
        self.names = self.view.refresh_with(self.directory.names()).await?;
        let rows = self.rows();
        self.view.clamp_rows(&rows);
        Ok(self.view.page_of(&rows))
    }

    /// Apply one write and reload.
    ///
    /// # Errors
    ///
    /// See [`DataView::apply`]; a failed reload is `FetchFailed`.
    pub async fn mutate(
        &mut self,
        mutation: Mutation<R>,
    ) -> Result<Page<WithLead<R>>, ConsoleError> {
        let done = self.view.apply(mutation).await?;
        let page = self.load().await?;
        self.view.set_notice(done);
        Ok(page)
    }

    /// Change the filters or page, then return the new window.
    pub fn refine(&mut self, change: impl FnOnce(&mut ViewState)) -> Page<WithLead<R>> {
        change(self.view.state_mut());
        self.page()
    }

    #[must_use]
    pub fn render(&self, page: &Page<WithLead<R>>) -> String {
        self.view.render(page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crm_console_core::{MISSING_LEAD_NAME, Record};
    use url::Url;

    use super::*;
    use crate::components::opportunities_table_config;
    use crate::config::ConsoleConfig;

    fn console(server: &mockito::ServerGuard) -> Console {
        let url = server.url();
        let config =
            ConsoleConfig::from_lookup(|key| (key == "CRM_API_BASE_URL").then(|| url.clone()))
                .unwrap();
        assert_eq!(config.api_base_url, Url::parse(&server.url()).unwrap());
        Console::new(config).unwrap()
    }

    #[tokio::test]
    async fn test_search_matches_lead_name() {
        let mut server = mockito::Server::new_async().await;
        let _opps = server
            .mock("GET", "/opportunities")
            .with_status(200)
            .with_body(
                r#"[
                    {"id": 1, "name": "Big deal", "value": "5000", "leadId": 1},
                    {"id": 2, "name": "Small deal", "value": 10, "leadId": 7}
                ]"#,
            )
            .create_async()
            .await;
        let _leads = server
            .mock("GET", "/leads")
            .with_status(200)
            .with_body(r#"[{"id": 1, "name": "John Doe"}]"#)
            .create_async()
            .await;

        let console = console(&server);
        let mut screen: LinkedScreen<Opportunity> =
            LinkedScreen::new(&console, opportunities_table_config());
        let page = screen.load().await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[1].lead_name, MISSING_LEAD_NAME);

        let page = screen.refine(|s| s.set_search("john"));
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].field("name").unwrap(), "Big deal");
    }

    #[tokio::test]
    async fn test_missing_leads_fail_the_whole_load() {
        let mut server = mockito::Server::new_async().await;
        let _opps = server
            .mock("GET", "/opportunities")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;
        let _leads = server
            .mock("GET", "/leads")
            .with_status(500)
            .create_async()
            .await;

        let console = console(&server);
        let mut screen: LinkedScreen<Opportunity> =
            LinkedScreen::new(&console, opportunities_table_config());
        let err = screen.load().await.unwrap_err();
        assert!(matches!(err, ConsoleError::FetchFailed { .. }));
        assert_eq!(
            screen.view().notice().unwrap().message,
            "Failed to fetch opportunities"
        );
    }
}
