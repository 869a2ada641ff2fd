//! Data-view controller: one screen's table state and its REST round trips.
//!
//! A [`DataView`] keeps the last good snapshot of a collection. Filtering and
//! paging re-derive the visible window from that snapshot without touching
//! the network. Every successful write is followed by a full refetch, so the
//! table always shows what the server holds.

use std::future::Future;

use crm_console_core::{Page, Record, Validate, ViewState};
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, Resource, Transition, capitalize};
use crate::components::{DataTableConfig, RowAction, cell, render_table};
use crate::error::{ConsoleError, Notice};

/// Where the last load stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// Nothing in flight; the snapshot is current.
    #[default]
    Idle,
    /// A fetch is running.
    Loading,
    /// The last fetch failed; the snapshot is from before it.
    Error,
}

/// A single write against one resource.
#[derive(Debug, Clone)]
pub enum Mutation<R: Resource> {
    Create(R::Draft),
    Update(R::Id, R::Draft),
    Delete(R::Id),
    Transition(R::Id, Transition),
}

/// Table state and snapshot of one screen.
pub struct DataView<R: Resource> {
    client: ApiClient,
    table: DataTableConfig,
    state: ViewState,
    records: Vec<R>,
    status: LoadStatus,
    notice: Option<Notice>,
}

impl<R: Resource> std::fmt::Debug for DataView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataView")
            .field("resource", &R::PATH)
            .field("state", &self.state)
            .field("records", &self.records.len())
            .field("status", &self.status)
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

impl<R: Resource> DataView<R> {
    /// An empty view; call [`load`](Self::load) to fill it.
    #[must_use]
    pub fn new(client: ApiClient, table: DataTableConfig, page_size: usize) -> Self {
        Self {
            client,
            table,
            state: ViewState::new(page_size),
            records: Vec::new(),
            status: LoadStatus::Idle,
            notice: None,
        }
    }

    #[must_use]
    pub const fn client(&self) -> &ApiClient {
        &self.client
    }

    /// Filter and page state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Filter and page state, for screens that page joined rows.
    pub const fn state_mut(&mut self) -> &mut ViewState {
        &mut self.state
    }

    /// The full snapshot, unfiltered.
    #[must_use]
    pub fn records(&self) -> &[R] {
        &self.records
    }

    #[must_use]
    pub const fn status(&self) -> LoadStatus {
        self.status
    }

    /// The latest notice, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Show a notice that did not come from this view (print results).
    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    /// A record in the snapshot.
    #[must_use]
    pub fn find(&self, id: &R::Id) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    /// The visible window of the snapshot.
    #[must_use]
    pub fn page(&self) -> Page<R> {
        self.page_of(&self.records)
    }

    /// The visible window of any row set (e.g. the snapshot joined with lead names).
    #[must_use]
    pub fn page_of<T: Record + Clone>(&self, rows: &[T]) -> Page<T> {
        self.state.apply(rows, &self.table.search_keys())
    }

    /// Every row matching the current filters, across all pages.
    #[must_use]
    pub fn filtered_of<'a, T: Record>(&self, rows: &'a [T]) -> Vec<&'a T> {
        self.state.query().filter(rows, &self.table.search_keys())
    }

    /// Render any window of this view as a plain-text table.
    #[must_use]
    pub fn render<T: Record>(&self, page: &Page<T>) -> String {
        render_table(&self.table, page, cell)
    }

    // =========================================================================
    // Filtering and paging
    // =========================================================================

    pub fn set_search(&mut self, search: impl Into<String>) -> Page<R> {
        self.state.set_search(search);
        self.page()
    }

    /// Set a dropdown filter; an empty value means "All".
    pub fn set_filter(&mut self, key: &str, value: impl Into<String>) -> Page<R> {
        self.state.set_filter(key, value);
        self.page()
    }

    /// Check a value against the options a dropdown filter offers. Text
    /// filters, unknown keys and the empty "All" value always pass.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::UnknownFilterValue` listing the offered options.
    pub fn check_filter(&self, key: &str, value: &str) -> Result<(), ConsoleError> {
        match self.table.find_filter(key) {
            Some(filter) if !filter.accepts(value) => Err(ConsoleError::UnknownFilterValue {
                filter: filter.label.to_lowercase(),
                value: value.to_string(),
                options: filter.options.iter().map(|o| o.label.clone()).collect(),
            }),
            _ => Ok(()),
        }
    }

    pub fn clear_filter(&mut self, key: &str) -> Page<R> {
        self.state.clear_filter(key);
        self.page()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Page<R> {
        self.state.set_page_size(page_size);
        self.page()
    }

    pub fn set_page(&mut self, page: usize) -> Page<R> {
        self.state.set_page(page);
        self.page()
    }

    /// The row actions offered for `record`. Transitions the record's current
    /// state does not allow are left out.
    #[must_use]
    pub fn row_actions(&self, record: &R) -> Vec<&RowAction> {
        self.table
            .row_actions
            .iter()
            .filter(|a| Transition::from_key(&a.key).is_none_or(|t| record.allows(t)))
            .collect()
    }

    // =========================================================================
    // Network
    // =========================================================================

    /// Fetch the whole collection and return the visible window.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`; the previous snapshot is kept.
    pub async fn load(&mut self) -> Result<Page<R>, ConsoleError> {
        let (page, ()) = self.load_with(async { Ok::<(), ApiError>(()) }).await?;
        Ok(page)
    }

    /// Fetch the collection together with another request, failing both if
    /// either fails.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`; the previous snapshot is kept.
    pub async fn load_with<T, F>(&mut self, companion: F) -> Result<(Page<R>, T), ConsoleError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        let extra = self.refresh_with(companion).await?;
        let visible = self.filtered_of(&self.records).len();
        self.state.clamp_to(visible);
        Ok((self.page(), extra))
    }

    /// Replace the snapshot without touching the page index. Screens that
    /// filter joined rows clamp with [`clamp_rows`](Self::clamp_rows) afterwards.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`; the previous snapshot is kept.
    #[instrument(skip(self, companion), fields(resource = R::PATH))]
    pub async fn refresh_with<T, F>(&mut self, companion: F) -> Result<T, ConsoleError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        self.status = LoadStatus::Loading;
        let client = self.client.clone();

        match tokio::try_join!(client.list::<R>(), companion) {
            Ok((records, extra)) => {
                self.records = records;
                self.status = LoadStatus::Idle;
                Ok(extra)
            }
            Err(source) => {
                warn!(error = %source, "Failed to fetch collection");
                self.status = LoadStatus::Error;
                Err(self.raise(ConsoleError::FetchFailed {
                    resource: R::PLURAL,
                    source,
                }))
            }
        }
    }

    /// Pull the page index back inside the rows of `rows` that pass the filters.
    pub fn clamp_rows<T: Record>(&mut self, rows: &[T]) {
        let visible = self.filtered_of(rows).len();
        self.state.clamp_to(visible);
    }

    /// Fetch one record for an edit form.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed` if the record cannot be loaded.
    pub async fn fetch(&mut self, id: &R::Id) -> Result<R, ConsoleError> {
        let client = self.client.clone();
        client.get::<R>(id).await.map_err(|source| {
            self.raise(ConsoleError::FetchFailed {
                resource: R::SINGULAR,
                source,
            })
        })
    }

    /// Apply one write, then refetch the collection.
    ///
    /// # Errors
    ///
    /// Returns the error of [`apply`](Self::apply), or `FetchFailed` when the
    /// refetch fails.
    pub async fn mutate(&mut self, mutation: Mutation<R>) -> Result<Page<R>, ConsoleError> {
        let done = self.apply(mutation).await?;
        let page = self.load().await?;
        self.notice = Some(done);
        Ok(page)
    }

    /// Send one write without refetching; returns the success notice to show
    /// once the caller has reloaded.
    ///
    /// Drafts are validated before anything is sent. On failure the snapshot
    /// and view state are left as they were and the matching notice is raised.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`, `SaveFailed`, `DeleteFailed` or
    /// `TransitionUnavailable`.
    #[instrument(skip(self, mutation), fields(resource = R::PATH))]
    pub async fn apply(&mut self, mutation: Mutation<R>) -> Result<Notice, ConsoleError> {
        let client = self.client.clone();
        let title = capitalize(R::SINGULAR);

        let done = match mutation {
            Mutation::Create(draft) => {
                self.check(&draft)?;
                let created = client
                    .create::<R>(&draft)
                    .await
                    .map_err(|source| self.save_failed("save", source))?;
                info!(id = %created.id(), "Created record");
                format!("{title} created")
            }
            Mutation::Update(id, draft) => {
                self.check(&draft)?;
                client
                    .update::<R>(&id, &draft)
                    .await
                    .map_err(|source| self.save_failed("save", source))?;
                info!(%id, "Updated record");
                format!("{title} updated")
            }
            Mutation::Delete(id) => {
                client.delete::<R>(&id).await.map_err(|source| {
                    self.raise(ConsoleError::DeleteFailed {
                        resource: R::SINGULAR,
                        source,
                    })
                })?;
                info!(%id, "Deleted record");
                format!("{title} deleted")
            }
            Mutation::Transition(id, transition) => {
                self.apply_transition(&client, &id, transition).await?;
                info!(%id, transition = transition.key(), "Applied transition");
                transition.done_message(R::SINGULAR)
            }
        };

        Ok(Notice::success(done))
    }

    /// Read the current server copy, change it, and write it back.
    ///
    /// The read and the write are separate requests; a concurrent edit made
    /// between them is overwritten.
    async fn apply_transition(
        &mut self,
        client: &ApiClient,
        id: &R::Id,
        transition: Transition,
    ) -> Result<(), ConsoleError> {
        let refused = self.find(id).is_some_and(|r| !r.allows(transition));
        if refused {
            let reason = self
                .find(id)
                .and_then(|r| r.transition(transition).err())
                .unwrap_or_else(|| format!("Cannot {} this {}", transition.key(), R::SINGULAR));
            return Err(self.raise(ConsoleError::TransitionUnavailable(reason)));
        }

        let current = client
            .get::<R>(id)
            .await
            .map_err(|source| self.save_failed(transition.key(), source))?;
        let draft = current
            .transition(transition)
            .map_err(|reason| self.raise(ConsoleError::TransitionUnavailable(reason)))?;
        client
            .update::<R>(id, &draft)
            .await
            .map_err(|source| self.save_failed(transition.key(), source))?;
        Ok(())
    }

    fn check(&mut self, draft: &R::Draft) -> Result<(), ConsoleError> {
        draft.validate().map_err(|errors| {
            self.raise(ConsoleError::ValidationFailed {
                message: R::REQUIRED_MESSAGE,
                errors,
            })
        })
    }

    fn save_failed(&mut self, action: &'static str, source: ApiError) -> ConsoleError {
        warn!(resource = R::PATH, action, error = %source, "Write failed");
        self.raise(ConsoleError::SaveFailed {
            action,
            resource: R::SINGULAR,
            source,
        })
    }

    /// Record the notice for `err` and hand the error back.
    fn raise(&mut self, err: ConsoleError) -> ConsoleError {
        self.notice = Some(err.notice());
        err
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use crm_console_core::{Lead, LeadDraft, LeadId, LeadStatus};
    use mockito::Matcher;
    use url::Url;

    use super::*;
    use crate::components::leads_table_config;
    use crate::error::Severity;

    const LEADS: &str = r#"[
        {"id": 1, "name": "John Doe", "email": "john@x.com", "source": "Website", "status": "New"},
        {"id": 2, "name": "Jane Smith", "email": "jane@x.com", "source": "Social", "status": "Converted"}
    ]"#;

    fn view(server: &mockito::ServerGuard) -> DataView<Lead> {
        let client = ApiClient::with_base_url(Url::parse(&server.url()).unwrap(), None).unwrap();
        DataView::new(client, leads_table_config(), 10)
    }

    async fn mock_leads(server: &mut mockito::ServerGuard, body: &str) -> mockito::Mock {
        server
            .mock("GET", "/leads")
            .with_status(200)
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_load_then_filter_locally() {
        let mut server = mockito::Server::new_async().await;
        let list = mock_leads(&mut server, LEADS).await;

        let mut view = view(&server);
        let page = view.load().await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(view.status(), LoadStatus::Idle);

        let page = view.set_search("jane");
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, LeadId::from(2));
        assert_eq!(page.range_label(), "1–1 of 1");

        let page = view.set_filter("source", "Website");
        assert_eq!(page.total, 0);
        assert_eq!(view.state().page(), 0);

        list.assert_async().await;
    }

    #[test]
    fn test_check_filter_against_options() {
        let client = ApiClient::with_base_url(Url::parse("http://localhost").unwrap(), None).unwrap();
        let view: DataView<Lead> = DataView::new(client, leads_table_config(), 10);

        assert!(view.check_filter("status", "Converted").is_ok());
        assert!(view.check_filter("status", "").is_ok());
        assert!(view.check_filter("notes", "anything").is_ok());

        let err = view.check_filter("status", "Qualified").unwrap_err();
        assert_eq!(
            err.notice(),
            Notice::warning(
                "Unknown status \"Qualified\". Choose one of: New, Contacted, Converted, Junk"
            )
        );
    }

    #[tokio::test]
    async fn test_failed_load_keeps_snapshot() {
        let mut server = mockito::Server::new_async().await;
        let ok = mock_leads(&mut server, LEADS).await;

        let mut view = view(&server);
        view.load().await.unwrap();
        ok.remove_async().await;

        let _down = server
            .mock("GET", "/leads")
            .with_status(503)
            .create_async()
            .await;
        let err = view.load().await.unwrap_err();
        assert!(matches!(err, ConsoleError::FetchFailed { resource: "leads", .. }));
        assert_eq!(view.status(), LoadStatus::Error);
        assert_eq!(view.records().len(), 2);
        assert_eq!(view.notice(), Some(&Notice::error("Failed to fetch leads")));
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_the_network() {
        let mut server = mockito::Server::new_async().await;
        let post = server
            .mock("POST", "/leads")
            .expect(0)
            .create_async()
            .await;

        let mut view = view(&server);
        let err = view
            .mutate(Mutation::Create(LeadDraft::new("Jane", "")))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::ValidationFailed { .. }));
        assert_eq!(view.notice().unwrap().severity, Severity::Warning);
        assert_eq!(view.notice().unwrap().message, "Name and Email are required");
        post.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_refetches_and_notifies() {
        let mut server = mockito::Server::new_async().await;
        let post = server
            .mock("POST", "/leads")
            .match_body(Matcher::PartialJsonString(r#"{"name": "Ann Lee"}"#.to_string()))
            .with_status(201)
            .with_body(r#"{"id": 3, "name": "Ann Lee", "email": "ann@x.com"}"#)
            .create_async()
            .await;
        let list = mock_leads(&mut server, LEADS).await;

        let mut view = view(&server);
        let page = view
            .mutate(Mutation::Create(LeadDraft::new("Ann Lee", "ann@x.com")))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(view.notice(), Some(&Notice::success("Lead created")));

        post.assert_async().await;
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_failure_leaves_state() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_leads(&mut server, LEADS).await;
        let _delete = server
            .mock("DELETE", "/leads/1")
            .with_status(500)
            .create_async()
            .await;

        let mut view = view(&server);
        view.load().await.unwrap();
        view.set_page_size(5);

        let err = view
            .mutate(Mutation::Delete(LeadId::from(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::DeleteFailed { .. }));
        assert_eq!(view.notice(), Some(&Notice::error("Failed to delete lead")));
        assert_eq!(view.records().len(), 2);
        assert_eq!(view.state().page_size(), 5);
    }

    #[tokio::test]
    async fn test_deleted_row_is_gone_after_refetch() {
        let mut server = mockito::Server::new_async().await;
        let before = mock_leads(&mut server, LEADS).await;

        let mut view = view(&server);
        view.load().await.unwrap();
        before.remove_async().await;

        let delete = server
            .mock("DELETE", "/leads/1")
            .with_status(200)
            .create_async()
            .await;
        let after = mock_leads(
            &mut server,
            r#"[{"id": 2, "name": "Jane Smith", "email": "jane@x.com", "source": "Social", "status": "Converted"}]"#,
        )
        .await;

        let page = view
            .mutate(Mutation::Delete(LeadId::from(1)))
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(view.records().iter().all(|lead| lead.id != LeadId::from(1)));
        assert_eq!(view.notice(), Some(&Notice::success("Lead deleted")));

        delete.assert_async().await;
        after.assert_async().await;
    }

    #[tokio::test]
    async fn test_convert_reads_then_writes_converted() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_leads(&mut server, LEADS).await;
        let get = server
            .mock("GET", "/leads/1")
            .with_status(200)
            .with_body(r#"{"id": 1, "name": "John Doe", "email": "john@x.com", "rep": "Bob", "status": "Contacted"}"#)
            .create_async()
            .await;
        let put = server
            .mock("PUT", "/leads/1")
            .match_body(Matcher::PartialJsonString(
                r#"{"status": "Converted", "rep": "Bob"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"id": 1, "status": "Converted"}"#)
            .create_async()
            .await;

        let mut view = view(&server);
        view.load().await.unwrap();
        view.mutate(Mutation::Transition(LeadId::from(1), Transition::Convert))
            .await
            .unwrap();

        assert_eq!(
            view.notice(),
            Some(&Notice::success("Lead converted to opportunity!"))
        );
        get.assert_async().await;
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_convert_refused_for_converted_row() {
        let mut server = mockito::Server::new_async().await;
        let _list = mock_leads(&mut server, LEADS).await;
        let put = server
            .mock("PUT", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let mut view = view(&server);
        view.load().await.unwrap();

        let jane = view.find(&LeadId::from(2)).unwrap().clone();
        assert_eq!(jane.status, LeadStatus::Converted);
        let actions: Vec<&str> = view.row_actions(&jane).iter().map(|a| a.key.as_str()).collect();
        assert_eq!(actions, vec!["edit", "delete"]);

        let john = view.find(&LeadId::from(1)).unwrap().clone();
        assert_eq!(view.row_actions(&john).len(), 3);

        let err = view
            .mutate(Mutation::Transition(LeadId::from(2), Transition::Convert))
            .await
            .unwrap_err();
        assert!(matches!(err, ConsoleError::TransitionUnavailable(_)));
        assert_eq!(
            view.notice().unwrap().message,
            "Lead Jane Smith is already converted"
        );
        put.assert_async().await;
    }

    #[tokio::test]
    async fn test_page_is_clamped_after_shrink() {
        let mut server = mockito::Server::new_async().await;
        let rows: Vec<String> = (1..=11)
            .map(|i| format!(r#"{{"id": {i}, "name": "Lead {i}", "email": "l{i}@x.com"}}"#))
            .collect();
        let full = mock_leads(&mut server, &format!("[{}]", rows.join(","))).await;

        let mut view = view(&server);
        view.load().await.unwrap();
        assert_eq!(view.set_page(1).items.len(), 1);
        full.remove_async().await;

        let _shrunk = mock_leads(&mut server, &format!("[{}]", rows[..10].join(","))).await;
        let page = view.load().await.unwrap();
        assert_eq!(page.page, 0);
        assert_eq!(page.range_label(), "1–10 of 10");
    }
}
