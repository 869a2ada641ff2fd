//! Leads screen: CRUD, conversion and the printed lead report.

use crm_console_core::{Lead, LeadId, Page};
use tracing::instrument;

use super::Console;
use crate::api::Transition;
use crate::components::leads_table_config;
use crate::controller::{DataView, Mutation};
use crate::directory::LeadDirectory;
use crate::error::{ConsoleError, Notice};
use crate::print::{PrintBridge, PrintError, print_document};

/// Notice shown once a report reached the bridge.
pub const PRINTED_MESSAGE: &str = "Leads sent to printer successfully!";

#[derive(Debug)]
pub struct LeadsScreen {
    view: DataView<Lead>,
    directory: LeadDirectory,
    default_printer: Option<String>,
}

impl LeadsScreen {
    #[must_use]
    pub fn new(console: &Console) -> Self {
        Self {
            view: DataView::new(
                console.client().clone(),
                leads_table_config(),
                console.page_size(),
            ),
            directory: console.directory().clone(),
            default_printer: console.config().default_printer.clone(),
        }
    }

    #[must_use]
    pub const fn view(&self) -> &DataView<Lead> {
        &self.view
    }

    pub const fn view_mut(&mut self) -> &mut DataView<Lead> {
        &mut self.view
    }

    /// Fetch the leads and share them with the lead directory.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`.
    pub async fn load(&mut self) -> Result<Page<Lead>, ConsoleError> {
        let page = self.view.load().await?;
        self.directory.prime(self.view.records()).await;
        Ok(page)
    }

    /// Apply one write, then reload.
    ///
    /// # Errors
    ///
    /// See [`DataView::mutate`].
    pub async fn mutate(&mut self, mutation: Mutation<Lead>) -> Result<Page<Lead>, ConsoleError> {
        let result = self.view.mutate(mutation).await;
        match &result {
            Ok(_) => {
                self.directory.prime(self.view.records()).await;
            }
            Err(_) => self.directory.invalidate().await,
        }
        result
    }

    /// Mark a lead as converted to an opportunity.
    ///
    /// # Errors
    ///
    /// `TransitionUnavailable` when the lead is already converted, otherwise
    /// see [`DataView::mutate`].
    pub async fn convert(&mut self, id: LeadId) -> Result<Page<Lead>, ConsoleError> {
        self.mutate(Mutation::Transition(id, Transition::Convert)).await
    }

    /// Print every lead passing the current filters, across all pages.
    ///
    /// Without an explicit `printer` the configured default queue is used.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::Print`.
    #[instrument(skip(self, bridge))]
    pub async fn print<B: PrintBridge>(
        &mut self,
        bridge: &B,
        printer: Option<&str>,
    ) -> Result<usize, ConsoleError> {
        let rows: Vec<Lead> = self
            .view
            .filtered_of(self.view.records())
            .into_iter()
            .cloned()
            .collect();
        let printer = printer.or(self.default_printer.as_deref());

        match print_document(bridge, printer, &rows).await {
            Ok(()) => {
                self.view.set_notice(Notice::success(PRINTED_MESSAGE));
                Ok(rows.len())
            }
            Err(e) => {
                let err = ConsoleError::Print(e);
                self.view.set_notice(err.notice());
                Err(err)
            }
        }
    }

    /// Queues the bridge offers.
    ///
    /// # Errors
    ///
    /// Returns the bridge's error.
    pub async fn printers<B: PrintBridge>(bridge: &B) -> Result<Vec<String>, PrintError> {
        bridge.printers().await
    }

    #[must_use]
    pub fn render(&self, page: &Page<Lead>) -> String {
        self.view.render(page)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::ConsoleConfig;
    use crate::error::Severity;
    use crate::print::SpoolBridge;

    const LEADS: &str = r#"[
        {"id": 1, "name": "John Doe", "email": "john@x.com", "source": "Website", "status": "New"},
        {"id": 2, "name": "Jane Smith", "email": "jane@x.com", "source": "Social", "status": "New"},
        {"id": 3, "name": "Jim Beam", "email": "jim@x.com", "source": "Website", "status": "Junk"}
    ]"#;

    fn console(server: &mockito::ServerGuard, printer: Option<&str>) -> Console {
        let url = server.url();
        let printer = printer.map(str::to_string);
        let config = ConsoleConfig::from_lookup(|key| match key {
            "CRM_API_BASE_URL" => Some(url.clone()),
            "CRM_DEFAULT_PRINTER" => printer.clone(),
            _ => None,
        })
        .unwrap();
        Console::new(config).unwrap()
    }

    async fn loaded(
        server: &mut mockito::ServerGuard,
        printer: Option<&str>,
    ) -> (LeadsScreen, mockito::Mock) {
        let mock = server
            .mock("GET", "/leads")
            .with_status(200)
            .with_body(LEADS)
            .create_async()
            .await;
        let mut screen = LeadsScreen::new(&console(server, printer));
        screen.load().await.unwrap();
        (screen, mock)
    }

    #[tokio::test]
    async fn test_print_uses_all_filtered_rows() {
        let mut server = mockito::Server::new_async().await;
        let (mut screen, _leads) = loaded(&mut server, Some("Front Desk")).await;
        screen.view_mut().set_page_size(5);
        screen.view_mut().set_filter("source", "Website");

        let spool = tempfile::tempdir().unwrap();
        let printed = screen
            .print(&SpoolBridge::new(spool.path()), None)
            .await
            .unwrap();

        assert_eq!(printed, 2);
        assert_eq!(screen.view().notice(), Some(&Notice::success(PRINTED_MESSAGE)));
        let jobs: Vec<_> = std::fs::read_dir(spool.path().join("Front Desk"))
            .unwrap()
            .collect();
        assert_eq!(jobs.len(), 1);
    }

    #[tokio::test]
    async fn test_print_without_printer_warns() {
        let mut server = mockito::Server::new_async().await;
        let (mut screen, _leads) = loaded(&mut server, None).await;

        let spool = tempfile::tempdir().unwrap();
        let err = screen
            .print(&SpoolBridge::new(spool.path()), Some(" "))
            .await
            .unwrap_err();

        assert!(matches!(err, ConsoleError::Print(PrintError::NoPrinterSelected)));
        let notice = screen.view().notice().unwrap();
        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(notice.message, "Please select a printer first.");
    }

    #[tokio::test]
    async fn test_print_to_missing_spool_fails() {
        let mut server = mockito::Server::new_async().await;
        let (mut screen, _leads) = loaded(&mut server, None).await;

        let spool = tempfile::tempdir().unwrap();
        let bridge = SpoolBridge::new(spool.path().join("offline"));
        screen.print(&bridge, Some("Office")).await.unwrap_err();
        assert_eq!(
            screen.view().notice(),
            Some(&Notice::error("Failed to print. Is the print bridge running?"))
        );
    }

    #[tokio::test]
    async fn test_render_first_page() {
        let mut server = mockito::Server::new_async().await;
        let (mut screen, _leads) = loaded(&mut server, None).await;
        let page = screen.view_mut().set_search("jane");
        let out = screen.render(&page);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[2].starts_with("Jane Smith | jane@x.com"));
        assert_eq!(lines.last().copied(), Some("Showing 1–1 of 1 leads"));
    }
}
