//! Print export for the lead list.
//!
//! The report is rendered to a PDF, base64-encoded and handed to a
//! [`PrintBridge`] together with the queue name. Bridges are pluggable; the
//! console ships [`SpoolBridge`], which drops jobs into a directory per queue
//! for a spooler to pick up.

mod pdf;
mod spool;

pub use pdf::*;
pub use spool::SpoolBridge;

use std::future::Future;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use crm_console_core::Lead;
use thiserror::Error;
use tracing::{info, instrument};

/// Errors that can occur while printing.
#[derive(Debug, Error)]
pub enum PrintError {
    /// No queue was chosen and no default is configured.
    #[error("No printer selected")]
    NoPrinterSelected,

    /// The bridge could not be reached or refused the job.
    #[error("Print bridge unavailable: {0}")]
    BridgeUnavailable(String),

    /// The job payload could not be produced or decoded.
    #[error("Failed to serialize print job: {0}")]
    SerializationFailed(String),
}

/// A connection to something that can print PDFs.
pub trait PrintBridge: Send + Sync {
    /// Queue names the bridge knows about.
    fn printers(&self) -> impl Future<Output = Result<Vec<String>, PrintError>> + Send;

    /// Submit a base64-encoded PDF to `queue`.
    fn submit(
        &self,
        queue: &str,
        pdf_base64: &str,
    ) -> impl Future<Output = Result<(), PrintError>> + Send;
}

/// Render `rows` as a lead report and send it to `printer`.
///
/// # Errors
///
/// Returns `PrintError::NoPrinterSelected` when `printer` is missing or blank,
/// `PrintError::SerializationFailed` when the PDF cannot be written,
/// otherwise whatever the bridge reports.
#[instrument(skip(bridge, rows), fields(rows = rows.len()))]
pub async fn print_document<B: PrintBridge>(
    bridge: &B,
    printer: Option<&str>,
    rows: &[Lead],
) -> Result<(), PrintError> {
    let queue = printer
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or(PrintError::NoPrinterSelected)?;

    let pdf = LeadReport::new(rows)
        .to_pdf()
        .map_err(|e| PrintError::SerializationFailed(e.to_string()))?;
    let payload = STANDARD.encode(&pdf);

    bridge.submit(queue, &payload).await?;
    info!(queue, bytes = pdf.len(), "Print job submitted");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct RecordingBridge {
        jobs: Mutex<Vec<(String, String)>>,
    }

    impl PrintBridge for RecordingBridge {
        async fn printers(&self) -> Result<Vec<String>, PrintError> {
            Ok(vec!["Front Desk".to_string()])
        }

        async fn submit(&self, queue: &str, pdf_base64: &str) -> Result<(), PrintError> {
            self.jobs
                .lock()
                .unwrap()
                .push((queue.to_string(), pdf_base64.to_string()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_print_document_submits_base64_pdf() {
        let bridge = RecordingBridge::default();
        let rows: Vec<Lead> =
            serde_json::from_str(r#"[{"id": 1, "name": "John Doe", "email": "john@x.com"}]"#)
                .unwrap();

        print_document(&bridge, Some(" Front Desk "), &rows)
            .await
            .unwrap();

        let jobs = bridge.jobs.lock().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].0, "Front Desk");
        let pdf = STANDARD.decode(&jobs[0].1).unwrap();
        assert!(pdf.starts_with(b"%PDF-1.4"));
    }

    #[tokio::test]
    async fn test_print_document_requires_printer() {
        let bridge = RecordingBridge::default();
        for printer in [None, Some(""), Some("   ")] {
            let err = print_document(&bridge, printer, &[]).await.unwrap_err();
            assert!(matches!(err, PrintError::NoPrinterSelected));
        }
        assert!(bridge.jobs.lock().unwrap().is_empty());
        assert_eq!(bridge.printers().await.unwrap(), vec!["Front Desk"]);
    }
}
