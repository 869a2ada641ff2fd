//! Reports: lead dashboard, pipeline and call analytics.
//!
//! Reports always fetch fresh collections; they keep no snapshot of their own.

use std::fmt::Write as _;

use crm_console_core::reports::{CallAnalytics, DashboardSummary, PipelineFilter, PipelineReport};
use crm_console_core::{CallLog, Lead, Opportunity};
use tracing::instrument;

use super::Console;
use crate::api::{ApiClient, ApiError, Resource};
use crate::directory::LeadDirectory;
use crate::error::ConsoleError;

#[derive(Debug, Clone)]
pub struct ReportsScreen {
    client: ApiClient,
    directory: LeadDirectory,
}

impl ReportsScreen {
    #[must_use]
    pub fn new(console: &Console) -> Self {
        Self {
            client: console.client().clone(),
            directory: console.directory().clone(),
        }
    }

    /// Lead totals by status, source and creation day.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`.
    #[instrument(skip(self))]
    pub async fn dashboard(&self) -> Result<DashboardSummary, ConsoleError> {
        let leads = self.client.list::<Lead>().await.map_err(fetch_failed::<Lead>)?;
        self.directory.prime(&leads).await;
        Ok(DashboardSummary::from_leads(&leads))
    }

    /// Opportunity value and stage counts for `filter`.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`.
    #[instrument(skip(self))]
    pub async fn pipeline(&self, filter: &PipelineFilter) -> Result<PipelineReport, ConsoleError> {
        let opportunities = self
            .client
            .list::<Opportunity>()
            .await
            .map_err(fetch_failed::<Opportunity>)?;
        Ok(PipelineReport::build(&opportunities, filter))
    }

    /// Call volume per day and per lead, with average durations. Calls and
    /// leads are fetched together; either failing fails the report.
    ///
    /// # Errors
    ///
    /// Returns `ConsoleError::FetchFailed`.
    #[instrument(skip(self))]
    pub async fn call_analytics(&self) -> Result<CallAnalytics, ConsoleError> {
        let (calls, leads) = tokio::try_join!(
            self.client.list::<CallLog>(),
            self.client.list::<Lead>()
        )
        .map_err(fetch_failed::<CallLog>)?;
        self.directory.prime(&leads).await;
        Ok(CallAnalytics::build(&calls, &leads))
    }
}

fn fetch_failed<R: Resource>(source: ApiError) -> ConsoleError {
    ConsoleError::FetchFailed {
        resource: R::PLURAL,
        source,
    }
}

/// Append a titled block of `label  value` lines with aligned values.
fn section<'a>(
    out: &mut String,
    title: &str,
    rows: impl IntoIterator<Item = (&'a str, String)>,
) {
    let rows: Vec<(&str, String)> = rows.into_iter().collect();
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);

    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str(title);
    out.push('\n');
    if rows.is_empty() {
        out.push_str("  (no data)\n");
    }
    for (label, value) in rows {
        let pad = width - label.chars().count();
        let _ = writeln!(out, "  {label}{}  {value}", " ".repeat(pad));
    }
}

#[must_use]
pub fn render_dashboard(summary: &DashboardSummary) -> String {
    let mut out = format!("Total leads: {}\n", summary.total_leads);
    section(
        &mut out,
        "Leads by status",
        summary.by_status.iter().map(|(k, n)| (k.as_str(), n.to_string())),
    );
    section(
        &mut out,
        "Leads by source",
        summary.by_source.iter().map(|(k, n)| (k.as_str(), n.to_string())),
    );
    section(
        &mut out,
        "Leads over time",
        summary.over_time.iter().map(|(k, n)| (k.as_str(), n.to_string())),
    );
    out
}

#[must_use]
pub fn render_pipeline(report: &PipelineReport) -> String {
    let mut out = format!(
        "Opportunities: {}\nTotal value: {}\n",
        report.count,
        report.total_value.display()
    );
    section(
        &mut out,
        "Value by rep",
        report.value_by_rep.iter().map(|(k, v)| (k.as_str(), v.display())),
    );
    section(
        &mut out,
        "Deals by stage",
        report.count_by_status.iter().map(|(k, n)| (k.as_str(), n.to_string())),
    );
    out
}

#[must_use]
pub fn render_call_analytics(analytics: &CallAnalytics) -> String {
    let mut out = String::new();
    section(
        &mut out,
        "Calls over time",
        analytics.calls_over_time.iter().map(|(k, n)| (k.as_str(), n.to_string())),
    );
    section(
        &mut out,
        "Calls per lead",
        analytics.calls_by_lead.iter().map(|(k, n)| (k.as_str(), n.to_string())),
    );
    section(
        &mut out,
        "Average call length",
        analytics.avg_minutes_by_lead.iter().map(|(k, avg)| {
            let value = avg.map_or_else(|| "n/a".to_string(), |m| format!("{m} min"));
            (k.as_str(), value)
        }),
    );
    out
}
