//! Aggregations behind the dashboard, the pipeline report and call analytics.
//!
//! Every report is recomputed from a full in-memory collection in a single
//! grouping pass. Groups are keyed in sorted order.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::records::{CallLog, Lead, Opportunity};
use crate::types::{Amount, LeadId, OpportunityStatus};
use crate::view::Record;

/// Group label for records with a missing or empty grouping field.
pub const UNKNOWN_GROUP: &str = "Unknown";

/// Count records per value of `field`.
pub fn count_by<R: Record>(records: &[R], field: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(group_key(record, field)).or_insert(0) += 1;
    }
    counts
}

fn group_key<R: Record>(record: &R, field: &str) -> String {
    record
        .field(field)
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| UNKNOWN_GROUP.to_owned(), |v| v.into_owned())
}

/// Parse a timestamp or plain date into its UTC calendar day.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS[.fff]` and `YYYY-MM-DD`.
#[must_use]
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Headline numbers for the lead dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Number of leads.
    pub total_leads: usize,
    /// Leads per status label.
    pub by_status: BTreeMap<String, usize>,
    /// Leads per source label.
    pub by_source: BTreeMap<String, usize>,
    /// Leads created per day (`YYYY-MM-DD`), oldest first.
    pub over_time: Vec<(String, usize)>,
}

impl DashboardSummary {
    /// Summarize a lead collection. Leads without a readable `createdAt` are
    /// counted everywhere except the time series.
    #[must_use]
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut per_day: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for day in leads
            .iter()
            .filter_map(|l| l.created_at.as_deref().and_then(parse_day))
        {
            *per_day.entry(day).or_insert(0) += 1;
        }

        Self {
            total_leads: leads.len(),
            by_status: count_by(leads, "status"),
            by_source: count_by(leads, "source"),
            over_time: per_day
                .into_iter()
                .map(|(day, n)| (day.format("%Y-%m-%d").to_string(), n))
                .collect(),
        }
    }
}

/// Filters of the pipeline report. `None` means "All".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineFilter {
    /// Only opportunities owned by this rep.
    pub rep: Option<String>,
    /// Only opportunities in this stage.
    pub status: Option<OpportunityStatus>,
    /// Earliest close date, inclusive.
    pub from: Option<NaiveDate>,
    /// Latest close date, inclusive.
    pub to: Option<NaiveDate>,
}

impl PipelineFilter {
    /// Close dates within the last `days` days up to and including `today`.
    #[must_use]
    pub fn last_days(today: NaiveDate, days: u64) -> Self {
        Self {
            from: today.checked_sub_days(chrono::Days::new(days)),
            to: Some(today),
            ..Self::default()
        }
    }

    /// Whether an opportunity passes every filter. When a date bound is set,
    /// opportunities without a readable close date are excluded.
    #[must_use]
    pub fn matches(&self, opportunity: &Opportunity) -> bool {
        if self.rep.as_ref().is_some_and(|rep| *rep != opportunity.rep) {
            return false;
        }
        if self
            .status
            .as_ref()
            .is_some_and(|status| *status != opportunity.status)
        {
            return false;
        }
        if self.from.is_none() && self.to.is_none() {
            return true;
        }
        let Some(close) = parse_day(&opportunity.close_date) else {
            return false;
        };
        self.from.is_none_or(|from| close >= from) && self.to.is_none_or(|to| close <= to)
    }
}

/// Value and stage breakdown of the opportunities matching a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    /// Matching opportunities.
    pub count: usize,
    /// Sum of their values.
    pub total_value: Amount,
    /// Summed value per rep.
    pub value_by_rep: BTreeMap<String, Amount>,
    /// Deal count per stage.
    pub count_by_status: BTreeMap<String, usize>,
}

impl PipelineReport {
    /// Build the report over the opportunities passing `filter`.
    #[must_use]
    pub fn build(opportunities: &[Opportunity], filter: &PipelineFilter) -> Self {
        let matching: Vec<Opportunity> = opportunities
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();

        let mut value_by_rep: BTreeMap<String, Amount> = BTreeMap::new();
        for opp in &matching {
            let entry = value_by_rep
                .entry(group_key(opp, "rep"))
                .or_insert(Amount::ZERO);
            *entry += opp.value;
        }

        Self {
            count: matching.len(),
            total_value: matching.iter().map(|o| o.value).sum(),
            value_by_rep,
            count_by_status: count_by(&matching, "status"),
        }
    }
}

/// Call volume and duration per lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CallAnalytics {
    /// Calls per raw `date` string, sorted as text.
    pub calls_over_time: Vec<(String, usize)>,
    /// Calls per lead name (`Unknown` when the lead no longer exists).
    pub calls_by_lead: BTreeMap<String, usize>,
    /// Average call length per lead in whole minutes; `None` when no call of
    /// that lead has a numeric duration.
    pub avg_minutes_by_lead: BTreeMap<String, Option<u64>>,
}

impl CallAnalytics {
    /// Build analytics for `calls`, naming leads from `leads`.
    #[must_use]
    pub fn build(calls: &[CallLog], leads: &[Lead]) -> Self {
        let names: BTreeMap<&LeadId, &str> =
            leads.iter().map(|l| (&l.id, l.name.as_str())).collect();

        let mut per_date: BTreeMap<String, usize> = BTreeMap::new();
        let mut calls_by_lead: BTreeMap<String, usize> = BTreeMap::new();
        let mut minutes: BTreeMap<String, (u64, u64)> = BTreeMap::new();

        for call in calls {
            if !call.date.trim().is_empty() {
                *per_date.entry(call.date.clone()).or_insert(0) += 1;
            }

            let name = names
                .get(&call.lead_id)
                .copied()
                .unwrap_or(UNKNOWN_GROUP)
                .to_owned();
            *calls_by_lead.entry(name.clone()).or_insert(0) += 1;

            let slot = minutes.entry(name).or_insert((0, 0));
            if let Some(m) = call.duration_minutes() {
                slot.0 += u64::from(m);
                slot.1 += 1;
            }
        }

        Self {
            calls_over_time: per_date.into_iter().collect(),
            calls_by_lead,
            avg_minutes_by_lead: minutes
                .into_iter()
                .map(|(name, (total, count))| (name, rounded_average(total, count)))
                .collect(),
        }
    }
}

/// `total / count` rounded half up, or `None` for an empty group.
const fn rounded_average(total: u64, count: u64) -> Option<u64> {
    if count == 0 {
        return None;
    }
    Some((2 * total + count) / (2 * count))
}
