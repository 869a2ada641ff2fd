//! `crm reports` commands.

use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use crm_console_admin::screens::ReportsScreen;
use crm_console_admin::screens::reports::{render_dashboard, render_pipeline};
use crm_console_admin::{Console, ConsoleError};
use crm_console_core::OpportunityStatus;
use crm_console_core::reports::PipelineFilter;

use super::{emit, fail};

#[derive(Subcommand, Debug)]
pub enum ReportsAction {
    /// Lead totals by status, source and day
    Dashboard,
    /// Opportunity value by rep and deals by stage
    Pipeline(PipelineArgs),
}

#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Only deals of this rep
    #[arg(long)]
    pub rep: Option<String>,
    /// Only deals in this stage
    #[arg(long)]
    pub status: Option<OpportunityStatus>,
    /// Earliest close date, `YYYY-MM-DD`
    #[arg(long, conflicts_with = "days")]
    pub from: Option<NaiveDate>,
    /// Latest close date, `YYYY-MM-DD`
    #[arg(long, conflicts_with = "days")]
    pub to: Option<NaiveDate>,
    /// Close dates within the last N days
    #[arg(long)]
    pub days: Option<u64>,
    /// Every close date, including deals without one
    #[arg(long, conflicts_with_all = ["from", "to", "days"])]
    pub all_time: bool,
}

/// Range used when no date flag is given.
const DEFAULT_DAYS: u64 = 30;

impl PipelineArgs {
    /// Date bounds default to the last 30 days; a single given bound keeps
    /// the default for the other.
    fn filter(self, today: NaiveDate) -> PipelineFilter {
        let default = PipelineFilter::last_days(today, self.days.unwrap_or(DEFAULT_DAYS));
        let dates = if self.all_time {
            PipelineFilter::default()
        } else if self.days.is_some() {
            default
        } else {
            PipelineFilter {
                from: self.from.or(default.from),
                to: self.to.or(default.to),
                ..PipelineFilter::default()
            }
        };
        PipelineFilter {
            rep: self.rep,
            status: self.status,
            ..dates
        }
    }
}

/// Run one `crm reports` action.
///
/// # Errors
///
/// Returns the console error after printing its notice.
pub async fn run(console: &Console, action: ReportsAction) -> Result<(), ConsoleError> {
    let screen = ReportsScreen::new(console);
    let out = match action {
        ReportsAction::Dashboard => screen.dashboard().await.map(|s| render_dashboard(&s)),
        ReportsAction::Pipeline(args) => {
            let filter = args.filter(Local::now().date_naive());
            screen.pipeline(&filter).await.map(|r| render_pipeline(&r))
        }
    };

    match out {
        Ok(text) => {
            emit(&text);
            Ok(())
        }
        Err(e) => fail(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_days_sets_both_bounds() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let args = PipelineArgs {
            rep: Some("Bob".to_string()),
            days: Some(30),
            ..PipelineArgs::default()
        };

        let filter = args.filter(today);
        assert_eq!(filter.rep.as_deref(), Some("Bob"));
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(filter.to, Some(today));
    }

    #[test]
    fn test_explicit_range() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let args = PipelineArgs {
            from: NaiveDate::from_ymd_opt(2025, 1, 1),
            status: Some(OpportunityStatus::Won),
            ..PipelineArgs::default()
        };

        let filter = args.filter(today);
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2025, 1, 1));
        assert_eq!(filter.to, Some(today));
        assert_eq!(filter.status, Some(OpportunityStatus::Won));
    }

    #[test]
    fn test_no_date_flags_means_last_30_days() {
        let today = NaiveDate::from_ymd_opt(2025, 7, 31).unwrap();
        let filter = PipelineArgs::default().filter(today);
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2025, 7, 1));
        assert_eq!(filter.to, Some(today));

        let all = PipelineArgs {
            all_time: true,
            ..PipelineArgs::default()
        };
        let filter = all.filter(today);
        assert_eq!(filter.from, None);
        assert_eq!(filter.to, None);
    }
}
