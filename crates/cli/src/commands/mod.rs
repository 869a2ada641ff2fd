//! Command implementations.
//!
//! Every command prints the notice its screen raised, success or failure,
//! as `[severity] message`. Failures are also returned so the process exits
//! non-zero.

pub mod leads;
pub mod records;
pub mod reports;
pub mod settings;

use clap::Args;
use crm_console_admin::api::Resource;
use crm_console_admin::controller::DataView;
use crm_console_admin::{ConsoleError, Notice};
use crm_console_core::ViewState;
use crm_console_core::view::PAGE_SIZE_OPTIONS;

/// Write one block of command output to stdout.
#[allow(clippy::print_stdout)]
pub fn emit(text: &str) {
    println!("{text}");
}

/// Print a notice, if there is one.
pub fn emit_notice(notice: Option<&Notice>) {
    if let Some(notice) = notice {
        emit(&notice.to_string());
    }
}

/// Print the notice of a failed command and pass the error on.
pub fn fail<T>(err: ConsoleError) -> Result<T, ConsoleError> {
    emit(&err.notice().to_string());
    Err(err)
}

/// Search and paging flags shared by every `list` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Case-insensitive text to look for
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page to show, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (5, 10 or 25)
    #[arg(long, value_parser = parse_page_size)]
    pub page_size: Option<usize>,
}

impl ListArgs {
    /// Apply the flags plus screen-specific `filters` to a view state.
    pub fn apply(&self, state: &mut ViewState, filters: &[(&str, Option<String>)]) {
        if let Some(size) = self.page_size {
            state.set_page_size(size);
        }
        if let Some(search) = &self.search {
            state.set_search(search.clone());
        }
        for (key, value) in filters {
            if let Some(value) = value {
                state.set_filter(*key, value.clone());
            }
        }
        state.set_page(self.page.saturating_sub(1));
    }
}

/// Reject dropdown values the screen's table does not offer, before anything
/// is fetched.
///
/// # Errors
///
/// Returns the first `ConsoleError::UnknownFilterValue`.
pub fn check_filters<R: Resource>(
    view: &DataView<R>,
    filters: &[(&str, Option<String>)],
) -> Result<(), ConsoleError> {
    for (key, value) in filters {
        if let Some(value) = value {
            view.check_filter(key, value)?;
        }
    }
    Ok(())
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw.parse().map_err(|e| format!("{e}"))?;
    if PAGE_SIZE_OPTIONS.contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be one of {PAGE_SIZE_OPTIONS:?}"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_apply() {
        let args = ListArgs {
            search: Some("jane".to_string()),
            page: 2,
            page_size: Some(5),
        };
        let mut state = ViewState::default();
        args.apply(&mut state, &[("status", Some("New".to_string())), ("source", None)]);

        assert_eq!(state.page(), 1);
        assert_eq!(state.page_size(), 5);
        assert_eq!(state.query().search, "jane");
        assert_eq!(state.query().filters.get("status").unwrap(), "New");
        assert!(!state.query().filters.contains_key("source"));
    }

    #[test]
    fn test_parse_page_size() {
        assert_eq!(parse_page_size("25"), Ok(25));
        assert!(parse_page_size("7").is_err());
        assert!(parse_page_size("ten").is_err());
    }
}
