//! Data table component types.
//!
//! These types describe each screen's table declaratively: columns, dropdown
//! filters, row actions and search fields. The controller filters by them and
//! [`render_table`] prints them.

use std::borrow::Cow;

use crm_console_core::{LeadSource, LeadStatus, OpportunityStatus, Page, REPS, Record, UserRole};
use serde::{Deserialize, Serialize};

/// Column definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Record field shown in the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether the column is visible by default.
    pub default_visible: bool,
}

impl TableColumn {
    /// Create a new visible column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            default_visible: true,
        }
    }

    /// Set whether the column is visible by default.
    #[must_use]
    pub const fn visible(mut self, visible: bool) -> Self {
        self.default_visible = visible;
        self
    }
}

/// Filter type for data tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterType {
    /// Text input filter.
    Text,
    /// Single-select dropdown with an implicit "All".
    Select,
}

/// Filter definition for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableFilter {
    /// Record field the filter matches exactly.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Filter type.
    pub filter_type: FilterType,
    /// Available options (for selects).
    pub options: Vec<FilterOption>,
}

/// Option for select filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Option value.
    pub value: String,
    /// Display label.
    pub label: String,
}

impl FilterOption {
    /// Create a new filter option.
    #[must_use]
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }

    /// Options whose value and label are the same.
    #[must_use]
    pub fn from_labels(labels: &[&str]) -> Vec<Self> {
        labels.iter().map(|l| Self::new(l, l)).collect()
    }
}

impl TableFilter {
    /// Create a text filter.
    #[must_use]
    pub fn text(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Text,
            options: vec![],
        }
    }

    /// Create a select filter.
    #[must_use]
    pub fn select(key: &str, label: &str, options: Vec<FilterOption>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            filter_type: FilterType::Select,
            options,
        }
    }

    /// Whether `value` is acceptable for this filter. Empty means "All".
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        value.is_empty()
            || self.filter_type == FilterType::Text
            || self.options.iter().any(|o| o.value == value)
    }
}

/// Per-row action definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowAction {
    /// Action key (passed to the controller).
    pub key: String,
    /// Display label.
    pub label: String,
    /// Whether this is a destructive action.
    pub destructive: bool,
}

impl RowAction {
    /// Create a new row action.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            destructive: false,
        }
    }

    /// Mark this action as destructive.
    #[must_use]
    pub const fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTableConfig {
    /// Plural noun used in the footer (`Showing 1–5 of 5 leads`).
    pub noun: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Filter definitions.
    pub filters: Vec<TableFilter>,
    /// Row action definitions.
    pub row_actions: Vec<RowAction>,
    /// Record fields the free-text search looks in.
    pub search_fields: Vec<String>,
    /// Title for empty state.
    pub empty_title: String,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(noun: &str) -> Self {
        Self {
            noun: noun.to_string(),
            columns: vec![],
            filters: vec![],
            row_actions: vec![],
            search_fields: vec![],
            empty_title: format!("No {noun} found"),
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a filter.
    #[must_use]
    pub fn filter(mut self, filter: TableFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Add a row action.
    #[must_use]
    pub fn row_action(mut self, action: RowAction) -> Self {
        self.row_actions.push(action);
        self
    }

    /// Set the fields the search box looks in.
    #[must_use]
    pub fn search(mut self, fields: &[&str]) -> Self {
        self.search_fields = fields.iter().map(ToString::to_string).collect();
        self
    }

    /// Search fields as string slices.
    #[must_use]
    pub fn search_keys(&self) -> Vec<&str> {
        self.search_fields.iter().map(String::as_str).collect()
    }

    /// Look up a filter by its key.
    #[must_use]
    pub fn find_filter(&self, key: &str) -> Option<&TableFilter> {
        self.filters.iter().find(|f| f.key == key)
    }

    /// Get default visible columns.
    #[must_use]
    pub fn default_columns(&self) -> Vec<&TableColumn> {
        self.columns.iter().filter(|c| c.default_visible).collect()
    }
}

fn edit_delete(config: DataTableConfig) -> DataTableConfig {
    config
        .row_action(RowAction::new("edit", "Edit"))
        .row_action(RowAction::new("delete", "Delete").destructive())
}

/// Build the leads table configuration.
#[must_use]
pub fn leads_table_config() -> DataTableConfig {
    let config = DataTableConfig::new("leads")
        .column(TableColumn::new("id", "ID").visible(false))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("phone", "Phone"))
        .column(TableColumn::new("source", "Source"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("rep", "Rep"))
        .filter(TableFilter::select(
            "source",
            "Source",
            FilterOption::from_labels(&LeadSource::labels()),
        ))
        .filter(TableFilter::select(
            "status",
            "Status",
            FilterOption::from_labels(&LeadStatus::labels()),
        ))
        .search(&["name", "email"]);
    edit_delete(config).row_action(RowAction::new("convert", "Convert to Opportunity"))
}

/// Build the opportunities table configuration.
#[must_use]
pub fn opportunities_table_config() -> DataTableConfig {
    let config = DataTableConfig::new("opportunities")
        .column(TableColumn::new("id", "ID").visible(false))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("leadName", "Lead"))
        .column(TableColumn::new("value", "Value"))
        .column(TableColumn::new("rep", "Rep"))
        .column(TableColumn::new("status", "Status"))
        .column(TableColumn::new("closeDate", "Close Date"))
        .filter(TableFilter::select(
            "status",
            "Status",
            FilterOption::from_labels(&OpportunityStatus::labels()),
        ))
        .filter(TableFilter::select("rep", "Rep", FilterOption::from_labels(REPS)))
        .search(&["name", "leadName"]);
    edit_delete(config)
}

/// Build the follow-ups table configuration.
#[must_use]
pub fn follow_ups_table_config() -> DataTableConfig {
    let config = DataTableConfig::new("follow-ups")
        .column(TableColumn::new("id", "ID").visible(false))
        .column(TableColumn::new("title", "Title"))
        .column(TableColumn::new("date", "Date"))
        .column(TableColumn::new("leadName", "Lead"))
        .column(TableColumn::new("rep", "Rep"))
        .column(TableColumn::new("notes", "Notes"))
        .filter(TableFilter::select("rep", "Rep", FilterOption::from_labels(REPS)))
        .filter(TableFilter::text("date", "Date"))
        .search(&["title", "notes", "leadName"]);
    edit_delete(config)
}

/// Build the call logs table configuration.
#[must_use]
pub fn call_logs_table_config() -> DataTableConfig {
    let config = DataTableConfig::new("call logs")
        .column(TableColumn::new("id", "ID").visible(false))
        .column(TableColumn::new("leadName", "Lead"))
        .column(TableColumn::new("date", "Date"))
        .column(TableColumn::new("duration", "Duration"))
        .column(TableColumn::new("notes", "Notes"))
        .filter(TableFilter::text("date", "Date"))
        .search(&["leadName", "notes"]);
    edit_delete(config)
}

/// Build the users table configuration.
#[must_use]
pub fn users_table_config() -> DataTableConfig {
    let config = DataTableConfig::new("users")
        .column(TableColumn::new("id", "ID").visible(false))
        .column(TableColumn::new("name", "Name"))
        .column(TableColumn::new("email", "Email"))
        .column(TableColumn::new("role", "Role"))
        .column(TableColumn::new("lastLogin", "Last Login"))
        .filter(TableFilter::select(
            "role",
            "Role",
            FilterOption::from_labels(&UserRole::labels()),
        ))
        .search(&["name", "email"]);
    edit_delete(config)
}

/// Render one page as a plain-text table.
///
/// `cell` returns the text for a row and column key. An empty page renders a
/// single `No <noun> found` row. The footer reads `Showing <range> <noun>`,
/// followed by `, page <n> of <count>` when there is more than one page.
pub fn render_table<T>(
    config: &DataTableConfig,
    page: &Page<T>,
    cell: impl Fn(&T, &str) -> String,
) -> String {
    let columns = config.default_columns();

    let rows: Vec<Vec<String>> = page
        .items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|c| single_line(&cell(item, &c.key)))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.label.chars().count()).collect();
    for row in &rows {
        for (width, value) in widths.iter_mut().zip(row) {
            *width = (*width).max(value.chars().count());
        }
    }

    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| c.label.clone()).collect();
    push_row(&mut out, &header, &widths);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');

    if page.is_empty() {
        out.push_str(&config.empty_title);
        out.push('\n');
    }
    for row in &rows {
        push_row(&mut out, row, &widths);
    }

    out.push('\n');
    out.push_str(&format!("Showing {} {}", page.range_label(), config.noun));
    if page.page_count() > 1 {
        out.push_str(&format!(", page {} of {}", page.page + 1, page.page_count()));
    }
    out
}

/// Cell text for any record: its field value, or blank.
pub fn cell<R: Record>(row: &R, key: &str) -> String {
    row.field(key).map(Cow::into_owned).unwrap_or_default()
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}

fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}
