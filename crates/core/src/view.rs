//! Client-side filtering and pagination.
//!
//! Every screen fetches its full collection and derives the visible window
//! here. No filtering or paging is ever delegated to the server.
//!
//! ```
//! use crm_console_core::{Lead, ViewState};
//!
//! let leads: Vec<Lead> = serde_json::from_str(r#"[
//!     {"id": 1, "name": "John Doe", "email": "john@x.com", "source": "Website"},
//!     {"id": 2, "name": "Jane Smith", "email": "jane@x.com", "source": "Social"}
//! ]"#).unwrap();
//!
//! let mut state = ViewState::default();
//! state.set_search("jane");
//! let page = state.apply(&leads, &["name", "email"]);
//! assert_eq!(page.total, 1);
//! assert_eq!(page.items[0].id.as_str(), "2");
//! ```

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Page sizes offered by the pagination control.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

/// Default rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// A flat record that can be filtered and displayed by column key.
pub trait Record {
    /// The record id in string form.
    fn record_id(&self) -> &str;

    /// The display value of a column, or `None` if the record has no such field.
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// Free-text search plus exact-match dropdown filters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    /// Case-insensitive substring matched against the search fields.
    pub search: String,
    /// Field key to required value. Empty values are ignored.
    pub filters: BTreeMap<String, String>,
}

impl ViewQuery {
    /// Whether no constraint is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.filters.values().all(String::is_empty)
    }

    /// Whether a record passes the search and every active filter.
    pub fn matches<R: Record>(&self, record: &R, search_fields: &[&str]) -> bool {
        let needle = self.search.trim().to_lowercase();
        let search_ok = needle.is_empty()
            || search_fields.iter().any(|key| {
                record
                    .field(key)
                    .is_some_and(|value| value.to_lowercase().contains(&needle))
            });

        search_ok
            && self
                .filters
                .iter()
                .filter(|(_, wanted)| !wanted.is_empty())
                .all(|(key, wanted)| record.field(key).is_some_and(|v| v == wanted.as_str()))
    }

    /// Records matching this query, in collection order.
    pub fn filter<'a, R: Record>(&self, records: &'a [R], search_fields: &[&str]) -> Vec<&'a R> {
        if self.is_empty() {
            return records.iter().collect();
        }
        records
            .iter()
            .filter(|r| self.matches(*r, search_fields))
            .collect()
    }
}

/// One visible window of a filtered collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Rows in the window.
    pub items: Vec<T>,
    /// Size of the filtered collection.
    pub total: usize,
    /// Zero-based page index.
    pub page: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl<T> Page<T> {
    /// An empty page.
    #[must_use]
    pub const fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 0,
            page_size,
        }
    }

    /// Whether the window shows no rows (render the "no records" row).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages the filtered collection spans.
    #[must_use]
    pub const fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }

    /// The "showing X–Y of Z" label, e.g. `21–25 of 25`.
    #[must_use]
    pub fn range_label(&self) -> String {
        if self.items.is_empty() {
            return format!("0–0 of {}", self.total);
        }
        let start = self.page * self.page_size + 1;
        let end = start + self.items.len() - 1;
        format!("{start}–{end} of {}", self.total)
    }
}

/// Slice `[page * size, (page + 1) * size)` out of a filtered collection.
#[must_use]
pub fn paginate<T: Clone>(filtered: &[&T], page: usize, page_size: usize) -> Page<T> {
    let total = filtered.len();
    let start = page.saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);
    let items = filtered
        .get(start..end)
        .unwrap_or_default()
        .iter()
        .map(|r| (*r).clone())
        .collect();

    Page {
        items,
        total,
        page,
        page_size,
    }
}

/// Filter and pagination state of one screen.
///
/// Any change to the query or the page size moves back to the first page so
/// the window can never point past the end of a shrunken result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    query: ViewQuery,
    page: usize,
    page_size: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ViewState {
    /// Fresh state on the first page.
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            query: ViewQuery::default(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    /// The active query.
    #[must_use]
    pub const fn query(&self) -> &ViewQuery {
        &self.query
    }

    /// Zero-based page index.
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
        self.page = 0;
    }

    /// Set a dropdown filter. An empty value means "All".
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.filters.insert(key.into(), value.into());
        self.page = 0;
    }

    /// Remove a dropdown filter.
    pub fn clear_filter(&mut self, key: &str) {
        self.query.filters.remove(key);
        self.page = 0;
    }

    /// Change the rows per page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 0;
    }

    /// Move to another page of the same result set.
    pub const fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Pull the page index back inside `total` rows (after a delete shrank
    /// the collection under the current window).
    pub const fn clamp_to(&mut self, total: usize) {
        let last = total.saturating_sub(1) / self.page_size;
        if self.page > last {
            self.page = last;
        }
    }

    /// Derive the visible window from a full snapshot.
    #[must_use]
    pub fn apply<R: Record + Clone>(&self, records: &[R], search_fields: &[&str]) -> Page<R> {
        let filtered = self.query.filter(records, search_fields);
        paginate(&filtered, self.page, self.page_size)
    }
}
