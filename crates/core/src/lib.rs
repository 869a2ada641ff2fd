//! CRM Console Core - Shared types and pure algorithms.
//!
//! This crate holds everything the console computes without I/O. It is used by:
//! - `admin` - REST client, data-view controller and print export
//! - `cli` - The `crm` command-line console
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no HTTP clients,
//! no filesystem access. Every screen's filter, page window and report is
//! derived here from an in-memory snapshot.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, emails, amounts and statuses
//! - [`records`] - Lead, opportunity, follow-up, call log, user and settings records
//! - [`validation`] - Pre-submit form validation
//! - [`view`] - Client-side filtering and pagination
//! - [`reports`] - Dashboard, pipeline and call analytics aggregation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod records;
pub mod reports;
pub mod types;
pub mod validation;
pub mod view;

pub use records::*;
pub use types::*;
pub use validation::{Validate, ValidationErrors};
pub use view::{Page, Record, ViewQuery, ViewState};
