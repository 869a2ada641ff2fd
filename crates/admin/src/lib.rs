//! CRM Console admin library.
//!
//! Everything the console does over the network lives here: the REST client,
//! the per-screen data-view controller, the shared lead-name cache and the
//! print export. The `crm` binary is a thin shell over this crate.
//!
//! # Modules
//!
//! - [`api`] - REST client and the [`api::Resource`] trait
//! - [`controller`] - [`controller::DataView`], one screen's snapshot and state
//! - [`directory`] - Cached lead-name lookup shared between screens
//! - [`components`] - Declarative table descriptors and plain-text rendering
//! - [`print`] - Lead report PDF and print bridges
//! - [`screens`] - One type per console screen
//! - [`config`] - Environment configuration
//! - [`error`] - Console errors and user-facing notices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod components;
pub mod config;
pub mod controller;
pub mod directory;
pub mod error;
pub mod print;
pub mod screens;

pub use config::ConsoleConfig;
pub use error::{ConsoleError, Notice, Severity};
pub use screens::Console;
