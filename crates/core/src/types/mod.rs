//! Core value types for the CRM console.
//!
//! This module provides type-safe wrappers for record ids, contact emails,
//! money amounts and the fixed option lists used by dropdowns.

pub mod amount;
pub mod email;
pub mod id;
pub mod status;

pub use amount::Amount;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
