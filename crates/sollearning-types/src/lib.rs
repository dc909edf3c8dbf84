//! Common types module for the SolLearning initialize runner.
//!
//! This module defines the data types shared between the runner crates: the
//! freshness token fetched before submission and the outcome of a single run.
//! Keeping them in one place lets the delivery, core and service crates agree
//! on the same shapes.

/// Ledger-facing types: blockhash freshness tokens.
pub mod delivery;
/// Run outcome types: success signature or failure diagnostics.
pub mod outcome;
/// Zeroizing wrapper for key material loaded from configuration.
pub mod secret_string;
/// Utility functions for display formatting.
pub mod utils;

pub use delivery::*;
pub use outcome::*;
pub use secret_string::SecretString;
pub use utils::{format_log_block, truncate_id};
