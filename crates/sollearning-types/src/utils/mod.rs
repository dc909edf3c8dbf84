//! Utility functions for display formatting.
//!
//! This module provides helpers used when logging signatures and rendering
//! execution logs in run reports.

pub mod formatting;

pub use formatting::{format_log_block, truncate_id};
