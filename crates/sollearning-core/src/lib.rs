//! Core runner for the SolLearning `initialize` transaction.
//!
//! This crate wires the account, program and delivery services into a single
//! [`TransactionRunner`] that performs one complete attempt: generate a fresh
//! identity, obtain and confirm a blockhash, submit the signed `initialize`
//! transaction, and turn whatever happens into a [`TransactionOutcome`].
//! The runner never returns an error; failures become diagnostics.

pub mod builder;
pub mod diagnostics;
pub mod runner;

pub use builder::{BuilderError, RunnerBuilder};
pub use runner::TransactionRunner;
pub use sollearning_types::{FailureKind, FailureReport, LogLookup, TransactionOutcome};

#[cfg(test)]
mod mocks;
