//! Outcome of a single initialize run.
//!
//! A run ends in exactly one of two shapes: a confirmed signature, or a
//! failure report carrying the best diagnostics that could be collected.
//! The enum makes a half-populated result unrepresentable.

use crate::utils::format_log_block;
use solana_sdk::signature::Signature;
use std::fmt;

/// Category of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
	/// The endpoint could not be reached; nothing was dispatched.
	Connectivity,
	/// The cluster or program declined the transaction before dispatch and
	/// attached execution logs.
	Rejected,
	/// The transaction was dispatched and has a signature, but execution or
	/// confirmation failed.
	Partial,
	/// No signature and no logs. Usually a signer or account wiring problem.
	Indeterminate,
}

impl fmt::Display for FailureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			FailureKind::Connectivity => "connectivity",
			FailureKind::Rejected => "rejected",
			FailureKind::Partial => "partial",
			FailureKind::Indeterminate => "indeterminate",
		};
		f.write_str(name)
	}
}

/// Result of the follow-up log lookup performed after a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLookup {
	/// No signature existed, so no lookup was made.
	NotAttempted,
	/// The cluster returned execution logs for the signature.
	Found(Vec<String>),
	/// The lookup succeeded but the cluster had no logs for the signature.
	NotFound,
	/// The lookup itself failed.
	Failed(String),
}

/// Diagnostics collected for a failed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
	/// Failure category.
	pub kind: FailureKind,
	/// Human-readable error message of the underlying failure.
	pub message: String,
	/// Logs attached to the error itself, in the order the program emitted them.
	pub logs: Option<Vec<String>>,
	/// Signature of the transaction if it reached the network.
	pub signature: Option<Signature>,
	/// Outcome of the lookup by signature.
	pub lookup: LogLookup,
}

/// Outcome of one run: exactly one of success or failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
	/// The transaction reached the requested commitment.
	Confirmed { signature: Signature },
	/// The run failed; see the report for diagnostics.
	Failed(FailureReport),
}

impl TransactionOutcome {
	/// Returns true when the transaction was confirmed.
	pub fn is_success(&self) -> bool {
		matches!(self, TransactionOutcome::Confirmed { .. })
	}

	/// Returns the transaction signature, whether the run succeeded or not.
	pub fn signature(&self) -> Option<&Signature> {
		match self {
			TransactionOutcome::Confirmed { signature } => Some(signature),
			TransactionOutcome::Failed(report) => report.signature.as_ref(),
		}
	}

	/// Returns the failure report, if any.
	pub fn failure(&self) -> Option<&FailureReport> {
		match self {
			TransactionOutcome::Confirmed { .. } => None,
			TransactionOutcome::Failed(report) => Some(report),
		}
	}
}

impl fmt::Display for FailureReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		writeln!(f, "Transaction failed ({}): {}", self.kind, self.message)?;

		if let Some(logs) = &self.logs {
			writeln!(f, "Transaction logs:")?;
			writeln!(f, "{}", format_log_block(logs))?;
		}

		match &self.signature {
			Some(signature) => {
				writeln!(f, "Fetching logs by signature {}...", signature)?;
				match &self.lookup {
					LogLookup::Found(lines) => write!(f, "{}", format_log_block(lines)),
					LogLookup::NotFound | LogLookup::NotAttempted => write!(f, "No logs found."),
					LogLookup::Failed(error) => write!(f, "Log lookup failed: {}", error),
				}
			}
			None => write!(
				f,
				"No transaction signature was generated. Check that the accounts are correct."
			),
		}
	}
}

impl fmt::Display for TransactionOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TransactionOutcome::Confirmed { signature } => {
				write!(f, "Transaction succeeded! Signature: {}", signature)
			}
			TransactionOutcome::Failed(report) => write!(f, "{}", report),
		}
	}
}
