//! Failure diagnostics for a run.
//!
//! Turns a [`DeliveryError`] into a [`FailureReport`]: assigns the failure
//! category, copies the logs attached to the error, and performs the single
//! follow-up log lookup when the transaction reached the network.

use sollearning_delivery::{DeliveryError, DeliveryService};
use sollearning_types::{truncate_id, FailureKind, FailureReport, LogLookup};

/// Assigns a failure category to a delivery error.
pub fn classify(error: &DeliveryError) -> FailureKind {
	match error {
		DeliveryError::Network(_) => FailureKind::Connectivity,
		DeliveryError::Rejected { logs, .. } if !logs.is_empty() => FailureKind::Rejected,
		_ if error.signature().is_some() => FailureKind::Partial,
		_ => FailureKind::Indeterminate,
	}
}

/// Collects diagnostics for a failed delivery.
///
/// Calls the log lookup exactly once when the error carries a signature and
/// never otherwise. A failing lookup is recorded in the report, not raised.
pub async fn collect(delivery: &DeliveryService, error: &DeliveryError) -> FailureReport {
	let kind = classify(error);
	let logs = error.logs().map(<[String]>::to_vec);
	let signature = error.signature().copied();

	let lookup = match &signature {
		Some(signature) => {
			let short_signature = truncate_id(&signature.to_string());
			match delivery.fetch_logs(signature).await {
				Ok(Some(lines)) if !lines.is_empty() => {
					tracing::debug!(
						signature = %short_signature,
						log_lines = lines.len(),
						"Found transaction logs"
					);
					LogLookup::Found(lines)
				}
				Ok(_) => {
					tracing::debug!(signature = %short_signature, "No logs recorded");
					LogLookup::NotFound
				}
				Err(e) => {
					tracing::warn!(signature = %short_signature, error = %e, "Log lookup failed");
					LogLookup::Failed(e.to_string())
				}
			}
		}
		None => LogLookup::NotAttempted,
	};

	FailureReport {
		kind,
		message: error.to_string(),
		logs,
		signature,
		lookup,
	}
}

/// Report for a run that failed before anything was sent.
pub fn local_failure(message: impl Into<String>) -> FailureReport {
	FailureReport {
		kind: FailureKind::Indeterminate,
		message: message.into(),
		logs: None,
		signature: None,
		lookup: LogLookup::NotAttempted,
	}
}
