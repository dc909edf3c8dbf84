//! Transaction delivery module for the SolLearning initialize runner.
//!
//! This module handles everything that crosses the network: fetching a fresh
//! blockhash, submitting a signed transaction and waiting for it to settle, and
//! looking up execution logs by signature. The [`LedgerClient`] trait is the
//! seam between the runner and the cluster; [`DeliveryService`] wraps one
//! client and adds the logging the runner relies on.

use async_trait::async_trait;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use solana_sdk::commitment_config::CommitmentLevel;
use sollearning_types::{truncate_id, FreshBlockhash};
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod solana {
		pub mod rpc;
	}
}

/// Errors that can occur during transaction delivery operations.
#[derive(Debug, Error)]
pub enum DeliveryError {
	/// The endpoint could not be reached or answered with a transport-level error.
	#[error("Network error: {0}")]
	Network(String),
	/// The endpoint was reached and answered the request with an error.
	#[error("RPC error: {0}")]
	Rpc(String),
	/// The cluster declined the transaction before dispatch, typically during
	/// preflight simulation.
	#[error("Transaction rejected: {message}")]
	Rejected { message: String, logs: Vec<String> },
	/// The transaction was dispatched and executed with an error.
	#[error("Transaction failed: {message}")]
	TransactionFailed {
		message: String,
		signature: Signature,
		logs: Vec<String>,
	},
	/// The transaction was dispatched but its status could no longer be observed.
	#[error("Confirmation failed for dispatched transaction: {message}")]
	Unconfirmed { message: String, signature: Signature },
	/// The awaited commitment was not reached in time.
	#[error("Timed out after {waited_seconds}s waiting for {commitment} commitment")]
	Timeout {
		signature: Option<Signature>,
		commitment: CommitmentLevel,
		waited_seconds: u64,
	},
	/// The blockhash expired before the dispatched transaction was confirmed.
	#[error(
		"Blockhash expired at block height {block_height} (last valid {last_valid_block_height}) before confirmation"
	)]
	Expired {
		signature: Signature,
		last_valid_block_height: u64,
		block_height: u64,
	},
	/// The endpoint answered with a payload that could not be interpreted.
	#[error("Invalid response: {0}")]
	InvalidResponse(String),
}

impl DeliveryError {
	/// Returns the execution logs attached to this error, if any.
	pub fn logs(&self) -> Option<&[String]> {
		match self {
			DeliveryError::Rejected { logs, .. } | DeliveryError::TransactionFailed { logs, .. }
				if !logs.is_empty() =>
			{
				Some(logs.as_slice())
			}
			_ => None,
		}
	}

	/// Returns the signature of the dispatched transaction, if it got that far.
	pub fn signature(&self) -> Option<&Signature> {
		match self {
			DeliveryError::TransactionFailed { signature, .. }
			| DeliveryError::Unconfirmed { signature, .. }
			| DeliveryError::Expired { signature, .. } => Some(signature),
			DeliveryError::Timeout { signature, .. } => signature.as_ref(),
			_ => None,
		}
	}
}

/// Trait defining the interface to a Solana cluster.
///
/// Each method is one round trip (or one bounded polling loop). Implementations
/// must not retry submissions; a failed submission is reported, not replayed.
#[async_trait]
pub trait LedgerClient: Send + Sync {
	/// Fetches the latest blockhash at the client's commitment.
	async fn latest_blockhash(&self) -> Result<FreshBlockhash, DeliveryError>;

	/// Waits until the endpoint reports the blockhash as valid at the client's
	/// commitment.
	async fn confirm_blockhash(&self, fresh: &FreshBlockhash) -> Result<(), DeliveryError>;

	/// Sends a signed transaction and waits until it reaches the client's
	/// commitment or `fresh` expires.
	///
	/// Errors raised after dispatch carry the transaction signature.
	async fn submit(
		&self,
		tx: &Transaction,
		fresh: &FreshBlockhash,
	) -> Result<Signature, DeliveryError>;

	/// Looks up the execution logs recorded for a signature.
	///
	/// Returns `Ok(None)` when the cluster has no record of the transaction or
	/// the record carries no logs.
	async fn transaction_logs(
		&self,
		signature: &Signature,
	) -> Result<Option<Vec<String>>, DeliveryError>;
}

/// Service that drives one [`LedgerClient`] for the runner.
pub struct DeliveryService {
	/// Underlying cluster client.
	client: Box<dyn LedgerClient>,
}

impl DeliveryService {
	/// Creates a new DeliveryService over the given client.
	pub fn new(client: Box<dyn LedgerClient>) -> Self {
		Self { client }
	}

	/// Fetches a blockhash and blocks until the endpoint confirms it is current.
	///
	/// The returned blockhash must be used for exactly one transaction.
	pub async fn fresh_blockhash(&self) -> Result<FreshBlockhash, DeliveryError> {
		let fresh = self.client.latest_blockhash().await?;
		tracing::debug!(
			blockhash = %fresh.blockhash,
			last_valid_block_height = fresh.last_valid_block_height,
			"Fetched latest blockhash"
		);

		self.client.confirm_blockhash(&fresh).await?;
		tracing::debug!(blockhash = %fresh.blockhash, "Blockhash confirmed");

		Ok(fresh)
	}

	/// Submits a transaction signed over `fresh` and waits for confirmation.
	pub async fn deliver(
		&self,
		tx: &Transaction,
		fresh: &FreshBlockhash,
	) -> Result<Signature, DeliveryError> {
		let signature = self.client.submit(tx, fresh).await?;
		tracing::info!(
			signature = %truncate_id(&signature.to_string()),
			"Transaction confirmed"
		);
		Ok(signature)
	}

	/// Fetches the authoritative execution logs for a signature.
	pub async fn fetch_logs(
		&self,
		signature: &Signature,
	) -> Result<Option<Vec<String>>, DeliveryError> {
		tracing::debug!(
			signature = %truncate_id(&signature.to_string()),
			"Looking up transaction logs"
		);
		self.client.transaction_logs(signature).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_logs_accessor() {
		let rejected = DeliveryError::Rejected {
			message: "simulation failed".into(),
			logs: vec!["Program log: missing account X".into()],
		};
		assert_eq!(
			rejected.logs(),
			Some(&["Program log: missing account X".to_string()][..])
		);
		assert!(rejected.signature().is_none());

		let empty = DeliveryError::Rejected {
			message: "simulation failed".into(),
			logs: vec![],
		};
		assert!(empty.logs().is_none());
	}

	#[test]
	fn test_signature_accessor() {
		let signature = Signature::from([3u8; 64]);

		let failed = DeliveryError::TransactionFailed {
			message: "custom program error".into(),
			signature,
			logs: vec![],
		};
		assert_eq!(failed.signature(), Some(&signature));
		assert!(failed.logs().is_none());

		let timeout = DeliveryError::Timeout {
			signature: Some(signature),
			commitment: CommitmentLevel::Confirmed,
			waited_seconds: 90,
		};
		assert_eq!(timeout.signature(), Some(&signature));
		assert!(timeout.to_string().contains("confirmed"));

		let expired = DeliveryError::Expired {
			signature,
			last_valid_block_height: 300,
			block_height: 301,
		};
		assert_eq!(expired.signature(), Some(&signature));

		let rpc = DeliveryError::Rpc("Method not found".into());
		assert!(rpc.signature().is_none());
		assert!(rpc.logs().is_none());

		let network = DeliveryError::Network("connection refused".into());
		assert!(network.signature().is_none());
		assert!(network.logs().is_none());
	}
}
