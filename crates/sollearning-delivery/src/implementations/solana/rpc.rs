//! RPC delivery implementation for Solana clusters.
//!
//! This module implements [`LedgerClient`] on the nonblocking `RpcClient`
//! from `solana-client`. Confirmation is observed by polling signature
//! status and block height, so a transaction whose blockhash has expired is
//! reported instead of being waited on until the timeout.

use crate::{DeliveryError, LedgerClient};
use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcSendTransactionConfig, RpcTransactionConfig};
use solana_client::rpc_request::{RpcError, RpcResponseErrorData};
use solana_client::rpc_response::RpcSimulateTransactionResult;
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use solana_transaction_status_client_types::option_serializer::OptionSerializer;
use solana_transaction_status_client_types::UiTransactionEncoding;
use sollearning_config::NetworkConfig;
use sollearning_types::{truncate_id, FreshBlockhash};
use std::time::Duration;

/// Cluster client backed by `solana_client`'s nonblocking `RpcClient`.
pub struct RpcDelivery {
	/// RPC client with the configured request timeout and commitment.
	client: RpcClient,
	/// Commitment used for every request and for confirmation.
	commitment: CommitmentConfig,
	/// Upper bound on each polling loop.
	confirmation_timeout: Duration,
	/// Delay between polls.
	poll_interval: Duration,
}

impl RpcDelivery {
	/// Creates a new RpcDelivery from the network configuration.
	pub fn new(config: &NetworkConfig) -> Self {
		let commitment = config.commitment_config();
		let client = RpcClient::new_with_timeout_and_commitment(
			config.rpc_url.trim().to_string(),
			Duration::from_secs(config.request_timeout_seconds),
			commitment,
		);

		Self {
			client,
			commitment,
			confirmation_timeout: Duration::from_secs(config.confirmation_timeout_seconds),
			poll_interval: Duration::from_millis(config.poll_interval_ms),
		}
	}

	/// Polls until the signature reaches the configured commitment, fails, or
	/// its blockhash expires.
	async fn wait_for_confirmation(
		&self,
		signature: &Signature,
		fresh: &FreshBlockhash,
	) -> Result<(), DeliveryError> {
		let start_time = tokio::time::Instant::now();
		let short_signature = truncate_id(&signature.to_string());

		tracing::info!(
			signature = %short_signature,
			commitment = %self.commitment.commitment,
			last_valid_block_height = fresh.last_valid_block_height,
			"Waiting for confirmation (timeout: {}s)",
			self.confirmation_timeout.as_secs()
		);

		// Past this point the transaction is out; errors must keep the signature.
		let unconfirmed = |method: &str, e: ClientError| DeliveryError::Unconfirmed {
			message: map_client_error(method, e).to_string(),
			signature: *signature,
		};

		loop {
			if start_time.elapsed() > self.confirmation_timeout {
				return Err(DeliveryError::Timeout {
					signature: Some(*signature),
					commitment: self.commitment.commitment,
					waited_seconds: self.confirmation_timeout.as_secs(),
				});
			}

			// Read the height first so a status seen afterwards is never
			// mistaken for an expired transaction.
			let block_height = self
				.client
				.get_block_height_with_commitment(self.commitment)
				.await
				.map_err(|e| unconfirmed("getBlockHeight", e))?;

			let status = self
				.client
				.get_signature_status_with_commitment(signature, self.commitment)
				.await
				.map_err(|e| unconfirmed("getSignatureStatuses", e))?;

			match status {
				Some(Ok(())) => {
					tracing::debug!(
						signature = %short_signature,
						block_height,
						"Reached {} commitment",
						self.commitment.commitment
					);
					return Ok(());
				}
				Some(Err(err)) => {
					return Err(DeliveryError::TransactionFailed {
						message: format!("Transaction execution failed: {}", err),
						signature: *signature,
						logs: Vec::new(),
					});
				}
				None if fresh.is_expired_at(block_height) => {
					tracing::warn!(
						signature = %short_signature,
						block_height,
						last_valid_block_height = fresh.last_valid_block_height,
						"Blockhash expired before confirmation"
					);
					return Err(DeliveryError::Expired {
						signature: *signature,
						last_valid_block_height: fresh.last_valid_block_height,
						block_height,
					});
				}
				None => {
					tracing::debug!(
						signature = %short_signature,
						block_height,
						"Waiting for {} commitment",
						self.commitment.commitment
					);
				}
			}

			tokio::time::sleep(self.poll_interval).await;
		}
	}

	/// `getTransaction` does not serve `processed` data.
	fn lookup_commitment(&self) -> CommitmentConfig {
		match self.commitment.commitment {
			CommitmentLevel::Processed => CommitmentConfig::confirmed(),
			_ => self.commitment,
		}
	}
}

/// Maps a client error onto the delivery taxonomy.
///
/// Only transport failures count as network errors. An endpoint that answers
/// with a JSON-RPC error object was reached.
fn map_client_error(method: &str, error: ClientError) -> DeliveryError {
	match error.kind() {
		ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) => {
			DeliveryError::Network(format!("{} request failed: {}", method, error))
		}
		ClientErrorKind::RpcError(RpcError::RpcResponseError {
			message,
			data:
				RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
					logs,
					..
				}),
			..
		}) => DeliveryError::Rejected {
			message: message.clone(),
			logs: logs.clone().unwrap_or_default(),
		},
		ClientErrorKind::RpcError(RpcError::RpcResponseError { code, message, .. }) => {
			DeliveryError::Rpc(format!("{} failed ({}): {}", method, code, message))
		}
		ClientErrorKind::SerdeJson(_) | ClientErrorKind::RpcError(RpcError::ParseError(_)) => {
			DeliveryError::InvalidResponse(format!("{} returned an undecodable body: {}", method, error))
		}
		_ => DeliveryError::Rpc(format!("{} failed: {}", method, error)),
	}
}

#[async_trait]
impl LedgerClient for RpcDelivery {
	async fn latest_blockhash(&self) -> Result<FreshBlockhash, DeliveryError> {
		let (blockhash, last_valid_block_height) = self
			.client
			.get_latest_blockhash_with_commitment(self.commitment)
			.await
			.map_err(|e| map_client_error("getLatestBlockhash", e))?;

		Ok(FreshBlockhash {
			blockhash,
			last_valid_block_height,
		})
	}

	async fn confirm_blockhash(&self, fresh: &FreshBlockhash) -> Result<(), DeliveryError> {
		let start_time = tokio::time::Instant::now();

		loop {
			if start_time.elapsed() > self.confirmation_timeout {
				return Err(DeliveryError::Timeout {
					signature: None,
					commitment: self.commitment.commitment,
					waited_seconds: self.confirmation_timeout.as_secs(),
				});
			}

			let valid = self
				.client
				.is_blockhash_valid(&fresh.blockhash, self.commitment)
				.await
				.map_err(|e| map_client_error("isBlockhashValid", e))?;

			if valid {
				return Ok(());
			}

			tracing::debug!(blockhash = %fresh.blockhash, "Blockhash not yet valid");
			tokio::time::sleep(self.poll_interval).await;
		}
	}

	async fn submit(
		&self,
		tx: &Transaction,
		fresh: &FreshBlockhash,
	) -> Result<Signature, DeliveryError> {
		let config = RpcSendTransactionConfig {
			preflight_commitment: Some(self.commitment.commitment),
			encoding: Some(UiTransactionEncoding::Base64),
			..RpcSendTransactionConfig::default()
		};

		let signature = self
			.client
			.send_transaction_with_config(tx, config)
			.await
			.map_err(|e| {
				let error = map_client_error("sendTransaction", e);
				tracing::warn!(
					log_lines = error.logs().map_or(0, <[String]>::len),
					error = %error,
					"sendTransaction failed"
				);
				error
			})?;

		tracing::info!(signature = %truncate_id(&signature.to_string()), "Submitted transaction");

		self.wait_for_confirmation(&signature, fresh).await?;
		Ok(signature)
	}

	async fn transaction_logs(
		&self,
		signature: &Signature,
	) -> Result<Option<Vec<String>>, DeliveryError> {
		let config = RpcTransactionConfig {
			encoding: Some(UiTransactionEncoding::Json),
			commitment: Some(self.lookup_commitment()),
			max_supported_transaction_version: Some(0),
		};

		match self.client.get_transaction_with_config(signature, config).await {
			Ok(record) => Ok(record
				.transaction
				.meta
				.and_then(|meta| match meta.log_messages {
					OptionSerializer::Some(logs) => Some(logs),
					_ => None,
				})),
			// A `null` result, the node has no record of the signature.
			Err(e) if matches!(e.kind(), ClientErrorKind::SerdeJson(_)) => Ok(None),
			Err(e) => Err(map_client_error("getTransaction", e)),
		}
	}
}

/// Factory function to create an RPC-backed ledger client from configuration.
pub fn create_rpc_delivery(config: &NetworkConfig) -> Box<dyn LedgerClient> {
	let delivery = RpcDelivery::new(config);
	tracing::info!(
		rpc_url = %delivery.client.url(),
		commitment = %delivery.commitment.commitment,
		"Created RPC delivery"
	);
	Box::new(delivery)
}
