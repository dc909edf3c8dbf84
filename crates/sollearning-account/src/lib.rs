//! Account management module for the SolLearning initialize runner.
//!
//! This module provides the signer identities a run needs: a fresh ephemeral
//! keypair generated per invocation, and an optional fee-payer wallet loaded
//! from a keypair file or inline key material. Only public keys ever leave
//! this crate in logs.

use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signer;
use sollearning_types::SecretString;
use std::path::Path;
use thiserror::Error;

/// Re-export implementations
pub mod implementations {
	pub mod ephemeral;
	pub mod local;
}

use implementations::{ephemeral::EphemeralAccount, local::LocalAccount};

/// Errors that can occur during account operations.
#[derive(Debug, Error)]
pub enum AccountError {
	/// Error that occurs when a keypair file cannot be read.
	#[error("Cannot read keypair file {path}: {reason}")]
	KeypairFile { path: String, reason: String },
	/// Error that occurs when key material is invalid or malformed.
	#[error("Invalid key: {0}")]
	InvalidKey(String),
}

/// Trait defining the interface for signer identities.
///
/// Implementations hold a keypair for the lifetime of one run and expose it
/// as a `solana_sdk` signer so transactions can be signed without copying
/// key material around.
pub trait AccountInterface: Send + Sync {
	/// Returns the public key of this account.
	fn pubkey(&self) -> Pubkey;

	/// Returns the signer used to sign transactions for this account.
	fn signer(&self) -> &dyn Signer;
}

/// Service that hands out signer identities for a run.
///
/// Holds the optional fee payer and mints ephemeral identities on demand.
pub struct AccountService {
	/// Wallet that pays transaction fees, if one was configured.
	fee_payer: Option<Box<dyn AccountInterface>>,
}

impl AccountService {
	/// Creates a new AccountService with an optional fee-payer wallet.
	pub fn new(fee_payer: Option<Box<dyn AccountInterface>>) -> Self {
		Self { fee_payer }
	}

	/// Generates a fresh ephemeral identity.
	///
	/// Every call returns a new keypair; nothing is persisted.
	pub fn fresh_identity(&self) -> EphemeralAccount {
		EphemeralAccount::generate()
	}

	/// Returns the configured fee payer, if any.
	pub fn fee_payer(&self) -> Option<&dyn AccountInterface> {
		self.fee_payer.as_deref()
	}
}

/// Builds the fee-payer account from configuration values.
///
/// Returns `Ok(None)` when neither source is set, in which case the run's
/// ephemeral identity pays its own fees.
pub fn create_fee_payer(
	keypair_path: Option<&Path>,
	private_key: Option<&SecretString>,
) -> Result<Option<Box<dyn AccountInterface>>, AccountError> {
	let account = match (keypair_path, private_key) {
		(Some(path), _) => LocalAccount::from_file(path)?,
		(None, Some(key)) => LocalAccount::from_secret(key)?,
		(None, None) => return Ok(None),
	};

	tracing::info!(fee_payer = %account.pubkey(), "Loaded fee payer");
	Ok(Some(Box::new(account)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use solana_sdk::signature::Keypair;

	#[test]
	fn test_fresh_identities_are_distinct() {
		let service = AccountService::new(None);
		let first = service.fresh_identity();
		let second = service.fresh_identity();
		assert_ne!(first.pubkey(), second.pubkey());
		assert!(service.fee_payer().is_none());
	}

	#[test]
	fn test_create_fee_payer_none() {
		let payer = create_fee_payer(None, None).unwrap();
		assert!(payer.is_none());
	}

	#[test]
	fn test_create_fee_payer_from_secret() {
		let keypair = Keypair::new();
		let secret = SecretString::from(format!("{:?}", keypair.to_bytes().to_vec()));

		let payer = create_fee_payer(None, Some(&secret)).unwrap().unwrap();
		assert_eq!(payer.pubkey(), keypair.pubkey());

		let service = AccountService::new(Some(payer));
		assert_eq!(service.fee_payer().unwrap().pubkey(), keypair.pubkey());
	}

	#[test]
	fn test_create_fee_payer_invalid_secret() {
		let secret = SecretString::from("not a keypair");
		let result = create_fee_payer(None, Some(&secret));
		assert!(matches!(result, Err(AccountError::InvalidKey(_))));
	}
}
