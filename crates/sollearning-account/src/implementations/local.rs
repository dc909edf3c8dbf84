//! Fee-payer wallet loaded from local key material.
//!
//! Both sources use the Solana CLI keypair format: a JSON array of the 64
//! secret-key bytes.

use crate::{AccountError, AccountInterface};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{read_keypair, read_keypair_file, Keypair, Signer};
use sollearning_types::SecretString;
use std::fmt;
use std::path::Path;

/// A wallet backed by a keypair read from disk or configuration.
pub struct LocalAccount {
	keypair: Keypair,
}

impl LocalAccount {
	/// Loads the keypair from a Solana CLI keypair file.
	pub fn from_file(path: &Path) -> Result<Self, AccountError> {
		let keypair = read_keypair_file(path).map_err(|e| AccountError::KeypairFile {
			path: path.display().to_string(),
			reason: e.to_string(),
		})?;
		Ok(Self { keypair })
	}

	/// Parses the keypair from inline key material.
	pub fn from_secret(secret: &SecretString) -> Result<Self, AccountError> {
		let keypair = secret
			.with_exposed(|key| read_keypair(&mut key.trim().as_bytes()))
			.map_err(|_| AccountError::InvalidKey("expected a JSON array of 64 bytes".into()))?;
		Ok(Self { keypair })
	}
}

impl AccountInterface for LocalAccount {
	fn pubkey(&self) -> Pubkey {
		self.keypair.pubkey()
	}

	fn signer(&self) -> &dyn Signer {
		&self.keypair
	}
}

impl fmt::Debug for LocalAccount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LocalAccount")
			.field("pubkey", &self.keypair.pubkey())
			.finish()
	}
}
