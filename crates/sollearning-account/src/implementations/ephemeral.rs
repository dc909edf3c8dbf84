//! Ephemeral per-run identity.

use crate::AccountInterface;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use std::fmt;

/// A keypair generated for a single run and dropped with it.
///
/// `Debug` prints the public key only.
pub struct EphemeralAccount {
	keypair: Keypair,
}

impl EphemeralAccount {
	/// Generates a new random keypair.
	pub fn generate() -> Self {
		Self {
			keypair: Keypair::new(),
		}
	}
}

impl AccountInterface for EphemeralAccount {
	fn pubkey(&self) -> Pubkey {
		self.keypair.pubkey()
	}

	fn signer(&self) -> &dyn Signer {
		&self.keypair
	}
}

impl fmt::Debug for EphemeralAccount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("EphemeralAccount")
			.field("pubkey", &self.keypair.pubkey())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_debug_shows_public_key_only() {
		let account = EphemeralAccount::generate();
		let debug = format!("{:?}", account);
		assert!(debug.contains(&account.pubkey().to_string()));
		assert!(!debug.contains(&account.keypair.to_base58_string()));
	}

	#[test]
	fn test_signer_matches_pubkey() {
		let account = EphemeralAccount::generate();
		assert_eq!(account.signer().pubkey(), account.pubkey());

		let message = b"initialize";
		let signature = account.signer().sign_message(message);
		assert!(signature.verify(account.pubkey().as_ref(), message));
	}
}
