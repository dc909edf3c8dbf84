//! Ledger delivery types for the runner.
//!
//! Commitment levels come from `solana_sdk::commitment_config`; this module
//! only adds the freshness token a transaction is built against.

use solana_sdk::hash::Hash;

/// A recent blockhash fetched from the cluster right before submission.
///
/// The blockhash proves the transaction was built recently. It is used for
/// exactly one transaction; a rejected or expired submission needs a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreshBlockhash {
	/// The blockhash the transaction message is signed over.
	pub blockhash: Hash,
	/// Last block height at which the cluster still accepts this blockhash.
	pub last_valid_block_height: u64,
}

impl FreshBlockhash {
	/// Returns true once the chain has moved past the blockhash's lifetime.
	pub fn is_expired_at(&self, block_height: u64) -> bool {
		block_height > self.last_valid_block_height
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_expiry_is_exclusive_of_last_valid_height() {
		let fresh = FreshBlockhash {
			blockhash: Hash::new_unique(),
			last_valid_block_height: 300,
		};
		assert!(!fresh.is_expired_at(299));
		assert!(!fresh.is_expired_at(300));
		assert!(fresh.is_expired_at(301));
	}
}
