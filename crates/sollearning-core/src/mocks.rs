//! Test doubles for the ledger seam.

use async_trait::async_trait;
use mockall::mock;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use sollearning_delivery::{DeliveryError, LedgerClient};
use sollearning_types::FreshBlockhash;

mock! {
	pub Ledger {}

	#[async_trait]
	impl LedgerClient for Ledger {
		async fn latest_blockhash(&self) -> Result<FreshBlockhash, DeliveryError>;
		async fn confirm_blockhash(&self, fresh: &FreshBlockhash) -> Result<(), DeliveryError>;
		async fn submit(
			&self,
			tx: &Transaction,
			fresh: &FreshBlockhash,
		) -> Result<Signature, DeliveryError>;
		async fn transaction_logs(
			&self,
			signature: &Signature,
		) -> Result<Option<Vec<String>>, DeliveryError>;
	}
}
