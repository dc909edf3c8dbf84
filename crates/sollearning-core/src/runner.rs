//! The transaction runner.
//!
//! One run is a straight line: identities, fresh blockhash, signed
//! `initialize` transaction, submission, and either a confirmed signature or
//! a failure report. Nothing is retried.

use crate::diagnostics;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signer::{Signer, SignerError};
use solana_sdk::transaction::Transaction;
use sollearning_account::implementations::ephemeral::EphemeralAccount;
use sollearning_account::{AccountInterface, AccountService};
use sollearning_delivery::{DeliveryError, DeliveryService};
use sollearning_program::{accounts, instruction};
use sollearning_types::{truncate_id, FreshBlockhash, TransactionOutcome};
use tracing::instrument;

/// Runs the `initialize` transaction against one cluster.
pub struct TransactionRunner {
	id: String,
	program_id: Pubkey,
	accounts: AccountService,
	delivery: DeliveryService,
}

impl TransactionRunner {
	/// Creates a runner from its services. Prefer [`crate::RunnerBuilder`].
	pub fn new(
		id: String,
		program_id: Pubkey,
		accounts: AccountService,
		delivery: DeliveryService,
	) -> Self {
		Self {
			id,
			program_id,
			accounts,
			delivery,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn program_id(&self) -> Pubkey {
		self.program_id
	}

	/// Performs one complete attempt and reports how it ended.
	///
	/// Never fails: every error is turned into a [`TransactionOutcome::Failed`]
	/// carrying whatever diagnostics could be collected.
	#[instrument(skip_all, fields(runner = %self.id))]
	pub async fn run(&self) -> TransactionOutcome {
		let authority = self.accounts.fresh_identity();
		let mint = self.accounts.fresh_identity();
		tracing::info!(
			authority = %authority.pubkey(),
			mint = %mint.pubkey(),
			"Generated signer identity"
		);

		let fresh = match self.delivery.fresh_blockhash().await {
			Ok(fresh) => fresh,
			Err(e) => return self.fail(e).await,
		};

		let tx = match self.build_transaction(&authority, &mint, &fresh) {
			Ok(tx) => tx,
			Err(e) => {
				tracing::error!(error = %e, "Failed to sign transaction");
				return TransactionOutcome::Failed(diagnostics::local_failure(format!(
					"Failed to sign transaction: {}",
					e
				)));
			}
		};

		match self.delivery.deliver(&tx, &fresh).await {
			Ok(signature) => {
				tracing::info!(
					signature = %truncate_id(&signature.to_string()),
					"Initialize succeeded"
				);
				TransactionOutcome::Confirmed { signature }
			}
			Err(e) => self.fail(e).await,
		}
	}

	/// Builds and signs the `initialize` transaction.
	///
	/// The configured fee payer pays when present; otherwise the ephemeral
	/// authority pays its own way.
	fn build_transaction(
		&self,
		authority: &EphemeralAccount,
		mint: &EphemeralAccount,
		fresh: &FreshBlockhash,
	) -> Result<Transaction, SignerError> {
		let accounts =
			accounts::Initialize::resolve(&self.program_id, authority.pubkey(), mint.pubkey());
		let ix = instruction::initialize(&self.program_id, &accounts);

		let mut signers: Vec<&dyn Signer> = Vec::with_capacity(3);
		let payer = match self.accounts.fee_payer() {
			Some(fee_payer) if fee_payer.pubkey() != authority.pubkey() => {
				signers.push(fee_payer.signer());
				fee_payer.pubkey()
			}
			_ => authority.pubkey(),
		};
		signers.push(authority.signer());
		signers.push(mint.signer());

		let mut tx = Transaction::new_with_payer(&[ix], Some(&payer));
		tx.try_sign(&signers, fresh.blockhash)?;

		tracing::debug!(
			payer = %payer,
			program_state = %accounts.program_state,
			blockhash = %fresh.blockhash,
			"Signed initialize transaction"
		);
		Ok(tx)
	}

	async fn fail(&self, error: DeliveryError) -> TransactionOutcome {
		let report = diagnostics::collect(&self.delivery, &error).await;
		tracing::warn!(kind = %report.kind, error = %error, "Initialize failed");
		TransactionOutcome::Failed(report)
	}
}
