//! Builder for constructing the transaction runner.
//!
//! Validates the configuration, loads the optional fee payer and creates the
//! ledger client. The ledger client can be supplied directly, which is how
//! tests substitute a double for the network.

use crate::runner::TransactionRunner;
use sollearning_account::{create_fee_payer, AccountService};
use sollearning_config::Config;
use sollearning_delivery::implementations::solana::rpc::create_rpc_delivery;
use sollearning_delivery::{DeliveryService, LedgerClient};
use thiserror::Error;

/// Errors that can occur during runner construction.
///
/// These happen before any network traffic and indicate a configuration
/// problem or a component that could not be created.
#[derive(Debug, Error)]
pub enum BuilderError {
	#[error("Configuration error: {0}")]
	Config(String),
	#[error("Failed to create {component}: {reason}")]
	Component {
		component: &'static str,
		reason: String,
	},
}

/// Builder for constructing a [`TransactionRunner`].
pub struct RunnerBuilder {
	config: Config,
	ledger: Option<Box<dyn LedgerClient>>,
}

impl RunnerBuilder {
	/// Creates a new RunnerBuilder with the given configuration.
	pub fn new(config: Config) -> Self {
		Self {
			config,
			ledger: None,
		}
	}

	/// Uses the given ledger client instead of the configured RPC endpoint.
	pub fn with_ledger(mut self, ledger: Box<dyn LedgerClient>) -> Self {
		self.ledger = Some(ledger);
		self
	}

	/// Builds the runner.
	pub fn build(self) -> Result<TransactionRunner, BuilderError> {
		self.config
			.validate()
			.map_err(|e| BuilderError::Config(e.to_string()))?;

		let program_id = self
			.config
			.program_id()
			.map_err(|e| BuilderError::Config(e.to_string()))?;
		tracing::info!(component = "program", program_id = %program_id, "Loaded");

		let fee_payer = create_fee_payer(
			self.config.account.keypair_path.as_deref(),
			self.config.account.private_key.as_ref(),
		)
		.map_err(|e| {
			tracing::error!(component = "account", error = %e, "Failed to load fee payer");
			BuilderError::Component {
				component: "account",
				reason: e.to_string(),
			}
		})?;
		tracing::info!(
			component = "account",
			fee_payer = fee_payer.is_some(),
			"Loaded"
		);

		let ledger = match self.ledger {
			Some(ledger) => ledger,
			None => create_rpc_delivery(&self.config.network),
		};
		tracing::info!(component = "delivery", rpc_url = %self.config.network.rpc_url, "Loaded");

		Ok(TransactionRunner::new(
			self.config.runner.id,
			program_id,
			AccountService::new(fee_payer),
			DeliveryService::new(ledger),
		))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mocks::MockLedger;
	use sollearning_config::builders::ConfigBuilder;

	#[test]
	fn test_build_with_defaults() {
		let config = ConfigBuilder::new().build();
		let runner = RunnerBuilder::new(config)
			.with_ledger(Box::new(MockLedger::new()))
			.build()
			.unwrap();

		assert_eq!(runner.id(), "test-runner");
		assert_eq!(runner.program_id(), sollearning_program::ID);
	}

	#[test]
	fn test_build_creates_rpc_delivery() {
		let config = ConfigBuilder::new().build();
		assert!(RunnerBuilder::new(config).build().is_ok());
	}

	#[test]
	fn test_invalid_program_id_is_config_error() {
		let config = ConfigBuilder::new().program_id("not-a-pubkey").build();
		let result = RunnerBuilder::new(config)
			.with_ledger(Box::new(MockLedger::new()))
			.build();
		assert!(matches!(result, Err(BuilderError::Config(_))));
	}

	#[test]
	fn test_missing_keypair_file_is_component_error() {
		let config = ConfigBuilder::new()
			.keypair_path("/nonexistent/payer.json")
			.build();
		let result = RunnerBuilder::new(config)
			.with_ledger(Box::new(MockLedger::new()))
			.build();
		assert!(matches!(
			result,
			Err(BuilderError::Component {
				component: "account",
				..
			})
		));
	}
}
