//! Configuration builder for creating test and development configurations.
//!
//! This module provides utilities for constructing Config instances with
//! sensible defaults, particularly useful for testing scenarios.

use crate::{AccountConfig, Config, NetworkConfig, ProgramConfig, RunnerConfig};
use solana_sdk::commitment_config::CommitmentLevel;
use sollearning_types::SecretString;
use std::path::PathBuf;

/// Builder for creating `Config` instances with a fluent API.
///
/// Defaults target a local validator with short timeouts so that tests fail fast.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
	runner_id: String,
	rpc_url: String,
	commitment: CommitmentLevel,
	confirmation_timeout_seconds: u64,
	poll_interval_ms: u64,
	program_id: String,
	keypair_path: Option<PathBuf>,
	private_key: Option<SecretString>,
}

impl Default for ConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl ConfigBuilder {
	/// Creates a new `ConfigBuilder` with default values suitable for testing.
	pub fn new() -> Self {
		Self {
			runner_id: "test-runner".to_string(),
			rpc_url: "http://127.0.0.1:8899".to_string(),
			commitment: CommitmentLevel::Confirmed,
			confirmation_timeout_seconds: 5,
			poll_interval_ms: 50,
			program_id: crate::DEFAULT_PROGRAM_ID.to_string(),
			keypair_path: None,
			private_key: None,
		}
	}

	/// Sets the runner ID.
	pub fn runner_id(mut self, id: impl Into<String>) -> Self {
		self.runner_id = id.into();
		self
	}

	/// Sets the RPC endpoint.
	pub fn rpc_url(mut self, url: impl Into<String>) -> Self {
		self.rpc_url = url.into();
		self
	}

	/// Sets the commitment level.
	pub fn commitment(mut self, commitment: CommitmentLevel) -> Self {
		self.commitment = commitment;
		self
	}

	/// Sets the confirmation timeout in seconds.
	pub fn confirmation_timeout_seconds(mut self, timeout: u64) -> Self {
		self.confirmation_timeout_seconds = timeout;
		self
	}

	/// Sets the program id.
	pub fn program_id(mut self, program_id: impl Into<String>) -> Self {
		self.program_id = program_id.into();
		self
	}

	/// Sets the fee-payer keypair file.
	pub fn keypair_path(mut self, path: impl Into<PathBuf>) -> Self {
		self.keypair_path = Some(path.into());
		self
	}

	/// Sets the inline fee-payer keypair.
	pub fn private_key(mut self, key: impl Into<SecretString>) -> Self {
		self.private_key = Some(key.into());
		self
	}

	/// Builds the `Config` with the configured values.
	pub fn build(self) -> Config {
		Config {
			runner: RunnerConfig { id: self.runner_id },
			network: NetworkConfig {
				rpc_url: self.rpc_url,
				commitment: self.commitment,
				confirmation_timeout_seconds: self.confirmation_timeout_seconds,
				poll_interval_ms: self.poll_interval_ms,
				..NetworkConfig::default()
			},
			program: ProgramConfig {
				program_id: self.program_id,
			},
			account: AccountConfig {
				keypair_path: self.keypair_path,
				private_key: self.private_key,
			},
		}
	}
}
