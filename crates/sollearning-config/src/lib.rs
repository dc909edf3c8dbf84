//! Configuration module for the SolLearning initialize runner.
//!
//! This module provides structures and utilities for managing runner configuration.
//! It supports loading configuration from TOML files, resolving `${VAR}` and
//! `${VAR:-default}` environment references, and validating that every value
//! the runner depends on is usable before any network traffic happens.
//!
//! ## Anchor provider environment
//!
//! When no configuration file is supplied, [`Config::from_env`] starts from the
//! defaults and honours the variables an Anchor test harness exports:
//! - `ANCHOR_PROVIDER_URL` overrides `network.rpc_url`
//! - `ANCHOR_WALLET` sets `account.keypair_path` for the fee payer

#[cfg(any(test, feature = "testing"))]
pub mod builders;

use regex::Regex;
use serde::{Deserialize, Serialize};
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::pubkey::Pubkey;
use sollearning_types::SecretString;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Program id the SolLearning program is deployed under by default.
pub const DEFAULT_PROGRAM_ID: &str = "6F7BtsWEyMSf3RxKxxCxyJEdWJDMiuBsMMpMEWvbJGtm";

/// Environment variable Anchor uses for the cluster endpoint.
pub const PROVIDER_URL_ENV: &str = "ANCHOR_PROVIDER_URL";

/// Environment variable Anchor uses for the wallet keypair file.
pub const WALLET_ENV: &str = "ANCHOR_WALLET";

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		// Extract just the message without the huge input dump
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for the runner.
///
/// Every section is optional in the TOML source; missing sections fall back
/// to values suitable for a local test validator.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
	/// Identity of this runner, used in log output.
	#[serde(default)]
	pub runner: RunnerConfig,
	/// Cluster endpoint and confirmation settings.
	#[serde(default)]
	pub network: NetworkConfig,
	/// Target program settings.
	#[serde(default)]
	pub program: ProgramConfig,
	/// Optional fee-payer wallet.
	#[serde(default)]
	pub account: AccountConfig,
}

/// Configuration specific to the runner instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RunnerConfig {
	/// Identifier attached to log lines of this runner.
	#[serde(default = "default_runner_id")]
	pub id: String,
}

impl Default for RunnerConfig {
	fn default() -> Self {
		Self {
			id: default_runner_id(),
		}
	}
}

fn default_runner_id() -> String {
	"sollearning-initialize".to_string()
}

/// Cluster endpoint and confirmation settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NetworkConfig {
	/// JSON-RPC endpoint of the cluster.
	#[serde(default = "default_rpc_url")]
	pub rpc_url: String,
	/// Commitment level used for blockhash freshness, confirmation and lookups.
	#[serde(default = "default_commitment", with = "commitment_level")]
	pub commitment: CommitmentLevel,
	/// Timeout applied to every HTTP request.
	#[serde(default = "default_request_timeout")]
	pub request_timeout_seconds: u64,
	/// Upper bound on waiting for a blockhash or signature to settle.
	#[serde(default = "default_confirmation_timeout")]
	pub confirmation_timeout_seconds: u64,
	/// Delay between two status polls.
	#[serde(default = "default_poll_interval")]
	pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
	fn default() -> Self {
		Self {
			rpc_url: default_rpc_url(),
			commitment: default_commitment(),
			request_timeout_seconds: default_request_timeout(),
			confirmation_timeout_seconds: default_confirmation_timeout(),
			poll_interval_ms: default_poll_interval(),
		}
	}
}

impl NetworkConfig {
	/// Commitment in the form the RPC client takes.
	pub fn commitment_config(&self) -> CommitmentConfig {
		CommitmentConfig {
			commitment: self.commitment,
		}
	}
}

fn default_commitment() -> CommitmentLevel {
	CommitmentLevel::Confirmed
}

/// Stores a `CommitmentLevel` under its lowercase name.
mod commitment_level {
	use serde::de::Error as _;
	use serde::{Deserialize, Deserializer, Serializer};
	use solana_sdk::commitment_config::CommitmentLevel;
	use std::str::FromStr;

	pub fn serialize<S: Serializer>(
		level: &CommitmentLevel,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		serializer.collect_str(level)
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<CommitmentLevel, D::Error> {
		let name = String::deserialize(deserializer)?;
		CommitmentLevel::from_str(&name)
			.map_err(|_| D::Error::custom(format!("unknown commitment level '{}'", name)))
	}
}

/// Returns the default RPC endpoint of a local test validator.
fn default_rpc_url() -> String {
	"http://127.0.0.1:8899".to_string()
}

fn default_request_timeout() -> u64 {
	30
}

/// Returns the default confirmation timeout.
///
/// A blockhash stays valid for roughly 150 blocks, about a minute; waiting
/// longer than that for a signature is pointless.
fn default_confirmation_timeout() -> u64 {
	90
}

fn default_poll_interval() -> u64 {
	500
}

/// Target program settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProgramConfig {
	/// Base58 address of the deployed program.
	#[serde(default = "default_program_id")]
	pub program_id: String,
}

impl Default for ProgramConfig {
	fn default() -> Self {
		Self {
			program_id: default_program_id(),
		}
	}
}

fn default_program_id() -> String {
	DEFAULT_PROGRAM_ID.to_string()
}

/// Fee-payer wallet configuration.
///
/// At most one source may be set. With neither, the ephemeral identity
/// generated for the run pays its own fees.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
	/// Path to a keypair file in the Solana CLI JSON format.
	pub keypair_path: Option<PathBuf>,
	/// Inline keypair bytes in the same JSON array format.
	pub private_key: Option<SecretString>,
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB to prevent ReDoS attacks.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				}
			},
		};

		result.push_str(&input[last_end..full_match.start()]);
		result.push_str(&value);
		last_end = full_match.end();
	}
	result.push_str(&input[last_end..]);

	Ok(result)
}

impl Config {
	/// Loads configuration from a TOML file.
	///
	/// Environment references are resolved before parsing and the result is
	/// validated.
	pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = tokio::fs::read_to_string(path).await.map_err(|e| {
			ConfigError::Io(std::io::Error::new(
				e.kind(),
				format!("Cannot read {}: {}", path.display(), e),
			))
		})?;
		content.parse()
	}

	/// Builds a configuration from defaults and the Anchor provider environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		let mut config = Config::default();

		if let Ok(url) = std::env::var(PROVIDER_URL_ENV) {
			if !url.trim().is_empty() {
				tracing::debug!(rpc_url = %url, "Using endpoint from {}", PROVIDER_URL_ENV);
				config.network.rpc_url = url;
			}
		}

		if let Ok(wallet) = std::env::var(WALLET_ENV) {
			if !wallet.trim().is_empty() {
				tracing::debug!(wallet = %wallet, "Using fee payer from {}", WALLET_ENV);
				config.account.keypair_path = Some(PathBuf::from(wallet));
			}
		}

		config.validate()?;
		Ok(config)
	}

	/// Parses the configured program id.
	pub fn program_id(&self) -> Result<Pubkey, ConfigError> {
		Pubkey::from_str(self.program.program_id.trim()).map_err(|e| {
			ConfigError::Validation(format!(
				"Invalid program_id '{}': {}",
				self.program.program_id, e
			))
		})
	}

	/// Validates the configuration to ensure all values are usable.
	///
	/// This method checks:
	/// - Runner ID is not empty
	/// - RPC URL is an http(s) URL
	/// - Timeouts and poll interval are within sane bounds
	/// - Program id is a valid base58 address
	/// - At most one fee-payer source is configured, and it is not blank
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.runner.id.trim().is_empty() {
			return Err(ConfigError::Validation("Runner ID cannot be empty".into()));
		}

		let rpc_url = self.network.rpc_url.trim();
		if !(rpc_url.starts_with("http://") || rpc_url.starts_with("https://")) {
			return Err(ConfigError::Validation(format!(
				"rpc_url must start with http:// or https://, got '{}'",
				self.network.rpc_url
			)));
		}

		if self.network.request_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"request_timeout_seconds must be greater than 0".into(),
			));
		}
		if self.network.confirmation_timeout_seconds == 0 {
			return Err(ConfigError::Validation(
				"confirmation_timeout_seconds must be greater than 0".into(),
			));
		}
		if self.network.confirmation_timeout_seconds > 3600 {
			return Err(ConfigError::Validation(
				"confirmation_timeout_seconds cannot exceed 3600 (1 hour)".into(),
			));
		}
		if !(50..=60_000).contains(&self.network.poll_interval_ms) {
			return Err(ConfigError::Validation(
				"poll_interval_ms must be between 50 and 60000".into(),
			));
		}

		self.program_id()?;

		match (&self.account.keypair_path, &self.account.private_key) {
			(Some(_), Some(_)) => {
				return Err(ConfigError::Validation(
					"Only one of account.keypair_path and account.private_key may be set".into(),
				));
			}
			(Some(path), None) if path.as_os_str().is_empty() => {
				return Err(ConfigError::Validation(
					"account.keypair_path cannot be empty".into(),
				));
			}
			(None, Some(key)) if key.is_blank() => {
				return Err(ConfigError::Validation(
					"account.private_key cannot be empty".into(),
				));
			}
			_ => {}
		}

		Ok(())
	}
}

/// Implementation of FromStr trait for Config to enable parsing from string.
///
/// Environment variables are resolved and the configuration is validated
/// after parsing.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("SOLLEARNING_TEST_HOST", "localhost");
		std::env::set_var("SOLLEARNING_TEST_PORT", "8899");

		let input = "rpc_url = \"http://${SOLLEARNING_TEST_HOST}:${SOLLEARNING_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "rpc_url = \"http://localhost:8899\"");

		std::env::remove_var("SOLLEARNING_TEST_HOST");
		std::env::remove_var("SOLLEARNING_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${SOLLEARNING_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${SOLLEARNING_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("SOLLEARNING_MISSING_VAR"));
	}

	#[test]
	fn test_empty_config_uses_defaults() {
		let config: Config = "".parse().unwrap();
		assert_eq!(config.runner.id, "sollearning-initialize");
		assert_eq!(config.network.rpc_url, "http://127.0.0.1:8899");
		assert_eq!(config.network.commitment, CommitmentLevel::Confirmed);
		assert_eq!(config.program.program_id, DEFAULT_PROGRAM_ID);
		assert!(config.account.keypair_path.is_none());
		assert!(config.account.private_key.is_none());
		assert!(config.program_id().is_ok());
	}

	#[test]
	fn test_full_config() {
		let config_str = r#"
[runner]
id = "devnet-smoke"

[network]
rpc_url = "https://api.devnet.solana.com"
commitment = "finalized"
request_timeout_seconds = 10
confirmation_timeout_seconds = 120
poll_interval_ms = 1000

[program]
program_id = "6F7BtsWEyMSf3RxKxxCxyJEdWJDMiuBsMMpMEWvbJGtm"

[account]
keypair_path = "/home/dev/.config/solana/id.json"
"#;

		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.runner.id, "devnet-smoke");
		assert_eq!(config.network.commitment, CommitmentLevel::Finalized);
		assert_eq!(config.network.commitment_config(), CommitmentConfig::finalized());
		assert_eq!(config.network.poll_interval_ms, 1000);
		assert_eq!(
			config.account.keypair_path,
			Some(PathBuf::from("/home/dev/.config/solana/id.json"))
		);
	}

	#[test]
	fn test_invalid_program_id_rejected() {
		let config_str = r#"
[program]
program_id = "not-a-pubkey"
"#;
		let result = config_str.parse::<Config>();
		assert!(matches!(result, Err(ConfigError::Validation(_))));
	}

	#[test]
	fn test_invalid_rpc_url_rejected() {
		let config_str = r#"
[network]
rpc_url = "ws://127.0.0.1:8900"
"#;
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("rpc_url"));
	}

	#[test]
	fn test_unknown_commitment_rejected() {
		let config_str = r#"
[network]
commitment = "recent"
"#;
		assert!(matches!(
			config_str.parse::<Config>(),
			Err(ConfigError::Parse(_))
		));
	}

	#[test]
	fn test_poll_interval_bounds() {
		let config_str = r#"
[network]
poll_interval_ms = 10
"#;
		assert!(config_str.parse::<Config>().is_err());
	}

	#[test]
	fn test_both_fee_payer_sources_rejected() {
		let config_str = r#"
[account]
keypair_path = "/tmp/id.json"
private_key = "[1,2,3]"
"#;
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("Only one of"));
	}

	#[test]
	fn test_private_key_from_env_is_redacted_in_debug() {
		std::env::set_var("SOLLEARNING_TEST_FEE_PAYER", "[4,5,6]");
		let config_str = r#"
[account]
private_key = "${SOLLEARNING_TEST_FEE_PAYER}"
"#;
		let config: Config = config_str.parse().unwrap();
		let debug = format!("{:?}", config);
		assert!(!debug.contains("[4,5,6]"));
		assert!(config
			.account
			.private_key
			.as_ref()
			.unwrap()
			.with_exposed(|k| k == "[4,5,6]"));

		std::env::remove_var("SOLLEARNING_TEST_FEE_PAYER");
	}

	#[test]
	fn test_from_env_honours_anchor_variables() {
		std::env::set_var(PROVIDER_URL_ENV, "http://127.0.0.1:9999");
		std::env::set_var(WALLET_ENV, "/tmp/anchor-wallet.json");

		let config = Config::from_env().unwrap();
		assert_eq!(config.network.rpc_url, "http://127.0.0.1:9999");
		assert_eq!(
			config.account.keypair_path,
			Some(PathBuf::from("/tmp/anchor-wallet.json"))
		);

		std::env::remove_var(PROVIDER_URL_ENV);
		std::env::remove_var(WALLET_ENV);
	}

	#[tokio::test]
	async fn test_from_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(
			file,
			r#"
[runner]
id = "file-runner"

[network]
rpc_url = "http://localhost:8899"
"#
		)
		.unwrap();

		let config = Config::from_file(file.path()).await.unwrap();
		assert_eq!(config.runner.id, "file-runner");
		assert_eq!(config.network.rpc_url, "http://localhost:8899");
	}

	#[tokio::test]
	async fn test_from_missing_file() {
		let result = Config::from_file("/nonexistent/sollearning.toml").await;
		assert!(matches!(result, Err(ConfigError::Io(_))));
	}
}
