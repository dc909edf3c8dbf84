//! Main entry point for the SolLearning initialize runner.
//!
//! Runs the program's `initialize` transaction once against the configured
//! cluster with a freshly generated identity, and prints either the
//! confirmed signature or the collected diagnostics.

use clap::Parser;
use sollearning_config::{Config, ConfigError};
use sollearning_core::RunnerBuilder;
use std::path::{Path, PathBuf};

/// Command-line arguments for the runner.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file. Without one, defaults apply and the
	/// ANCHOR_PROVIDER_URL / ANCHOR_WALLET environment is honoured.
	#[arg(short, long, env = "SOLLEARNING_CONFIG")]
	config: Option<PathBuf>,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

/// Main entry point for the runner.
///
/// This function:
/// 1. Parses command-line arguments
/// 2. Initializes logging infrastructure
/// 3. Loads configuration from file or environment
/// 4. Builds the runner and performs one run
/// 5. Prints the outcome
///
/// A failed transaction is a reported outcome, not an error exit.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let default_directive = args.log_level.to_string();
	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started runner");

	let config = load_config(args.config.as_deref()).await?;
	tracing::info!("Loaded configuration [{}]", config.runner.id);

	let runner = RunnerBuilder::new(config).build()?;
	let outcome = runner.run().await;

	if outcome.is_success() {
		tracing::info!("Run succeeded");
	} else {
		tracing::warn!("Run failed");
	}
	println!("{}", outcome);

	tracing::info!("Stopped runner");
	Ok(())
}

/// Loads configuration from the given file, or from defaults and environment.
async fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
	match path {
		Some(path) => Config::from_file(path).await,
		None => Config::from_env(),
	}
}
