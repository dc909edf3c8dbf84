//! Builders for assembling configurations in tests and tooling.

mod config;

pub use config::ConfigBuilder;
