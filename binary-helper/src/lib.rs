pub mod config;
pub mod global;
pub mod logging;
pub mod signal;

pub use self::config::{DatabaseConfig, LoggingConfig, S3BucketConfig, S3CredentialsConfig};

/// Installs logging from the parsed configuration.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
	logging::init(&config.level, config.mode)?;
	Ok(())
}
