use std::time::Duration;

use crate::logging;

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct LoggingConfig {
	/// The log level to use, this is a tracing env filter
	#[clap(long = "log-level", env = "LOG_LEVEL", default_value = "info")]
	pub level: String,

	/// What logging mode we should use
	#[clap(long = "log-mode", env = "LOG_MODE", value_enum, default_value_t)]
	pub mode: logging::Mode,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			mode: logging::Mode::Default,
		}
	}
}

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct DatabaseConfig {
	/// The catalog database host
	#[clap(long = "db-host", env = "DB_HOST", default_value = "localhost")]
	pub host: String,

	/// The catalog database port
	#[clap(long = "db-port", env = "DB_PORT", default_value_t = 55432)]
	pub port: u16,

	/// The catalog database user
	#[clap(long = "db-user", env = "DB_USER", default_value = "postgres")]
	pub user: String,

	/// The catalog database password
	#[clap(long = "db-password", env = "DB_PASSWORD", default_value = "password", hide_env_values = true)]
	pub password: String,

	/// The catalog database name
	#[clap(id = "db_name", long = "db-name", env = "DB_NAME", default_value = "snowmuffin")]
	pub name: String,

	/// How long to wait for a new connection
	#[clap(long = "db-connect-timeout", env = "DB_CONNECT_TIMEOUT", default_value = "5s", value_parser = humantime::parse_duration)]
	pub connect_timeout: Duration,

	/// Maximum number of pooled connections
	#[clap(long = "db-pool-size", env = "DB_POOL_SIZE", default_value_t = 2)]
	pub pool_size: usize,
}

impl Default for DatabaseConfig {
	fn default() -> Self {
		Self {
			host: "localhost".to_string(),
			port: 55432,
			user: "postgres".to_string(),
			password: "password".to_string(),
			name: "snowmuffin".to_string(),
			connect_timeout: Duration::from_secs(5),
			pool_size: 2,
		}
	}
}

#[derive(Debug, Default, Clone, PartialEq, clap::Args)]
pub struct S3CredentialsConfig {
	/// The access key for the S3 bucket, the default credential chain is used
	/// when unset
	#[clap(long = "s3-access-key", env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
	pub access_key: Option<String>,

	/// The secret key for the S3 bucket
	#[clap(long = "s3-secret-key", env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
	pub secret_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct S3BucketConfig {
	/// The name of the S3 bucket
	#[clap(id = "s3_bucket", long = "s3-bucket", env = "S3_BUCKET_NAME", default_value = "snowmuffin-game-assets")]
	pub name: String,

	/// The region the S3 bucket is in
	#[clap(long = "s3-region", env = "AWS_REGION", default_value = "ap-northeast-2")]
	pub region: String,

	/// The custom endpoint for the S3 bucket
	#[clap(long = "s3-endpoint", env = "S3_ENDPOINT")]
	pub endpoint: Option<String>,

	/// Use path style addressing
	#[clap(long = "s3-force-path-style", env = "S3_FORCE_PATH_STYLE")]
	pub force_path_style: bool,

	/// Base URL objects are publicly served from
	#[clap(long = "s3-public-url", env = "S3_PUBLIC_URL")]
	pub public_url: Option<String>,

	#[clap(flatten)]
	pub credentials: S3CredentialsConfig,
}

impl Default for S3BucketConfig {
	fn default() -> Self {
		Self {
			name: "snowmuffin-game-assets".to_owned(),
			region: "ap-northeast-2".to_owned(),
			endpoint: None,
			force_path_style: false,
			public_url: None,
			credentials: S3CredentialsConfig::default(),
		}
	}
}

impl S3BucketConfig {
	/// The base URL under which a key of this bucket is publicly reachable.
	pub fn public_base_url(&self) -> String {
		if let Some(public_url) = &self.public_url {
			return public_url.trim_end_matches('/').to_owned();
		}

		match &self.endpoint {
			Some(endpoint) if self.force_path_style => format!("{}/{}", endpoint.trim_end_matches('/'), self.name),
			_ => format!("https://{}.s3.{}.amazonaws.com", self.name, self.region),
		}
	}
}
