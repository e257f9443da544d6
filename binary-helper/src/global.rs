use anyhow::Context as _;
use aws_config::{AppName, BehaviorVersion, Region};
use aws_credential_types::Credentials;
use deadpool_postgres::{ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

use crate::config::{DatabaseConfig, S3BucketConfig};

const APP_NAME: &str = "icon-converter";

pub fn setup_database(config: &DatabaseConfig) -> anyhow::Result<Pool> {
	let mut pg_config = tokio_postgres::Config::new();

	pg_config
		.host(&config.host)
		.port(config.port)
		.user(&config.user)
		.password(&config.password)
		.dbname(&config.name)
		.application_name(APP_NAME)
		.connect_timeout(config.connect_timeout)
		.ssl_mode(tokio_postgres::config::SslMode::Disable);

	let manager = deadpool_postgres::Manager::from_config(
		pg_config,
		NoTls,
		ManagerConfig {
			recycling_method: RecyclingMethod::Fast,
		},
	);

	Pool::builder(manager)
		.max_size(config.pool_size.max(1))
		.create_timeout(Some(config.connect_timeout))
		.wait_timeout(Some(config.connect_timeout))
		.runtime(Runtime::Tokio1)
		.build()
		.context("failed to create database pool")
}

pub async fn setup_s3(config: &S3BucketConfig) -> anyhow::Result<aws_sdk_s3::Client> {
	let shared = aws_config::defaults(BehaviorVersion::latest())
		.region(Region::new(config.region.clone()))
		.app_name(AppName::new(APP_NAME).context("invalid app name")?)
		.load()
		.await;

	let mut builder = aws_sdk_s3::config::Builder::from(&shared).force_path_style(config.force_path_style);

	if let Some(endpoint) = &config.endpoint {
		builder = builder.endpoint_url(endpoint);
	}

	if let (Some(access_key), Some(secret_key)) = (&config.credentials.access_key, &config.credentials.secret_key) {
		builder = builder.credentials_provider(Credentials::from_keys(access_key, secret_key, None));
	}

	Ok(aws_sdk_s3::Client::from_conf(builder.build()))
}
