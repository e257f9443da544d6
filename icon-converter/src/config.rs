use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, clap::Args)]
pub struct ConverterConfig {
	/// Timeout for each catalog call
	#[clap(long, env = "ICON_CATALOG_TIMEOUT", default_value = "10s", value_parser = humantime::parse_duration)]
	pub catalog_timeout: Duration,

	/// Timeout for downloading a source asset
	#[clap(long, env = "ICON_FETCH_TIMEOUT", default_value = "30s", value_parser = humantime::parse_duration)]
	pub fetch_timeout: Duration,

	/// Timeout for uploading a converted asset
	#[clap(long, env = "ICON_UPLOAD_TIMEOUT", default_value = "30s", value_parser = humantime::parse_duration)]
	pub upload_timeout: Duration,

	/// Deadline for processing a single record from start to finish
	#[clap(long, env = "ICON_RECORD_TIMEOUT", default_value = "2m", value_parser = humantime::parse_duration)]
	pub record_timeout: Duration,

	/// Largest source asset accepted, in bytes
	#[clap(long, env = "ICON_MAX_INPUT_BYTES", default_value_t = 32 * 1024 * 1024)]
	pub max_input_bytes: u64,

	/// Largest width or height accepted
	#[clap(long, env = "ICON_MAX_DIMENSION", default_value_t = 4096)]
	pub max_dimension: u32,

	/// Where per-record scratch directories are created, defaults to the
	/// system temp directory
	#[clap(long, env = "ICON_WORK_DIR")]
	pub work_dir: Option<PathBuf>,

	/// Cache-Control set on uploaded assets
	#[clap(long, env = "ICON_CACHE_CONTROL", default_value = "public, max-age=31536000")]
	pub cache_control: String,

	/// Canned ACL set on uploaded assets
	#[clap(long, env = "ICON_ACL", default_value = "public-read")]
	pub acl: String,

	/// Do not check the stored object after uploading
	#[clap(long, env = "ICON_SKIP_VERIFY")]
	pub skip_verify: bool,
}

impl Default for ConverterConfig {
	fn default() -> Self {
		Self {
			catalog_timeout: Duration::from_secs(10),
			fetch_timeout: Duration::from_secs(30),
			upload_timeout: Duration::from_secs(30),
			record_timeout: Duration::from_secs(120),
			max_input_bytes: 32 * 1024 * 1024,
			max_dimension: 4096,
			work_dir: None,
			cache_control: "public, max-age=31536000".to_owned(),
			acl: "public-read".to_owned(),
			skip_verify: false,
		}
	}
}

impl ConverterConfig {
	pub fn work_dir(&self) -> PathBuf {
		self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
	}

	pub fn verify_uploads(&self) -> bool {
		!self.skip_verify
	}
}
