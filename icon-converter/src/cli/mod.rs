use std::path::PathBuf;

use binary_helper::{DatabaseConfig, LoggingConfig, S3BucketConfig};
use icon_converter::store::StoreKind;
use icon_converter::ConverterConfig;

pub mod display;

/// Converts DDS icons in the catalog to PNG and republishes them
#[derive(Debug, clap::Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
	/// Json output
	#[clap(long, global = true)]
	pub json: bool,

	/// Which object store holds the icons
	#[clap(long = "store", env = "ICON_STORE", value_enum, default_value_t)]
	pub store: StoreKind,

	/// Root directory of the local store
	#[clap(long = "store-root", env = "ICON_STORE_ROOT")]
	pub store_root: Option<PathBuf>,

	#[clap(flatten)]
	pub logging: LoggingConfig,

	#[clap(flatten)]
	pub database: DatabaseConfig,

	#[clap(flatten)]
	pub bucket: S3BucketConfig,

	#[clap(flatten)]
	pub converter: ConverterConfig,

	#[clap(subcommand)]
	pub command: Option<Commands>,
}

#[derive(Debug, Clone, clap::Subcommand)]
pub enum Commands {
	/// Convert every pending icon (the default)
	Convert {
		/// Print what would happen without fetching, uploading or writing
		#[clap(long)]
		dry_run: bool,

		/// Process at most this many records
		#[clap(long)]
		limit: Option<usize>,
	},

	/// List icons that have not been converted yet
	Pending {
		/// List at most this many records
		#[clap(long)]
		limit: Option<usize>,
	},

	/// Add the converted url column to the catalog if it is missing
	Migrate,
}

impl Default for Commands {
	fn default() -> Self {
		Self::Convert {
			dry_run: false,
			limit: None,
		}
	}
}
