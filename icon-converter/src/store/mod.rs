use std::future::Future;
use std::path::PathBuf;

use bytes::Bytes;

use self::local::LocalStore;
use self::memory::{MemoryStore, MemoryStoreError};
use self::s3::{S3Store, S3StoreError};

pub mod local;
pub mod memory;
pub mod s3;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("s3: {0}")]
	S3(#[from] S3StoreError),
	#[error("memory: {0}")]
	Memory(#[from] MemoryStoreError),
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("invalid key: {0}")]
	InvalidKey(String),
	#[error("not found")]
	NotFound,
	#[error("timed out")]
	Timeout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutOptions {
	pub content_type: Option<String>,
	pub cache_control: Option<String>,
	pub acl: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectInfo {
	pub size: u64,
	pub content_type: Option<String>,
}

/// A keyed blob store with publicly reachable objects.
pub trait ObjectStore {
	/// The bucket (or namespace) this store serves.
	fn name(&self) -> &str;

	/// Read an object. A missing key is [`StoreError::NotFound`].
	fn get(&self, key: &str) -> impl Future<Output = Result<Bytes, StoreError>> + Send;

	/// Store an object, replacing any existing one under the same key, and
	/// return its public URL.
	fn put(&self, key: &str, data: Bytes, options: PutOptions) -> impl Future<Output = Result<String, StoreError>> + Send;

	/// Metadata of an object, `None` when it does not exist.
	fn stat(&self, key: &str) -> impl Future<Output = Result<Option<ObjectInfo>, StoreError>> + Send;

	/// The URL an object under `key` is publicly served from.
	fn public_url(&self, key: &str) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
	#[default]
	S3,
	Local,
	Memory,
}

#[derive(Debug)]
pub enum AnyStore {
	S3(S3Store),
	Local(LocalStore),
	Memory(MemoryStore),
}

impl ObjectStore for AnyStore {
	fn name(&self) -> &str {
		match self {
			AnyStore::S3(store) => store.name(),
			AnyStore::Local(store) => store.name(),
			AnyStore::Memory(store) => store.name(),
		}
	}

	async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
		match self {
			AnyStore::S3(store) => store.get(key).await,
			AnyStore::Local(store) => store.get(key).await,
			AnyStore::Memory(store) => store.get(key).await,
		}
	}

	async fn put(&self, key: &str, data: Bytes, options: PutOptions) -> Result<String, StoreError> {
		match self {
			AnyStore::S3(store) => store.put(key, data, options).await,
			AnyStore::Local(store) => store.put(key, data, options).await,
			AnyStore::Memory(store) => store.put(key, data, options).await,
		}
	}

	async fn stat(&self, key: &str) -> Result<Option<ObjectInfo>, StoreError> {
		match self {
			AnyStore::S3(store) => store.stat(key).await,
			AnyStore::Local(store) => store.stat(key).await,
			AnyStore::Memory(store) => store.stat(key).await,
		}
	}

	fn public_url(&self, key: &str) -> String {
		match self {
			AnyStore::S3(store) => store.public_url(key),
			AnyStore::Local(store) => store.public_url(key),
			AnyStore::Memory(store) => store.public_url(key),
		}
	}
}

pub async fn build_store(
	kind: StoreKind,
	bucket: &binary_helper::S3BucketConfig,
	root: Option<PathBuf>,
) -> anyhow::Result<AnyStore> {
	use anyhow::Context as _;

	let public_url = bucket.public_base_url();

	match kind {
		StoreKind::S3 => {
			let client = binary_helper::global::setup_s3(bucket).await?;
			Ok(AnyStore::S3(S3Store::new(client, &bucket.name, public_url)))
		}
		StoreKind::Local => {
			let root = root.context("a store root is required for the local store")?;
			Ok(AnyStore::Local(LocalStore::new(&bucket.name, root, public_url).await?))
		}
		StoreKind::Memory => Ok(AnyStore::Memory(MemoryStore::new(&bucket.name, public_url, None))),
	}
}

/// Appends `key` to `base`, percent-encoding each path segment.
pub(crate) fn join_url(base: &str, key: &str) -> String {
	let path = key
		.trim_start_matches('/')
		.split('/')
		.map(|segment| urlencoding::encode(segment))
		.collect::<Vec<_>>()
		.join("/");

	format!("{}/{}", base.trim_end_matches('/'), path)
}
