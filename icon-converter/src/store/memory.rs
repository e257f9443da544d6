use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::RwLock;

use super::{join_url, ObjectInfo, ObjectStore, PutOptions, StoreError};

#[derive(Debug)]
struct FileHolder {
	remaining_capacity: usize,
	files: HashMap<String, MemoryObject>,
}

impl FileHolder {
	fn insert(&mut self, key: String, object: MemoryObject) -> Result<(), MemoryStoreError> {
		let replaced = self.files.get(&key).map_or(0, |old| old.data.len());

		if object.data.len() > self.remaining_capacity + replaced {
			return Err(MemoryStoreError::NoSpaceLeft);
		}

		self.remaining_capacity = self.remaining_capacity + replaced - object.data.len();
		self.files.insert(key, object);

		Ok(())
	}
}

/// An in-process store. Clones share the same objects.
#[derive(Debug, Clone)]
pub struct MemoryStore {
	name: String,
	public_url: String,
	files: Arc<RwLock<FileHolder>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryObject {
	pub data: Bytes,
	pub options: PutOptions,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MemoryStoreError {
	#[error("no space left in store")]
	NoSpaceLeft,
}

impl MemoryStore {
	pub fn new(name: &str, public_url: impl Into<String>, capacity: Option<usize>) -> Self {
		Self {
			name: name.to_owned(),
			public_url: public_url.into(),
			files: Arc::new(RwLock::new(FileHolder {
				remaining_capacity: capacity.unwrap_or(usize::MAX),
				files: HashMap::new(),
			})),
		}
	}

	pub async fn object(&self, key: &str) -> Option<MemoryObject> {
		self.files.read().await.files.get(key).cloned()
	}

	pub async fn keys(&self) -> Vec<String> {
		let mut keys = self.files.read().await.files.keys().cloned().collect::<Vec<_>>();
		keys.sort();
		keys
	}
}

impl ObjectStore for MemoryStore {
	fn name(&self) -> &str {
		&self.name
	}

	#[tracing::instrument(skip(self), name = "MemoryStore::get", err)]
	async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
		self.files
			.read()
			.await
			.files
			.get(key)
			.map(|object| object.data.clone())
			.ok_or(StoreError::NotFound)
	}

	#[tracing::instrument(skip(self, data, options), name = "MemoryStore::put", err, fields(size = data.len()))]
	async fn put(&self, key: &str, data: Bytes, options: PutOptions) -> Result<String, StoreError> {
		self.files
			.write()
			.await
			.insert(key.to_owned(), MemoryObject { data, options })?;

		Ok(self.public_url(key))
	}

	async fn stat(&self, key: &str) -> Result<Option<ObjectInfo>, StoreError> {
		Ok(self.files.read().await.files.get(key).map(|object| ObjectInfo {
			size: object.data.len() as u64,
			content_type: object.options.content_type.clone(),
		}))
	}

	fn public_url(&self, key: &str) -> String {
		join_url(&self.public_url, key)
	}
}
