use std::path::{Component, Path, PathBuf};

use bytes::Bytes;

use super::{join_url, ObjectInfo, ObjectStore, PutOptions, StoreError};

/// Objects kept as files under a root directory, for running against a
/// mirror of the bucket.
#[derive(Debug)]
pub struct LocalStore {
	name: String,
	root: PathBuf,
	public_url: String,
}

impl LocalStore {
	#[tracing::instrument(skip(root, public_url), name = "LocalStore::new", err)]
	pub async fn new(name: &str, root: PathBuf, public_url: impl Into<String>) -> Result<Self, StoreError> {
		tracing::debug!(root = %root.display(), "setting up local store");

		if !root.exists() {
			tokio::fs::create_dir_all(&root).await?;
		}

		Ok(Self {
			name: name.to_owned(),
			root,
			public_url: public_url.into(),
		})
	}

	fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
		let relative = Path::new(key.trim_start_matches('/'));

		if relative.as_os_str().is_empty() || !relative.components().all(|c| matches!(c, Component::Normal(_))) {
			return Err(StoreError::InvalidKey(key.to_owned()));
		}

		Ok(self.root.join(relative))
	}
}

impl ObjectStore for LocalStore {
	fn name(&self) -> &str {
		&self.name
	}

	#[tracing::instrument(skip(self), name = "LocalStore::get", err)]
	async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
		match tokio::fs::read(self.path(key)?).await {
			Ok(data) => Ok(data.into()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound),
			Err(err) => Err(err.into()),
		}
	}

	#[tracing::instrument(skip(self, data, options), name = "LocalStore::put", err, fields(size = data.len()))]
	async fn put(&self, key: &str, data: Bytes, options: PutOptions) -> Result<String, StoreError> {
		let path = self.path(key)?;

		if let Some(parent) = path.parent() {
			tokio::fs::create_dir_all(parent).await?;
		}

		tracing::debug!(content_type = ?options.content_type, "writing file");

		// readers never see a partially written object
		let mut partial = path.clone().into_os_string();
		partial.push(".partial");
		tokio::fs::write(&partial, &data).await?;
		tokio::fs::rename(&partial, &path).await?;

		Ok(self.public_url(key))
	}

	#[tracing::instrument(skip(self), name = "LocalStore::stat", err)]
	async fn stat(&self, key: &str) -> Result<Option<ObjectInfo>, StoreError> {
		match tokio::fs::metadata(self.path(key)?).await {
			Ok(metadata) if metadata.is_file() => Ok(Some(ObjectInfo {
				size: metadata.len(),
				content_type: None,
			})),
			Ok(_) => Ok(None),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err.into()),
		}
	}

	fn public_url(&self, key: &str) -> String {
		join_url(&self.public_url, key)
	}
}
