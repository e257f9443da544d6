use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;

use super::bound;
use crate::store::{ObjectStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
	#[error("object {0} not found")]
	NotFound(String),
	#[error("store: {0}")]
	Store(StoreError),
	#[error("source is {size} bytes, limit is {limit}")]
	TooLarge { size: u64, limit: u64 },
	#[error("timed out")]
	Timeout,
	#[error("scratch directory: {0}")]
	Scratch(#[from] std::io::Error),
}

/// Scratch space for one record. The directory and everything in it is
/// removed when this is dropped, whichever way processing ended.
#[derive(Debug)]
pub struct Workspace {
	dir: tempfile::TempDir,
	source: PathBuf,
	output: PathBuf,
	source_size: u64,
}

impl Workspace {
	pub fn create(root: &Path, id: i32) -> std::io::Result<Self> {
		std::fs::create_dir_all(root)?;

		let dir = tempfile::Builder::new().prefix(&format!("icon-{id}-")).tempdir_in(root)?;

		Ok(Self {
			source: dir.path().join("source.dds"),
			output: dir.path().join("converted.png"),
			dir,
			source_size: 0,
		})
	}

	pub fn path(&self) -> &Path {
		self.dir.path()
	}

	pub fn source_path(&self) -> &Path {
		&self.source
	}

	pub fn output_path(&self) -> &Path {
		&self.output
	}

	pub fn source_size(&self) -> u64 {
		self.source_size
	}
}

/// Retrieves source assets into a fresh [`Workspace`]. Objects larger than
/// `max_bytes` are rejected from their metadata, before any download.
pub struct AssetFetcher<'a, S> {
	store: &'a S,
	work_dir: &'a Path,
	timeout: Duration,
	max_bytes: u64,
}

impl<'a, S: ObjectStore> AssetFetcher<'a, S> {
	pub fn new(store: &'a S, work_dir: &'a Path, timeout: Duration, max_bytes: u64) -> Self {
		Self {
			store,
			work_dir,
			timeout,
			max_bytes,
		}
	}

	#[tracing::instrument(skip(self, deadline), name = "AssetFetcher::fetch", err)]
	pub async fn fetch(&self, id: i32, key: &str, deadline: Instant) -> Result<Workspace, FetchError> {
		let info = tokio::time::timeout_at(bound(deadline, self.timeout), self.store.stat(key))
			.await
			.map_err(|_| FetchError::Timeout)?
			.map_err(FetchError::Store)?
			.ok_or_else(|| FetchError::NotFound(key.to_owned()))?;

		self.check_size(info.size)?;

		let data = tokio::time::timeout_at(bound(deadline, self.timeout), self.store.get(key))
			.await
			.map_err(|_| FetchError::Timeout)?
			.map_err(|err| match err {
				StoreError::NotFound => FetchError::NotFound(key.to_owned()),
				err => FetchError::Store(err),
			})?;

		// the object may have been replaced since the stat
		self.check_size(data.len() as u64)?;

		let mut workspace = Workspace::create(self.work_dir, id)?;
		tokio::fs::write(workspace.source_path(), &data).await?;
		workspace.source_size = data.len() as u64;

		tracing::debug!(size = data.len(), path = %workspace.path().display(), "fetched source");

		Ok(workspace)
	}

	fn check_size(&self, size: u64) -> Result<(), FetchError> {
		if size > self.max_bytes {
			return Err(FetchError::TooLarge {
				size,
				limit: self.max_bytes,
			});
		}

		Ok(())
	}
}
