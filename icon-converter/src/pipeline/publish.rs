use bytes::Bytes;
use tokio::time::Instant;

use super::bound;
use crate::catalog::{Catalog, CatalogError, IconRecord};
use crate::config::ConverterConfig;
use crate::store::{ObjectStore, PutOptions, StoreError};

pub const PNG_CONTENT_TYPE: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
	#[error("store: {0}")]
	Store(#[from] StoreError),
	#[error("stored object is {actual:?} bytes, uploaded {expected}")]
	Verification { expected: u64, actual: Option<u64> },
	#[error("catalog update for {url}: {source}")]
	CatalogUpdate { url: String, source: CatalogError },
}

/// Stores converted assets and records their location in the catalog.
pub struct AssetPublisher<'a, C, S> {
	catalog: &'a C,
	store: &'a S,
	config: &'a ConverterConfig,
}

impl<'a, C: Catalog, S: ObjectStore> AssetPublisher<'a, C, S> {
	pub fn new(catalog: &'a C, store: &'a S, config: &'a ConverterConfig) -> Self {
		Self { catalog, store, config }
	}

	fn put_options(&self) -> PutOptions {
		PutOptions {
			content_type: Some(PNG_CONTENT_TYPE.to_owned()),
			cache_control: Some(self.config.cache_control.clone()).filter(|c| !c.is_empty()),
			acl: Some(self.config.acl.clone()).filter(|acl| !acl.is_empty()),
		}
	}

	/// Uploads `data` under `key`, checks the stored object and then records
	/// its URL. The catalog is only written once the object is in place.
	#[tracing::instrument(skip(self, data, deadline), name = "AssetPublisher::publish", fields(size = data.len()), err)]
	pub async fn publish(&self, id: i32, key: &str, data: Bytes, deadline: Instant) -> Result<String, PublishError> {
		let size = data.len() as u64;

		let url = tokio::time::timeout_at(
			bound(deadline, self.config.upload_timeout),
			self.store.put(key, data, self.put_options()),
		)
		.await
		.map_err(|_| StoreError::Timeout)??;

		if self.config.verify_uploads() {
			self.verify(key, size, deadline).await?;
		}

		self.mark(id, &url, deadline).await?;

		Ok(url)
	}

	/// Records an asset that is already a PNG. Nothing is uploaded.
	#[tracing::instrument(skip(self, record, deadline), name = "AssetPublisher::link_existing", fields(id = record.id), err)]
	pub async fn link_existing(&self, record: &IconRecord, deadline: Instant) -> Result<String, PublishError> {
		self.mark(record.id, &record.source_url, deadline).await?;
		Ok(record.source_url.clone())
	}

	async fn verify(&self, key: &str, expected: u64, deadline: Instant) -> Result<(), PublishError> {
		let info = tokio::time::timeout_at(bound(deadline, self.config.upload_timeout), self.store.stat(key))
			.await
			.map_err(|_| StoreError::Timeout)??;

		match info {
			Some(info) if info.size == expected => Ok(()),
			info => Err(PublishError::Verification {
				expected,
				actual: info.map(|info| info.size),
			}),
		}
	}

	async fn mark(&self, id: i32, url: &str, deadline: Instant) -> Result<(), PublishError> {
		tokio::time::timeout_at(
			bound(deadline, self.config.catalog_timeout),
			self.catalog.mark_converted(id, url),
		)
		.await
		.map_err(|_| CatalogError::Timeout)
		.and_then(|result| result)
		.map_err(|source| PublishError::CatalogUpdate {
			url: url.to_owned(),
			source,
		})
	}
}
