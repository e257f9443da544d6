use deadpool_postgres::Pool;
use postgres_from_row::FromRow;

use super::{Catalog, CatalogError, IconRecord};

/// The icon catalog stored in `space_engineers.icon_files`. `cdn_url` holds
/// the source location and `png_cdn_url` the converted one.
#[derive(Clone)]
pub struct PgCatalog {
	pool: Pool,
}

impl std::fmt::Debug for PgCatalog {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PgCatalog").field("status", &self.pool.status()).finish()
	}
}

impl PgCatalog {
	pub fn new(pool: Pool) -> Self {
		Self { pool }
	}

	/// Adds the converted location column when the catalog predates it.
	#[tracing::instrument(skip(self), name = "PgCatalog::ensure_schema", err)]
	pub async fn ensure_schema(&self) -> Result<(), CatalogError> {
		let client = self.pool.get().await?;

		client
			.batch_execute("ALTER TABLE space_engineers.icon_files ADD COLUMN IF NOT EXISTS png_cdn_url TEXT")
			.await?;

		tracing::info!("catalog schema is up to date");

		Ok(())
	}
}

impl Catalog for PgCatalog {
	#[tracing::instrument(skip(self), name = "PgCatalog::list_pending_icons", err)]
	async fn list_pending_icons(&self, limit: Option<usize>) -> Result<Vec<IconRecord>, CatalogError> {
		let client = self.pool.get().await?;

		// LIMIT NULL is no limit
		let limit = limit.map(|limit| limit as i64);

		let rows = client
			.query(
				"SELECT id, file_name, cdn_url AS source_url, png_cdn_url AS converted_url
				FROM space_engineers.icon_files
				WHERE png_cdn_url IS NULL
				ORDER BY id ASC
				LIMIT $1",
				&[&limit],
			)
			.await?;

		Ok(rows.iter().map(IconRecord::try_from_row).collect::<Result<Vec<_>, _>>()?)
	}

	#[tracing::instrument(skip(self), name = "PgCatalog::mark_converted", err)]
	async fn mark_converted(&self, id: i32, url: &str) -> Result<(), CatalogError> {
		let client = self.pool.get().await?;

		let updated = client
			.execute(
				"UPDATE space_engineers.icon_files
				SET png_cdn_url = $2, updated_at = NOW()
				WHERE id = $1 AND png_cdn_url IS NULL",
				&[&id, &url],
			)
			.await?;

		if updated == 0 {
			return Err(CatalogError::NotUpdated(id));
		}

		Ok(())
	}
}
