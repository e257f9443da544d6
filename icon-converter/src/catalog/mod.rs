use std::future::Future;

pub use self::postgres::PgCatalog;

pub mod postgres;

/// One row of the icon catalog. `converted_url` is `None` until a converted
/// asset has been stored and recorded.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, postgres_from_row::FromRow)]
pub struct IconRecord {
	pub id: i32,
	pub file_name: String,
	pub source_url: String,
	pub converted_url: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("pool: {0}")]
	Pool(#[from] deadpool_postgres::PoolError),
	#[error("postgres: {0}")]
	Postgres(#[from] tokio_postgres::Error),
	#[error("record {0} is missing or already converted")]
	NotUpdated(i32),
	#[error("timed out")]
	Timeout,
}

pub trait Catalog {
	/// Records with no converted asset yet, at most `limit` of them.
	fn list_pending_icons(
		&self,
		limit: Option<usize>,
	) -> impl Future<Output = Result<Vec<IconRecord>, CatalogError>> + Send;

	/// Records `url` as the converted location of `id`. Must not overwrite a
	/// location that is already set.
	fn mark_converted(&self, id: i32, url: &str) -> impl Future<Output = Result<(), CatalogError>> + Send;
}
