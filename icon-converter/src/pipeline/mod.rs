use std::path::PathBuf;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

pub use self::fetch::{AssetFetcher, FetchError, Workspace};
pub use self::outcome::{ConversionResult, PipelineError, RecordError, SkipReason};
pub use self::plan::PlannedAction;
pub use self::publish::{AssetPublisher, PublishError, PNG_CONTENT_TYPE};
use crate::catalog::{Catalog, CatalogError, IconRecord};
use crate::config::ConverterConfig;
use crate::report::Summary;
use crate::store::ObjectStore;
use crate::transcode::{SourceFormat, TranscodeError, Transcoder};

pub mod fetch;
pub mod key;
pub mod outcome;
pub mod plan;
pub mod publish;

/// The earlier of the record deadline and `limit` from now.
pub(crate) fn bound(deadline: Instant, limit: Duration) -> Instant {
	deadline.min(Instant::now() + limit)
}

/// Converts pending catalog records one at a time.
pub struct Pipeline<C, S> {
	catalog: C,
	store: S,
	transcoder: Transcoder,
	work_dir: PathBuf,
	config: ConverterConfig,
}

impl<C: Catalog, S: ObjectStore> Pipeline<C, S> {
	pub fn new(catalog: C, store: S, config: ConverterConfig) -> Self {
		Self {
			transcoder: Transcoder::new(config.max_input_bytes, config.max_dimension),
			work_dir: config.work_dir(),
			catalog,
			store,
			config,
		}
	}

	pub fn catalog(&self) -> &C {
		&self.catalog
	}

	pub fn store(&self) -> &S {
		&self.store
	}

	pub fn config(&self) -> &ConverterConfig {
		&self.config
	}

	/// Records still waiting for conversion, in id order.
	#[tracing::instrument(skip(self), name = "Pipeline::pending", err)]
	pub async fn pending(&self, limit: Option<usize>) -> Result<Vec<IconRecord>, PipelineError> {
		let mut records = tokio::time::timeout(self.config.catalog_timeout, self.catalog.list_pending_icons(limit))
			.await
			.map_err(|_| CatalogError::Timeout)
			.and_then(|result| result)
			.map_err(PipelineError::CatalogUnavailable)?;

		records.retain(|record| record.converted_url.is_none());
		records.sort_by_key(|record| record.id);
		if let Some(limit) = limit {
			records.truncate(limit);
		}

		Ok(records)
	}

	/// What a run would do with each pending record. Nothing is fetched,
	/// stored or written.
	pub async fn plan(&self, limit: Option<usize>) -> Result<Vec<PlannedAction>, PipelineError> {
		Ok(self
			.pending(limit)
			.await?
			.iter()
			.map(|record| PlannedAction::for_record(record, &self.store))
			.collect())
	}

	/// Processes every pending record until done or `cancel` fires. Only a
	/// catalog that cannot be read fails the run.
	pub async fn run(&self, limit: Option<usize>, cancel: &CancellationToken) -> Result<Summary, PipelineError> {
		let records = self.pending(limit).await?;
		let total = records.len();

		tracing::info!(total, "found icons to convert");

		let mut summary = Summary::new(total);

		for (idx, record) in records.iter().enumerate() {
			if cancel.is_cancelled() {
				break;
			}

			tracing::info!("[{}/{}] processing {}", idx + 1, total, record.file_name);

			let result = tokio::select! {
				biased;
				_ = cancel.cancelled() => {
					tracing::warn!(id = record.id, "cancelled while processing {}", record.file_name);
					break;
				}
				result = self.process(record) => result,
			};

			log_result(record, &result);
			summary.record(&result);
		}

		let summary = summary.finish();

		if summary.unprocessed > 0 {
			tracing::warn!(unprocessed = summary.unprocessed, "run stopped before all records were processed");
		}

		Ok(summary)
	}

	/// Runs one record through fetch, transcode and publish. Never fails the
	/// run; every problem ends up in the returned result.
	#[tracing::instrument(skip_all, name = "Pipeline::process", fields(id = record.id, file_name = %record.file_name))]
	pub async fn process(&self, record: &IconRecord) -> ConversionResult {
		let deadline = Instant::now() + self.config.record_timeout;

		match SourceFormat::from_file_name(&record.file_name) {
			SourceFormat::Png => match self.publisher().link_existing(record, deadline).await {
				Ok(url) => ConversionResult::Skipped(SkipReason::AlreadyPng { url }),
				Err(err) => ConversionResult::Failed(err.into()),
			},
			SourceFormat::Unsupported(extension) => ConversionResult::Skipped(SkipReason::UnsupportedFormat { extension }),
			SourceFormat::Dds => {
				let Some(source_key) = key::source_key(&record.source_url, self.store.name()) else {
					return ConversionResult::Skipped(SkipReason::UnresolvableSource);
				};

				match self.convert(record, &source_key, deadline).await {
					Ok(url) => ConversionResult::Succeeded(url),
					Err(err) => ConversionResult::Failed(err),
				}
			}
		}
	}

	async fn convert(&self, record: &IconRecord, source_key: &str, deadline: Instant) -> Result<String, RecordError> {
		let target_key = key::target_key(source_key);

		let fetcher = AssetFetcher::new(
			&self.store,
			&self.work_dir,
			self.config.fetch_timeout,
			self.config.max_input_bytes,
		);
		let workspace = fetcher.fetch(record.id, source_key, deadline).await?;

		let transcoded = tokio::time::timeout_at(
			deadline,
			self.transcoder
				.transcode_file(workspace.source_path().to_owned(), workspace.output_path().to_owned()),
		)
		.await
		.map_err(|_| TranscodeError::Timeout)??;

		tracing::info!(
			width = transcoded.width,
			height = transcoded.height,
			alpha = transcoded.has_alpha,
			"converted {} bytes -> {} bytes",
			workspace.source_size(),
			transcoded.data.len(),
		);

		let url = self
			.publisher()
			.publish(record.id, &target_key, transcoded.data, deadline)
			.await?;

		Ok(url)
	}

	fn publisher(&self) -> AssetPublisher<'_, C, S> {
		AssetPublisher::new(&self.catalog, &self.store, &self.config)
	}
}

fn log_result(record: &IconRecord, result: &ConversionResult) {
	match result {
		ConversionResult::Succeeded(url) => tracing::info!(id = record.id, "converted {} -> {}", record.file_name, url),
		ConversionResult::Skipped(reason @ SkipReason::AlreadyPng { .. }) => {
			tracing::info!(id = record.id, "{}: {}", record.file_name, reason)
		}
		ConversionResult::Skipped(reason) => tracing::warn!(id = record.id, "skipped {}: {}", record.file_name, reason),
		ConversionResult::Failed(err) => tracing::error!(id = record.id, "failed {}: {}", record.file_name, err),
	}
}
