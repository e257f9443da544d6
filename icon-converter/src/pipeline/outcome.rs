use std::fmt;

use super::fetch::FetchError;
use super::publish::PublishError;
use crate::catalog::CatalogError;
use crate::transcode::TranscodeError;

/// What happened to one record.
#[derive(Debug)]
pub enum ConversionResult {
	/// Converted, stored and recorded at this URL.
	Succeeded(String),
	Skipped(SkipReason),
	Failed(RecordError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
	/// Already a PNG; the source URL was recorded as the converted one.
	AlreadyPng { url: String },
	/// Neither DDS nor PNG. Retrying cannot help.
	UnsupportedFormat { extension: Option<String> },
	/// The source URL does not name an object in the store.
	UnresolvableSource,
}

impl fmt::Display for SkipReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SkipReason::AlreadyPng { url } => write!(f, "already png ({url})"),
			SkipReason::UnsupportedFormat { extension: Some(extension) } => write!(f, "unsupported format .{extension}"),
			SkipReason::UnsupportedFormat { extension: None } => write!(f, "unsupported format (no extension)"),
			SkipReason::UnresolvableSource => write!(f, "source url does not resolve to a key"),
		}
	}
}

/// Per-record failures. None of these stop the run, and the record stays
/// pending so a later run retries it.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
	#[error("fetch failed: {0}")]
	FetchFailed(#[from] FetchError),
	#[error("transcode failed: {0}")]
	TranscodeFailed(#[from] TranscodeError),
	#[error("upload failed: {0}")]
	UploadFailed(PublishError),
	#[error("catalog update failed, object is stored at {url}: {source}")]
	CatalogUpdateFailed { url: String, source: CatalogError },
}

impl From<PublishError> for RecordError {
	fn from(err: PublishError) -> Self {
		match err {
			PublishError::CatalogUpdate { url, source } => Self::CatalogUpdateFailed { url, source },
			err => Self::UploadFailed(err),
		}
	}
}

/// Failures that end the whole run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
	#[error("catalog unavailable: {0}")]
	CatalogUnavailable(CatalogError),
}
