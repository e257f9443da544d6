use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use bytes::Bytes;

use super::{join_url, ObjectInfo, ObjectStore, PutOptions, StoreError};

#[derive(Debug)]
pub struct S3Store {
	client: aws_sdk_s3::Client,
	bucket: String,
	public_url: String,
}

#[derive(Debug, thiserror::Error)]
pub enum S3StoreError {
	#[error("byte stream: {0}")]
	ByteStream(#[from] aws_smithy_types::byte_stream::error::Error),
	#[error("read: {0}")]
	Read(#[from] SdkError<GetObjectError, HttpResponse>),
	#[error("write: {0}")]
	Write(#[from] SdkError<PutObjectError, HttpResponse>),
	#[error("stat: {0}")]
	Stat(#[from] SdkError<HeadObjectError, HttpResponse>),
}

impl S3Store {
	pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>, public_url: impl Into<String>) -> Self {
		Self {
			client,
			bucket: bucket.into(),
			public_url: public_url.into(),
		}
	}
}

impl ObjectStore for S3Store {
	fn name(&self) -> &str {
		&self.bucket
	}

	#[tracing::instrument(skip(self), name = "S3Store::get", err)]
	async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
		let result = self
			.client
			.get_object()
			.bucket(&self.bucket)
			.key(key)
			.send()
			.await
			.map_err(|err| match err.as_service_error() {
				Some(service) if service.is_no_such_key() => StoreError::NotFound,
				_ => S3StoreError::from(err).into(),
			})?;

		let bytes = result.body.collect().await.map_err(S3StoreError::from)?;

		Ok(bytes.into_bytes())
	}

	#[tracing::instrument(skip(self, data, options), name = "S3Store::put", err, fields(size = data.len()))]
	async fn put(&self, key: &str, data: Bytes, options: PutOptions) -> Result<String, StoreError> {
		let mut req = self
			.client
			.put_object()
			.bucket(&self.bucket)
			.key(key)
			.content_length(data.len() as i64)
			.body(data.into());

		if let Some(cache_control) = &options.cache_control {
			req = req.cache_control(cache_control);
		}
		if let Some(content_type) = &options.content_type {
			req = req.content_type(content_type);
		}
		if let Some(acl) = &options.acl {
			req = req.acl(ObjectCannedAcl::from(acl.as_str()));
		}

		req.send().await.map_err(S3StoreError::from).inspect_err(|err| {
			tracing::error!("failed to write to s3: {:?}", err);
		})?;

		Ok(self.public_url(key))
	}

	#[tracing::instrument(skip(self), name = "S3Store::stat", err)]
	async fn stat(&self, key: &str) -> Result<Option<ObjectInfo>, StoreError> {
		match self.client.head_object().bucket(&self.bucket).key(key).send().await {
			Ok(output) => Ok(Some(ObjectInfo {
				size: output.content_length().unwrap_or_default().max(0) as u64,
				content_type: output.content_type().map(ToOwned::to_owned),
			})),
			Err(err) if err.as_service_error().is_some_and(HeadObjectError::is_not_found) => Ok(None),
			Err(err) => Err(S3StoreError::from(err).into()),
		}
	}

	fn public_url(&self, key: &str) -> String {
		join_url(&self.public_url, key)
	}
}
