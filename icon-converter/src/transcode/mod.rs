use std::path::PathBuf;

use bytes::Bytes;

pub use self::decoder::{decode_dds, DecoderError, DDS_MAGIC};
pub use self::encoder::{encode_png, EncoderError};
pub use self::frame::Frame;

mod decoder;
mod encoder;
mod frame;

/// How a record's asset is handled, decided by its file extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFormat {
	Dds,
	Png,
	Unsupported(Option<String>),
}

impl SourceFormat {
	pub fn from_file_name(file_name: &str) -> Self {
		let extension = std::path::Path::new(file_name.trim())
			.extension()
			.and_then(|ext| ext.to_str())
			.map(|ext| ext.to_ascii_lowercase());

		match extension.as_deref() {
			Some("dds") => Self::Dds,
			Some("png") => Self::Png,
			_ => Self::Unsupported(extension),
		}
	}
}

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
	#[error("source is {size} bytes, limit is {limit}")]
	TooLarge { size: u64, limit: u64 },
	#[error("decode: {0}")]
	Decode(#[from] DecoderError),
	#[error("encode: {0}")]
	Encode(#[from] EncoderError),
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("blocking task: {0}")]
	Join(#[from] tokio::task::JoinError),
	#[error("timed out")]
	Timeout,
}

#[derive(Debug, Clone)]
pub struct Transcoded {
	pub data: Bytes,
	pub width: usize,
	pub height: usize,
	pub has_alpha: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct Transcoder {
	max_input_bytes: u64,
	max_dimension: u32,
}

impl Transcoder {
	pub fn new(max_input_bytes: u64, max_dimension: u32) -> Self {
		Self {
			max_input_bytes,
			max_dimension,
		}
	}

	pub fn transcode(&self, input: &[u8]) -> Result<Transcoded, TranscodeError> {
		if input.len() as u64 > self.max_input_bytes {
			return Err(TranscodeError::TooLarge {
				size: input.len() as u64,
				limit: self.max_input_bytes,
			});
		}

		let frame = decode_dds(input, self.max_dimension)?;
		let data = encode_png(&frame)?;

		Ok(Transcoded {
			data: data.into(),
			width: frame.width(),
			height: frame.height(),
			has_alpha: frame.has_alpha(),
		})
	}

	/// Converts the file at `input` into a PNG written to `output`. Decoding
	/// and encoding run on the blocking pool, the output is written by the
	/// caller's task so dropping the future never leaves a file behind.
	#[tracing::instrument(skip(self), name = "Transcoder::transcode_file", err)]
	pub async fn transcode_file(&self, input: PathBuf, output: PathBuf) -> Result<Transcoded, TranscodeError> {
		let span = tracing::Span::current();
		let transcoder = *self;

		let transcoded = tokio::task::spawn_blocking(move || {
			let _span = span.enter();

			let size = std::fs::metadata(&input)?.len();
			if size > transcoder.max_input_bytes {
				return Err(TranscodeError::TooLarge {
					size,
					limit: transcoder.max_input_bytes,
				});
			}

			transcoder.transcode(&std::fs::read(&input)?)
		})
		.await??;

		tokio::fs::write(&output, &transcoded.data).await?;

		Ok(transcoded)
	}
}
