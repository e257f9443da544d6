use ddsfile::Dds;

use super::frame::Frame;

pub const DDS_MAGIC: &[u8; 4] = b"DDS ";

#[derive(Debug, thiserror::Error)]
pub enum DecoderError {
	#[error("missing dds signature")]
	InvalidSignature,
	#[error("dds header: {0}")]
	Header(#[from] ddsfile::Error),
	#[error("dds surface: {0}")]
	Surface(String),
	#[error("exceeded maximum input width: {0}")]
	TooWide(u32),
	#[error("exceeded maximum input height: {0}")]
	TooHigh(u32),
}

/// Decodes the first surface of a DDS texture: legacy FourCC (DXT1-5,
/// ATI1/ATI2), DX10 (BC1-BC7) and uncompressed RGB(A) layouts. Only the
/// header is read before the dimensions are checked against `max_dimension`.
pub fn decode_dds(data: &[u8], max_dimension: u32) -> Result<Frame, DecoderError> {
	if !data.starts_with(DDS_MAGIC) {
		return Err(DecoderError::InvalidSignature);
	}

	let dds = Dds::read(data)?;
	let (width, height) = (dds.get_width(), dds.get_height());

	if width > max_dimension {
		return Err(DecoderError::TooWide(width));
	}

	if height > max_dimension {
		return Err(DecoderError::TooHigh(height));
	}

	tracing::debug!(
		width,
		height,
		dxgi = ?dds.get_dxgi_format(),
		d3d = ?dds.get_d3d_format(),
		"decoding dds"
	);

	let image = image_dds::image_from_dds(&dds, 0).map_err(|err| DecoderError::Surface(err.to_string()))?;

	Ok(Frame::from_rgba8(image.width() as usize, image.height() as usize, image.as_raw()))
}
