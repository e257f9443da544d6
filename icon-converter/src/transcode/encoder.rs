use rgb::ComponentBytes;

use super::frame::Frame;

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
	#[error("png: {0}")]
	Png(#[from] png::EncodingError),
	#[error("empty image")]
	Empty,
}

/// Encodes a frame as an 8 bit PNG with the smallest settings the encoder
/// offers. RGBA frames keep their alpha channel.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, EncoderError> {
	if frame.width() == 0 || frame.height() == 0 {
		return Err(EncoderError::Empty);
	}

	let mut result = Vec::new();

	let mut encoder = png::Encoder::new(&mut result, frame.width() as u32, frame.height() as u32);

	encoder.set_depth(png::BitDepth::Eight);
	encoder.set_compression(png::Compression::Best);
	encoder.set_adaptive_filter(png::AdaptiveFilterType::Adaptive);

	let data = match frame {
		Frame::Rgb(image) => {
			encoder.set_color(png::ColorType::Rgb);
			image.buf().as_bytes()
		}
		Frame::Rgba(image) => {
			encoder.set_color(png::ColorType::Rgba);
			image.buf().as_bytes()
		}
	};

	let mut writer = encoder.write_header()?;
	writer.write_image_data(data)?;
	writer.finish()?;

	Ok(result)
}
