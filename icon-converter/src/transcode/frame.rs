use imgref::ImgVec;
use rgb::FromSlice;

/// A decoded image. Images without a translucent pixel are kept as RGB.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
	Rgb(ImgVec<rgb::RGB8>),
	Rgba(ImgVec<rgb::RGBA8>),
}

impl Frame {
	/// Builds a frame from tightly packed RGBA8 pixels. The alpha channel is
	/// kept only when some pixel is not fully opaque.
	pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> Self {
		let pixels = data.as_rgba();

		if pixels.iter().any(|pixel| pixel.a < u8::MAX) {
			Self::Rgba(ImgVec::new(pixels.to_vec(), width, height))
		} else {
			Self::Rgb(ImgVec::new(pixels.iter().map(|pixel| pixel.rgb()).collect(), width, height))
		}
	}

	pub fn width(&self) -> usize {
		match self {
			Self::Rgb(image) => image.width(),
			Self::Rgba(image) => image.width(),
		}
	}

	pub fn height(&self) -> usize {
		match self {
			Self::Rgb(image) => image.height(),
			Self::Rgba(image) => image.height(),
		}
	}

	pub fn has_alpha(&self) -> bool {
		matches!(self, Self::Rgba(_))
	}
}
