use std::collections::BTreeMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;

use crate::catalog::{Catalog, CatalogError, IconRecord};
use crate::config::ConverterConfig;
use crate::store::memory::{MemoryStore, MemoryStoreError};
use crate::store::{ObjectInfo, ObjectStore, PutOptions, StoreError};
use crate::transcode::{encode_png, Frame};

pub const BUCKET: &str = "snowmuffin-game-assets";
pub const PUBLIC_URL: &str = "https://snowmuffin-game-assets.s3.ap-northeast-2.amazonaws.com";

pub fn public_url(key: &str) -> String {
	format!("{PUBLIC_URL}/{key}")
}

pub fn record(id: i32, file_name: &str, source_url: &str) -> IconRecord {
	IconRecord {
		id,
		file_name: file_name.to_owned(),
		source_url: source_url.to_owned(),
		converted_url: None,
	}
}

pub fn test_config(work_dir: &Path) -> ConverterConfig {
	ConverterConfig {
		catalog_timeout: Duration::from_millis(200),
		fetch_timeout: Duration::from_secs(5),
		upload_timeout: Duration::from_secs(5),
		record_timeout: Duration::from_secs(10),
		work_dir: Some(work_dir.to_owned()),
		..Default::default()
	}
}

pub fn memory_store() -> MemoryStore {
	MemoryStore::new(BUCKET, PUBLIC_URL, None)
}

pub fn dir_is_empty(path: &Path) -> bool {
	std::fs::read_dir(path).map(|mut entries| entries.next().is_none()).unwrap_or(true)
}

#[derive(Debug, Default)]
struct CatalogState {
	records: BTreeMap<i32, IconRecord>,
	writes: usize,
	fail_updates: bool,
	stall_updates: bool,
	unreachable: bool,
}

/// A catalog kept in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
	state: Arc<Mutex<CatalogState>>,
}

impl MemoryCatalog {
	pub fn new(records: impl IntoIterator<Item = IconRecord>) -> Self {
		let catalog = Self::default();
		catalog.state().records = records.into_iter().map(|record| (record.id, record)).collect();
		catalog
	}

	fn state(&self) -> std::sync::MutexGuard<'_, CatalogState> {
		self.state.lock().unwrap()
	}

	pub fn get(&self, id: i32) -> IconRecord {
		self.state().records.get(&id).cloned().expect("record exists")
	}

	pub fn records(&self) -> Vec<IconRecord> {
		self.state().records.values().cloned().collect()
	}

	pub fn writes(&self) -> usize {
		self.state().writes
	}

	pub fn fail_updates(&self, fail: bool) {
		self.state().fail_updates = fail;
	}

	pub fn stall_updates(&self, stall: bool) {
		self.state().stall_updates = stall;
	}

	pub fn set_unreachable(&self, unreachable: bool) {
		self.state().unreachable = unreachable;
	}
}

impl Catalog for MemoryCatalog {
	async fn list_pending_icons(&self, limit: Option<usize>) -> Result<Vec<IconRecord>, CatalogError> {
		let unreachable = self.state().unreachable;
		if unreachable {
			std::future::pending::<()>().await;
		}

		Ok(self
			.state()
			.records
			.values()
			.filter(|record| record.converted_url.is_none())
			.take(limit.unwrap_or(usize::MAX))
			.cloned()
			.collect())
	}

	async fn mark_converted(&self, id: i32, url: &str) -> Result<(), CatalogError> {
		let stalled = self.state().stall_updates;
		if stalled {
			std::future::pending::<()>().await;
		}

		let mut state = self.state();

		if state.fail_updates {
			return Err(CatalogError::Timeout);
		}

		match state.records.get_mut(&id) {
			Some(record) if record.converted_url.is_none() => {
				record.converted_url = Some(url.to_owned());
				state.writes += 1;
				Ok(())
			}
			_ => Err(CatalogError::NotUpdated(id)),
		}
	}
}

/// Wraps a [`MemoryStore`], counting reads and writes and optionally failing
/// writes.
#[derive(Debug, Clone)]
pub struct FlakyStore {
	pub inner: MemoryStore,
	fail_puts: Arc<AtomicBool>,
	puts: Arc<AtomicUsize>,
	gets: Arc<AtomicUsize>,
}

impl FlakyStore {
	pub fn new(inner: MemoryStore) -> Self {
		Self {
			inner,
			fail_puts: Arc::default(),
			puts: Arc::default(),
			gets: Arc::default(),
		}
	}

	pub fn fail_puts(&self, fail: bool) {
		self.fail_puts.store(fail, Ordering::SeqCst);
	}

	pub fn puts(&self) -> usize {
		self.puts.load(Ordering::SeqCst)
	}

	pub fn gets(&self) -> usize {
		self.gets.load(Ordering::SeqCst)
	}
}

impl ObjectStore for FlakyStore {
	fn name(&self) -> &str {
		self.inner.name()
	}

	async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
		self.gets.fetch_add(1, Ordering::SeqCst);
		self.inner.get(key).await
	}

	async fn put(&self, key: &str, data: Bytes, options: PutOptions) -> Result<String, StoreError> {
		self.puts.fetch_add(1, Ordering::SeqCst);

		if self.fail_puts.load(Ordering::SeqCst) {
			return Err(MemoryStoreError::NoSpaceLeft.into());
		}

		self.inner.put(key, data, options).await
	}

	async fn stat(&self, key: &str) -> Result<Option<ObjectInfo>, StoreError> {
		self.inner.stat(key).await
	}

	fn public_url(&self, key: &str) -> String {
		self.inner.public_url(key)
	}
}

fn push_u32(out: &mut Vec<u8>, value: u32) {
	out.extend_from_slice(&value.to_le_bytes());
}

/// The pixel format block of a DDS header.
#[derive(Debug, Clone, Copy)]
pub enum PixelFormat {
	FourCc([u8; 4]),
	/// Uncompressed pixels: bit count and the r, g, b, a masks.
	Masked { bits: u32, masks: [u32; 4] },
}

/// A single mip level DDS file with the given fourcc and block data.
pub fn dds(width: u32, height: u32, fourcc: &[u8; 4], blocks: &[u8]) -> Vec<u8> {
	dds_with(width, height, PixelFormat::FourCc(*fourcc), None, blocks)
}

/// A single mip level DDS file. `dx10` is the extended header that follows
/// when the fourcc is `DX10`.
pub fn dds_with(width: u32, height: u32, format: PixelFormat, dx10: Option<[u32; 5]>, data: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(148 + data.len());

	out.extend_from_slice(b"DDS ");
	push_u32(&mut out, 124);
	// caps | height | width | pixel format | pitch or linear size
	let size_flag = match format {
		PixelFormat::FourCc(_) => 0x80000,
		PixelFormat::Masked { .. } => 0x8,
	};
	push_u32(&mut out, 0x1 | 0x2 | 0x4 | 0x1000 | size_flag);
	push_u32(&mut out, height);
	push_u32(&mut out, width);
	match format {
		PixelFormat::FourCc(_) => push_u32(&mut out, data.len() as u32),
		PixelFormat::Masked { bits, .. } => push_u32(&mut out, width * bits / 8),
	}
	push_u32(&mut out, 0);
	push_u32(&mut out, 0);
	for _ in 0..11 {
		push_u32(&mut out, 0);
	}

	// pixel format
	push_u32(&mut out, 32);
	match format {
		PixelFormat::FourCc(fourcc) => {
			push_u32(&mut out, 0x4);
			out.extend_from_slice(&fourcc);
			for _ in 0..5 {
				push_u32(&mut out, 0);
			}
		}
		PixelFormat::Masked { bits, masks } => {
			// rgb | alpha pixels
			let alpha = if masks[3] != 0 { 0x1 } else { 0 };
			push_u32(&mut out, 0x40 | alpha);
			push_u32(&mut out, 0);
			push_u32(&mut out, bits);
			for mask in masks {
				push_u32(&mut out, mask);
			}
		}
	}

	// texture caps, caps2-4, reserved
	push_u32(&mut out, 0x1000);
	for _ in 0..4 {
		push_u32(&mut out, 0);
	}

	assert_eq!(out.len(), 128);

	for value in dx10.into_iter().flatten() {
		push_u32(&mut out, value);
	}

	out.extend_from_slice(data);
	out
}

fn block_count(width: u32, height: u32) -> usize {
	(width.div_ceil(4) * height.div_ceil(4)) as usize
}

/// Opaque red DXT1 texture.
pub fn dxt1(width: u32, height: u32) -> Vec<u8> {
	// color0 = red, color1 = blue, every texel uses color0
	let block = [0x00, 0xF8, 0x1F, 0x00, 0, 0, 0, 0];
	dds(width, height, b"DXT1", &block.repeat(block_count(width, height)))
}

/// DXT1 texture in punch-through mode where every texel is transparent black.
pub fn dxt1_transparent(width: u32, height: u32) -> Vec<u8> {
	// color0 <= color1 selects the 3 color mode, index 3 is transparent
	let block = [0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF];
	dds(width, height, b"DXT1", &block.repeat(block_count(width, height)))
}

/// DXT5 texture. With `transparent` the first texel of every block is fully
/// transparent, otherwise every texel is opaque.
pub fn dxt5(width: u32, height: u32, transparent: bool) -> Vec<u8> {
	// alpha0 = 255, alpha1 = 0, texel 0 uses index 1 when transparent
	let first = if transparent { 0x01 } else { 0x00 };
	let block = [0xFF, 0x00, first, 0, 0, 0, 0, 0, 0x00, 0xF8, 0x1F, 0x00, 0, 0, 0, 0];
	dds(width, height, b"DXT5", &block.repeat(block_count(width, height)))
}

/// Uncompressed A8R8G8B8 texture filled with `pixel` (r, g, b, a).
pub fn a8r8g8b8(width: u32, height: u32, pixel: [u8; 4]) -> Vec<u8> {
	let [r, g, b, a] = pixel;
	let format = PixelFormat::Masked {
		bits: 32,
		masks: [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
	};

	dds_with(width, height, format, None, &[b, g, r, a].repeat((width * height) as usize))
}

/// BC7 texture behind a DX10 header. Every texel is white with the given
/// alpha, which is a 7 bit value expanded as `alpha << 1 | 1`.
pub fn bc7(width: u32, height: u32, alpha: u8) -> Vec<u8> {
	// mode 6: one subset, 7 bit rgba endpoints plus a p-bit each
	let mut bits: u128 = 1 << 6;
	let mut offset = 7;
	for value in [0x7F, 0x7F, 0x7F, 0x7F, 0x7F, 0x7F, alpha, alpha] {
		bits |= u128::from(value & 0x7F) << offset;
		offset += 7;
	}
	bits |= 1 << 63 | 1 << 64;

	// BC7_UNORM, TEXTURE2D, no misc flags, array size 1
	let dx10 = [98, 3, 0, 1, 0];
	let block = bits.to_le_bytes();

	dds_with(
		width,
		height,
		PixelFormat::FourCc(*b"DX10"),
		Some(dx10),
		&block.repeat(block_count(width, height)),
	)
}

/// A small valid RGBA png.
pub fn png(width: usize, height: usize) -> Vec<u8> {
	let frame = Frame::Rgba(imgref::ImgVec::new(
		vec![rgb::RGBA8::new(10, 20, 30, 255); width * height],
		width,
		height,
	));

	encode_png(&frame).expect("encode png")
}

pub struct DecodedPng {
	pub color_type: png::ColorType,
	pub width: u32,
	pub height: u32,
	pub pixels: Vec<u8>,
}

impl DecodedPng {
	pub fn has_translucent_pixel(&self) -> bool {
		match self.color_type {
			png::ColorType::Rgba => self.pixels.chunks_exact(4).any(|pixel| pixel[3] < u8::MAX),
			png::ColorType::GrayscaleAlpha => self.pixels.chunks_exact(2).any(|pixel| pixel[1] < u8::MAX),
			_ => false,
		}
	}
}

pub fn decode_png(data: &[u8]) -> DecodedPng {
	let decoder = png::Decoder::new(std::io::Cursor::new(data));
	let mut reader = decoder.read_info().expect("valid png header");
	let mut pixels = vec![0; reader.output_buffer_size()];
	let info = reader.next_frame(&mut pixels).expect("valid png data");
	pixels.truncate(info.buffer_size());

	DecodedPng {
		color_type: info.color_type,
		width: info.width,
		height: info.height,
		pixels,
	}
}
