use super::{DataReader, DataReaderTrait, clamp_range};
use crate::{Blob, ByteRange, Result, TilesError};
use async_trait::async_trait;

/// A decorator that widens every read to block boundaries.
///
/// For a request `[o, o+n)` the covering block-aligned range is fetched
/// from the inner reader and the requested slice returned. Aligned inner
/// reads make neighbouring requests coincide, which is what the caching
/// decorators key on, and they match object-storage and disk-cache chunk
/// boundaries.
#[derive(Debug)]
pub struct DataReaderBlockAligned {
	inner: DataReader,
	block_size: u64,
	name: String,
}

impl DataReaderBlockAligned {
	/// Wraps `inner`; `block_size` must be a power of two.
	pub fn new(inner: DataReader, block_size: u64) -> Result<Box<DataReaderBlockAligned>> {
		if block_size == 0 || !block_size.is_power_of_two() {
			return Err(TilesError::InvalidHeader(format!(
				"block size {block_size} must be a power of two"
			)));
		}
		let name = format!("block-aligned({}, {block_size})", inner.get_name());
		Ok(Box::new(DataReaderBlockAligned {
			inner,
			block_size,
			name,
		}))
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderBlockAligned {
	fn get_size(&self) -> u64 {
		self.inner.get_size()
	}

	fn get_name(&self) -> &str {
		&self.name
	}

	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let clamped = clamp_range(range, self.get_size());
		if clamped.length == 0 {
			return Ok(Blob::new_empty());
		}

		let mask = self.block_size - 1;
		let aligned_start = clamped.offset & !mask;
		let aligned_end = (clamped.end() + mask) & !mask;
		let aligned = ByteRange::new(aligned_start, aligned_end - aligned_start);

		let blob = self.inner.read_range(&aligned).await?;
		let lo = (clamped.offset - aligned_start) as usize;
		let hi = (lo + clamped.length as usize).min(blob.as_slice().len());
		if lo >= hi {
			return Ok(Blob::new_empty());
		}
		Ok(Blob::from(blob.range(lo..hi)))
	}
}
