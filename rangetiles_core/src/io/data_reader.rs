use crate::{Blob, ByteRange, Result};
use async_trait::async_trait;
use std::fmt::Debug;

/// Type alias for a boxed dynamic implementation of the `DataReaderTrait`.
pub type DataReader = Box<dyn DataReaderTrait>;

/// A byte-addressable data source.
///
/// Backends and decorators both implement this trait, so arbitrary stacks
/// can be composed (e.g. a memory cache over a block-aligned disk cache
/// over a cloud object).
///
/// Reads are clamped to the source size: a request reaching past the end
/// returns a truncated buffer, a request starting at or after the end
/// returns an empty one. Running out of data is never an error here —
/// callers that need exact lengths check for themselves.
///
/// Implementations must be safe to share between threads; reads may be
/// issued concurrently. Resources are released on drop.
#[async_trait]
pub trait DataReaderTrait: Debug + Send + Sync {
	/// Total size of the source in bytes, known since open.
	fn get_size(&self) -> u64;

	/// Name of the source (path or URL), for diagnostics.
	fn get_name(&self) -> &str;

	/// Reads the given range, truncated at the end of the source.
	async fn read_range(&self, range: &ByteRange) -> Result<Blob>;

	/// Reads the given range into a caller-provided buffer, appending at its
	/// current end, and returns the number of bytes read. Backends override
	/// this where they can avoid the intermediate allocation.
	async fn read_range_into(&self, range: &ByteRange, buffer: &mut Vec<u8>) -> Result<usize> {
		let blob = self.read_range(range).await?;
		buffer.extend_from_slice(blob.as_slice());
		Ok(blob.as_slice().len())
	}
}

/// Clamps a requested range to the size of a source, implementing the
/// truncation semantics of `read_range`.
pub fn clamp_range(range: &ByteRange, size: u64) -> ByteRange {
	let offset = range.offset.min(size);
	ByteRange::new(offset, range.length.min(size - offset))
}
