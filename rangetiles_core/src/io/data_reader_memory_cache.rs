use super::{DataReader, DataReaderTrait, clamp_range};
use crate::{Blob, ByteRange, LimitedCache, Result};
use async_trait::async_trait;
use std::fmt::{self, Debug};
use std::sync::{Mutex, PoisonError};

/// A decorator that caches reads in an in-memory LRU, keyed by the exact
/// `(offset, length)` of the inner request. Combine with a block-aligned
/// reader below so that unaligned requests become cache-friendly.
pub struct DataReaderMemoryCache {
	inner: DataReader,
	cache: Mutex<LimitedCache<ByteRange, Blob>>,
	name: String,
}

impl DataReaderMemoryCache {
	/// Wraps `inner` with a cache of roughly `maximum_size` bytes of entries.
	pub fn new(inner: DataReader, maximum_size: usize) -> Box<DataReaderMemoryCache> {
		let name = format!("memory-cache({})", inner.get_name());
		Box::new(DataReaderMemoryCache {
			inner,
			cache: Mutex::new(LimitedCache::with_maximum_size(maximum_size)),
			name,
		})
	}
}

impl Debug for DataReaderMemoryCache {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DataReaderMemoryCache").field("name", &self.name).finish()
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderMemoryCache {
	fn get_size(&self) -> u64 {
		self.inner.get_size()
	}

	fn get_name(&self) -> &str {
		&self.name
	}

	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let clamped = clamp_range(range, self.get_size());

		// the lock must not be held across the await below
		if let Some(hit) = self
			.cache
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.get(&clamped)
		{
			return Ok(hit);
		}

		let blob = self.inner.read_range(&clamped).await?;
		Ok(self
			.cache
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.add(clamped, blob))
	}
}
