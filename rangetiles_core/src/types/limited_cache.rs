use crate::Result;
use lru::LruCache;
use std::fmt::{self, Debug};
use std::hash::Hash;
use std::mem::size_of;
use std::num::NonZeroUsize;

/// A key-value cache bounded by an approximate byte size.
///
/// The element count is derived from the byte limit and `size_of::<(K, V)>()`;
/// once full, the least recently used entry is evicted. Used for leaf
/// directories in the archive reader and for the memory-cache read decorator.
pub struct LimitedCache<K, V> {
	cache: LruCache<K, V>,
}

impl<K, V> LimitedCache<K, V>
where
	K: Clone + Debug + Eq + Hash,
	V: Clone,
{
	/// Creates a cache allowed to occupy roughly `maximum_size` bytes.
	///
	/// # Panics
	/// Panics if `maximum_size` cannot hold a single `(K, V)` pair.
	pub fn with_maximum_size(maximum_size: usize) -> Self {
		let per_element_size = size_of::<K>() + size_of::<V>();
		let max_length = maximum_size / per_element_size;
		assert!(
			max_length > 0,
			"size ({maximum_size} bytes) is too small to store a single element of size {per_element_size} bytes"
		);
		Self {
			cache: LruCache::new(NonZeroUsize::new(max_length).unwrap()),
		}
	}

	/// Returns a clone of the cached value and marks it as recently used.
	pub fn get(&mut self, key: &K) -> Option<V> {
		self.cache.get(key).cloned()
	}

	/// Returns the cached value, or computes, stores and returns it.
	pub fn get_or_set<F>(&mut self, key: &K, callback: F) -> Result<V>
	where
		F: FnOnce() -> Result<V>,
	{
		if let Some(cached) = self.get(key) {
			return Ok(cached);
		}
		let value = callback()?;
		Ok(self.add(key.clone(), value))
	}

	/// Inserts `key -> value`, evicting the least recently used entry when
	/// full, and returns the inserted value.
	pub fn add(&mut self, key: K, value: V) -> V {
		let cloned = value.clone();
		self.cache.put(key, value);
		cloned
	}

	pub fn len(&self) -> usize {
		self.cache.len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.is_empty()
	}

	pub fn capacity(&self) -> usize {
		self.cache.cap().get()
	}
}

impl<K, V> Debug for LimitedCache<K, V>
where
	K: Clone + Debug + Eq + Hash,
	V: Clone,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LimitedCache")
			.field("length", &self.len())
			.field("max_length", &self.capacity())
			.finish()
	}
}
