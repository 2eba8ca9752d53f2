use super::{DataReader, DataReaderTrait, clamp_range};
use crate::{Blob, ByteRange, Result, TilesError};
use async_trait::async_trait;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// A decorator that persists fetched blocks as chunk files on disk.
///
/// Chunks are keyed by `(source_id, block_id)` and named
/// `<source_id>-<block_id>.chunk` inside the cache directory. A read is
/// composed from on-disk chunks; gaps are fetched block-aligned from the
/// inner reader and published atomically (temp file + rename), so
/// concurrent readers may share chunks while another thread fills a
/// different one.
#[derive(Debug)]
pub struct DataReaderDiskCache {
	inner: DataReader,
	directory: PathBuf,
	source_id: String,
	block_size: u64,
	name: String,
}

impl DataReaderDiskCache {
	/// Wraps `inner`; `block_size` must be a power of two.
	pub fn new(
		inner: DataReader,
		directory: &Path,
		source_id: &str,
		block_size: u64,
	) -> Result<Box<DataReaderDiskCache>> {
		if block_size == 0 || !block_size.is_power_of_two() {
			return Err(TilesError::InvalidHeader(format!(
				"block size {block_size} must be a power of two"
			)));
		}
		fs::create_dir_all(directory)?;
		let name = format!("disk-cache({})", inner.get_name());
		Ok(Box::new(DataReaderDiskCache {
			inner,
			directory: directory.to_path_buf(),
			source_id: sanitize_file_name(source_id),
			block_size,
			name,
		}))
	}

	fn chunk_path(&self, block_id: u64) -> PathBuf {
		self.directory.join(format!("{}-{block_id:08x}.chunk", self.source_id))
	}

	async fn read_chunk(&self, block_id: u64) -> Result<Vec<u8>> {
		let path = self.chunk_path(block_id);
		if let Ok(data) = fs::read(&path) {
			return Ok(data);
		}

		let range = ByteRange::new(block_id * self.block_size, self.block_size);
		let blob = self.inner.read_range(&range).await?;

		let mut temp = tempfile::NamedTempFile::new_in(&self.directory)?;
		temp.write_all(blob.as_slice())?;
		// a concurrent filler may have published the same chunk already
		let _ = temp.persist(&path);

		Ok(blob.into_vec())
	}
}

/// Replaces every byte that is not safe in a file name by `%xx`.
fn sanitize_file_name(name: &str) -> String {
	name
		.bytes()
		.map(|b| {
			if b.is_ascii_alphanumeric() || b == b'.' || b == b'_' || b == b'-' {
				(b as char).to_string()
			} else {
				format!("%{b:02x}")
			}
		})
		.collect()
}

#[async_trait]
impl DataReaderTrait for DataReaderDiskCache {
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

		let first_block = clamped.offset / self.block_size;
		let last_block = (clamped.end() - 1) / self.block_size;

		let mut result = Vec::with_capacity(clamped.length as usize);
		for block_id in first_block..=last_block {
			let chunk = self.read_chunk(block_id).await?;
			let block_start = block_id * self.block_size;
			let lo = clamped.offset.saturating_sub(block_start) as usize;
			let hi = ((clamped.end() - block_start).min(chunk.len() as u64)) as usize;
			if lo < hi {
				result.extend_from_slice(&chunk[lo..hi]);
			}
		}
		Ok(Blob::from(result))
	}
}
