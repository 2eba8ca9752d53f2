use super::EntryV3;
use rangetiles_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
use rangetiles_core::{Blob, ByteRange, Result, TileCompression, TilesError, compress};
use std::cmp::Ordering;
use std::io::Write;
use std::slice::Iter;

/// Sanity bound while deserializing: more entries than this means the
/// count varint is garbage.
const MAX_ENTRY_COUNT: u64 = 10_000_000_000;

/// A directory: entries sorted strictly ascending by tile id.
///
/// Serialization is column-oriented varints: entry count, tile-id deltas,
/// run lengths, lengths, then offsets, where an offset of `0` encodes
/// "directly behind the previous entry" and anything else is the real
/// offset plus one. Contiguous leaf clusters and RLE runs thus collapse to
/// single-byte zeros.
#[derive(Debug, Default, PartialEq)]
pub struct Directory {
	entries: Vec<EntryV3>,
}

impl Directory {
	pub fn new() -> Self {
		Self { entries: Vec::new() }
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn push(&mut self, entry: EntryV3) {
		self.entries.push(entry);
	}

	pub fn iter(&self) -> Iter<'_, EntryV3> {
		self.entries.iter()
	}

	pub fn as_slice(&self) -> &[EntryV3] {
		&self.entries
	}

	/// Strict inverse of [`serialize_entries`]: any truncation, trailing
	/// garbage or ordering violation is a `DirectoryCorrupt` error.
	pub fn from_blob(blob: &Blob) -> Result<Directory> {
		Self::from_slice(blob.as_slice()).map_err(|error| match error {
			already @ TilesError::DirectoryCorrupt(_) => already,
			other => TilesError::DirectoryCorrupt(other.to_string()),
		})
	}

	fn from_slice(data: &[u8]) -> Result<Directory> {
		let mut reader = ValueReaderSlice::new_le(data);

		let num_entries = reader.read_varint()?;
		if num_entries > MAX_ENTRY_COUNT {
			return Err(TilesError::DirectoryCorrupt(format!(
				"entry count {num_entries} is beyond any sane archive"
			)));
		}
		let num_entries = num_entries as usize;

		let mut entries: Vec<EntryV3> = Vec::with_capacity(num_entries);
		let mut last_id: u64 = 0;
		for i in 0..num_entries {
			let delta = reader.read_varint()?;
			if i > 0 && delta == 0 {
				return Err(TilesError::DirectoryCorrupt(format!(
					"duplicate tile id {last_id} at entry {i}"
				)));
			}
			last_id += delta;
			entries.push(EntryV3::new(last_id, ByteRange::empty(), 0));
		}

		for entry in entries.iter_mut() {
			entry.run_length = reader.read_varint()? as u32;
		}

		for entry in entries.iter_mut() {
			entry.range.length = reader.read_varint()?;
		}

		for i in 0..num_entries {
			let value = reader.read_varint()?;
			if value == 0 {
				if i == 0 {
					return Err(TilesError::DirectoryCorrupt(
						"first entry cannot be relative to a previous one".to_string(),
					));
				}
				entries[i].range.offset = entries[i - 1].range.end();
			} else {
				entries[i].range.offset = value - 1;
			}
		}

		if reader.has_remaining() {
			return Err(TilesError::DirectoryCorrupt(format!(
				"{} trailing bytes after {num_entries} entries",
				reader.remaining()
			)));
		}

		Ok(Directory { entries })
	}

	/// Serializes all entries of this directory.
	pub fn serialize(&self) -> Result<Blob> {
		serialize_entries(&self.entries)
	}

	/// Finds the entry responsible for `tile_id`: the exact tile entry, a
	/// tile entry whose run covers the id, or the floor leaf pointer to
	/// descend into. `None` means the tile cannot exist in this directory.
	pub fn find_tile(&self, tile_id: u64) -> Option<EntryV3> {
		let mut m: i64 = 0;
		let mut n: i64 = self.entries.len() as i64 - 1;

		while m <= n {
			let k = (m + n) >> 1;
			let entry_id = self.entries[k as usize].tile_id;
			match tile_id.cmp(&entry_id) {
				Ordering::Greater => m = k + 1,
				Ordering::Less => n = k - 1,
				Ordering::Equal => return Some(self.entries[k as usize]),
			}
		}

		// at this point m > n; n is the floor entry
		if n >= 0 {
			let entry = self.entries[n as usize];
			if entry.is_leaf() || tile_id < entry.id_end() {
				return Some(entry);
			}
		}
		None
	}
}

impl From<Vec<EntryV3>> for Directory {
	fn from(entries: Vec<EntryV3>) -> Self {
		Directory { entries }
	}
}

/// Serializes a slice of entries (assumed sorted by tile id).
pub fn serialize_entries(entries: &[EntryV3]) -> Result<Blob> {
	let mut writer = ValueWriterBlob::new_le();

	writer.write_varint(entries.len() as u64)?;

	let mut last_id: u64 = 0;
	for entry in entries {
		writer.write_varint(entry.tile_id - last_id)?;
		last_id = entry.tile_id;
	}

	for entry in entries {
		writer.write_varint(u64::from(entry.run_length))?;
	}

	for entry in entries {
		writer.write_varint(entry.range.length)?;
	}

	for i in 0..entries.len() {
		let contiguous = i > 0 && entries[i].range.offset == entries[i - 1].range.end();
		if contiguous {
			writer.write_varint(0)?;
		} else {
			writer.write_varint(entries[i].range.offset + 1)?;
		}
	}

	Ok(writer.into_blob())
}

/// A directory split into a resident root and a section of compressed
/// leaves.
#[derive(Debug)]
pub struct RootAndLeaves {
	pub root_bytes: Blob,
	pub leaves_bytes: Blob,
	pub num_leaves: usize,
}

/// Splits `entries` into a root directory and leaf directories such that
/// the compressed root fits `target_root_bytes`.
///
/// If everything fits, the root holds the entries themselves and there are
/// no leaves. Otherwise entries are cut into equally sized leaves; the leaf
/// size grows until the root, which holds one pointer entry per leaf, fits.
pub fn build_root_and_leaves(
	entries: &[EntryV3],
	target_root_bytes: u64,
	compression: TileCompression,
) -> Result<RootAndLeaves> {
	if entries.len() < 16384 {
		let root_bytes = compress(serialize_entries(entries)?, compression)?;
		if root_bytes.len() <= target_root_bytes {
			return Ok(RootAndLeaves {
				root_bytes,
				leaves_bytes: Blob::new_empty(),
				num_leaves: 0,
			});
		}
	}

	let mut leaf_size = ((entries.len() / 3500).max(4096)) as f64;
	loop {
		let result = build_with_leaf_size(entries, leaf_size as usize, compression)?;
		if result.root_bytes.len() <= target_root_bytes {
			return Ok(result);
		}
		leaf_size *= 1.2;
	}
}

fn build_with_leaf_size(
	entries: &[EntryV3],
	leaf_size: usize,
	compression: TileCompression,
) -> Result<RootAndLeaves> {
	let mut root_entries: Vec<EntryV3> = Vec::new();
	let mut leaves_bytes: Vec<u8> = Vec::new();
	let mut num_leaves = 0;

	for chunk in entries.chunks(leaf_size) {
		let serialized = compress(serialize_entries(chunk)?, compression)?;
		root_entries.push(EntryV3::new(
			chunk[0].tile_id,
			ByteRange::new(leaves_bytes.len() as u64, serialized.len()),
			0,
		));
		leaves_bytes.write_all(serialized.as_slice())?;
		num_leaves += 1;
	}

	let root_bytes = compress(serialize_entries(&root_entries)?, compression)?;

	Ok(RootAndLeaves {
		root_bytes,
		leaves_bytes: Blob::from(leaves_bytes),
		num_leaves,
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_entries() -> Vec<EntryV3> {
		vec![
			EntryV3::new(1, ByteRange::new(100, 100), 0),
			EntryV3::new(2, ByteRange::new(200, 100), 1),
			EntryV3::new(3, ByteRange::new(300, 100), 0),
		]
	}

	#[test]
	fn serialization_is_stable_and_invertible() -> Result<()> {
		let directory = Directory::from(sample_entries());
		let serialized = directory.serialize()?;
		assert_eq!(serialized.as_hex(), "03 01 01 01 00 01 00 64 64 64 65 00 00");
		assert_eq!(directory.serialize()?, serialized, "same input must give same bytes");
		assert_eq!(Directory::from_blob(&serialized)?, directory);
		Ok(())
	}

	#[test]
	fn round_trip_with_scattered_offsets() -> Result<()> {
		let mut entries = Vec::new();
		let mut tile_id = 0;
		for i in 0..500u64 {
			tile_id += 1 + i % 7;
			entries.push(EntryV3::new(
				tile_id,
				ByteRange::new(i * 1000 % 77777, i % 300),
				(i % 4) as u32,
			));
		}
		let directory = Directory::from(entries);
		assert_eq!(Directory::from_blob(&directory.serialize()?)?, directory);
		Ok(())
	}

	#[test]
	fn empty_directory_round_trips() -> Result<()> {
		let directory = Directory::new();
		let blob = directory.serialize()?;
		assert_eq!(Directory::from_blob(&blob)?.len(), 0);
		Ok(())
	}

	#[test]
	fn truncated_input_is_corrupt() -> Result<()> {
		let blob = Directory::from(sample_entries()).serialize()?;
		let cut = Blob::from(&blob.as_slice()[0..blob.as_slice().len() - 3]);
		assert!(matches!(
			Directory::from_blob(&cut),
			Err(TilesError::DirectoryCorrupt(_))
		));
		Ok(())
	}

	#[test]
	fn trailing_bytes_are_corrupt() -> Result<()> {
		let blob = Directory::from(sample_entries()).serialize()?;
		let mut data = blob.into_vec();
		data.push(0x00);
		assert!(matches!(
			Directory::from_blob(&Blob::from(data)),
			Err(TilesError::DirectoryCorrupt(_))
		));
		Ok(())
	}

	#[test]
	fn duplicate_ids_are_corrupt() -> Result<()> {
		let entries = vec![
			EntryV3::new(7, ByteRange::new(0, 10), 1),
			EntryV3::new(7, ByteRange::new(10, 10), 1),
		];
		let blob = serialize_entries(&entries)?;
		assert!(matches!(
			Directory::from_blob(&blob),
			Err(TilesError::DirectoryCorrupt(_))
		));
		Ok(())
	}

	#[test]
	fn absurd_entry_count_is_corrupt() -> Result<()> {
		let mut writer = ValueWriterBlob::new_le();
		writer.write_varint(MAX_ENTRY_COUNT + 1)?;
		assert!(matches!(
			Directory::from_blob(&writer.into_blob()),
			Err(TilesError::DirectoryCorrupt(_))
		));
		Ok(())
	}

	#[test]
	fn find_tile_covers_runs_and_leaves() {
		let directory = Directory::from(vec![
			EntryV3::new(10, ByteRange::new(0, 5), 3),
			EntryV3::new(20, ByteRange::new(5, 5), 0),
			EntryV3::new(30, ByteRange::new(10, 5), 1),
		]);

		assert_eq!(directory.find_tile(9), None);
		assert_eq!(directory.find_tile(10).unwrap().tile_id, 10);
		assert_eq!(directory.find_tile(12).unwrap().tile_id, 10, "run covers 10..13");
		assert_eq!(directory.find_tile(13), None, "beyond the run, before the leaf");
		assert!(directory.find_tile(25).unwrap().is_leaf(), "leaf floors everything below 30");
		assert_eq!(directory.find_tile(30).unwrap().tile_id, 30);
		assert_eq!(directory.find_tile(31), None);
	}

	#[test]
	fn root_only_when_small() -> Result<()> {
		let result = build_root_and_leaves(&sample_entries(), 16384, TileCompression::Uncompressed)?;
		assert_eq!(result.num_leaves, 0);
		assert!(result.leaves_bytes.is_empty());
		assert!(!result.root_bytes.is_empty());
		Ok(())
	}

	fn synthetic_entries(count: u64) -> Vec<EntryV3> {
		(0..count)
			.map(|i| EntryV3::new(i * 2, ByteRange::new(i * 512, 512), 1))
			.collect()
	}

	#[test]
	fn split_bounds_the_root() -> Result<()> {
		let entries = synthetic_entries(100_000);
		let target = 4096u64;
		let result = build_root_and_leaves(&entries, target, TileCompression::Uncompressed)?;

		assert!(result.num_leaves >= 2, "100k entries cannot fit a 4k root");
		assert!(result.root_bytes.len() <= target);
		assert!(!result.leaves_bytes.is_empty());

		// the root must consist of leaf pointers covering all entries
		let root = Directory::from_blob(&result.root_bytes)?;
		assert_eq!(root.len(), result.num_leaves);
		assert!(root.iter().all(EntryV3::is_leaf));
		assert_eq!(root.iter().next().unwrap().tile_id, 0);

		// every leaf deserializes and tiles the id space in order
		let mut seen = 0usize;
		let mut last_id = None;
		for pointer in root.iter() {
			let leaf_blob = result.leaves_bytes.read_range(&pointer.range)?;
			let leaf = Directory::from_blob(&leaf_blob)?;
			assert_eq!(leaf.iter().next().unwrap().tile_id, pointer.tile_id);
			for entry in leaf.iter() {
				assert!(last_id.is_none_or(|id| id < entry.tile_id));
				last_id = Some(entry.tile_id);
			}
			seen += leaf.len();
		}
		assert_eq!(seen, entries.len());
		Ok(())
	}

	#[test]
	fn lookup_touches_at_most_one_leaf() -> Result<()> {
		let entries = synthetic_entries(100_000);
		let result = build_root_and_leaves(&entries, 4096, TileCompression::Uncompressed)?;
		let root = Directory::from_blob(&result.root_bytes)?;

		for probe in [0u64, 2, 19_998, 100_000, 199_998] {
			let pointer = root.find_tile(probe).unwrap();
			assert!(pointer.is_leaf());
			let leaf = Directory::from_blob(&result.leaves_bytes.read_range(&pointer.range)?)?;
			let entry = leaf.find_tile(probe).unwrap();
			assert_eq!(entry.tile_id, probe, "one leaf fetch resolves the lookup");
		}
		Ok(())
	}
}
