//! Random access into a PMTiles archive.
//!
//! Opening reads the 127-byte header and the root directory, which stays
//! resident for the lifetime of the reader. Tile lookups convert the
//! coordinate to a Hilbert tile id, binary-search the root, descend into at
//! most a handful of leaf directories (fetched on demand through the
//! byte-range source and cached), and finally fetch the body from the
//! tile-data section. All methods take `&self` and may be called from many
//! threads at once.

use crate::types::{Directory, EntryV3, HeaderV3, coord_to_tile_id, tile_id_to_coord, zoom_base};
use rangetiles_core::io::{DataReader, DataReaderFile, ReaderOptions, open_data_reader};
use rangetiles_core::{
	Blob, ByteRange, LimitedCache, MAX_ZOOM_LEVEL, Result, TileBBoxPyramid, TileCompression, TileCoord,
	TilesError, decompress,
};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// Byte budget of the parsed-leaf cache.
const LEAF_CACHE_SIZE: usize = 100_000_000;

/// A reader over one PMTiles archive.
pub struct PMTilesReader {
	data_reader: DataReader,
	header: HeaderV3,
	internal_compression: TileCompression,
	tile_compression: TileCompression,
	root: Arc<Directory>,
	leaf_cache: Mutex<LimitedCache<ByteRange, Arc<Directory>>>,
}

impl PMTilesReader {
	/// Opens a local archive file.
	pub async fn open_path(path: &Path) -> Result<PMTilesReader> {
		PMTilesReader::open_reader(DataReaderFile::open(path)?).await
	}

	/// Opens an archive addressed by path or URL (see
	/// [`open_data_reader`] for the routing rules).
	pub async fn open_location(location: &str, options: &ReaderOptions) -> Result<PMTilesReader> {
		PMTilesReader::open_reader(open_data_reader(location, options).await?).await
	}

	/// Opens an archive over an arbitrary byte-range source.
	pub async fn open_reader(data_reader: DataReader) -> Result<PMTilesReader> {
		let header_blob = data_reader.read_range(&ByteRange::new(0, HeaderV3::len())).await?;
		let header = HeaderV3::deserialize(&header_blob)?;

		let internal_compression = header.internal_compression.as_value();
		let tile_compression = header.tile_compression.as_value();

		let root_blob = data_reader.read_range(&header.root_dir).await?;
		if root_blob.len() < header.root_dir.length {
			return Err(TilesError::InvalidHeader(format!(
				"archive truncated: root directory {} not readable",
				header.root_dir
			)));
		}
		let root = Directory::from_blob(&decompress(root_blob, internal_compression)?)?;

		Ok(PMTilesReader {
			data_reader,
			header,
			internal_compression,
			tile_compression,
			root: Arc::new(root),
			leaf_cache: Mutex::new(LimitedCache::with_maximum_size(LEAF_CACHE_SIZE)),
		})
	}

	pub fn get_header(&self) -> &HeaderV3 {
		&self.header
	}

	pub fn get_name(&self) -> &str {
		self.data_reader.get_name()
	}

	pub fn get_tile_compression(&self) -> TileCompression {
		self.tile_compression
	}

	/// The archive metadata, decompressed.
	pub async fn get_metadata(&self) -> Result<Blob> {
		let blob = self.data_reader.read_range(&self.header.metadata).await?;
		decompress(blob, self.internal_compression)
	}

	/// The tile body as stored, still compressed with the archive's tile
	/// compression. `None` if the tile is not in the archive.
	pub async fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		log::trace!("get_tile {coord:?}");

		let tile_id = coord_to_tile_id(coord)?;
		let mut directory = self.root.clone();

		// leaf depth is bounded by construction, typically one
		for _depth in 0..3 {
			let entry = match directory.find_tile(tile_id) {
				Some(entry) => entry,
				None => return Ok(None),
			};
			if entry.range.is_empty() {
				return Ok(None);
			}
			if entry.is_tile() {
				return Ok(Some(self.read_tile_body(&entry).await?));
			}
			directory = self.get_leaf(entry.range).await?;
		}

		Err(TilesError::DirectoryCorrupt(
			"leaf directories nested deeper than 3 levels".to_string(),
		))
	}

	/// The tile body, decompressed with the archive's tile compression.
	pub async fn get_tile_decompressed(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		match self.get_tile(coord).await? {
			Some(blob) => Ok(Some(decompress(blob, self.tile_compression)?)),
			None => Ok(None),
		}
	}

	async fn read_tile_body(&self, entry: &EntryV3) -> Result<Blob> {
		let range = entry.range.get_shifted_forward(self.header.tile_data.offset);
		let blob = self.data_reader.read_range(&range).await?;
		if blob.len() < entry.range.length {
			return Err(TilesError::DirectoryCorrupt(format!(
				"tile body {range} extends past the end of the archive"
			)));
		}
		Ok(blob)
	}

	/// Fetches, decompresses and parses a leaf directory, serving repeats
	/// from an LRU cache. The lock is never held across the fetch.
	async fn get_leaf(&self, range: ByteRange) -> Result<Arc<Directory>> {
		if let Some(hit) = self
			.leaf_cache
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.get(&range)
		{
			return Ok(hit);
		}

		let blob = self
			.data_reader
			.read_range(&range.get_shifted_forward(self.header.leaf_dirs.offset))
			.await?;
		if blob.len() < range.length {
			return Err(TilesError::DirectoryCorrupt(format!(
				"leaf directory {range} extends past the end of the archive"
			)));
		}
		let directory = Arc::new(Directory::from_blob(&decompress(blob, self.internal_compression)?)?);

		Ok(self
			.leaf_cache
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.add(range, directory))
	}

	/// Calls `callback` once per tile entry whose id range intersects zoom
	/// level `z`, passing the entry's first tile id and the stored body.
	/// Leaves are visited lazily; the walk is not restartable.
	pub async fn stream_tiles<F>(&self, z: u8, mut callback: F) -> Result<()>
	where
		F: FnMut(u64, Blob) -> Result<()>,
	{
		if z > MAX_ZOOM_LEVEL {
			return Err(TilesError::InvalidCoord { z, x: 0, y: 0 });
		}
		let id_min = zoom_base(z);
		let id_max = zoom_base(z + 1);

		let mut pending: Vec<Arc<Directory>> = vec![self.root.clone()];
		while let Some(directory) = pending.pop() {
			let entries = directory.as_slice();
			for (i, entry) in entries.iter().enumerate() {
				if entry.tile_id >= id_max {
					break;
				}
				if entry.is_tile() {
					if entry.id_end() > id_min && !entry.range.is_empty() {
						let body = self.read_tile_body(entry).await?;
						callback(entry.tile_id, body)?;
					}
				} else {
					// ids covered by this leaf end where the next entry starts
					let next_start = entries.get(i + 1).map_or(u64::MAX, |e| e.tile_id);
					if next_start > id_min && !entry.range.is_empty() {
						pending.push(self.get_leaf(entry.range).await?);
					}
				}
			}
		}
		Ok(())
	}

	/// Diagnostic linear scan for the entry whose tile id is closest to
	/// `tile_id`, across the root and every leaf.
	pub async fn find_closest_tile_id(&self, tile_id: u64) -> Result<Option<u64>> {
		let mut best: Option<u64> = None;
		let mut pending: Vec<Arc<Directory>> = vec![self.root.clone()];
		while let Some(directory) = pending.pop() {
			for entry in directory.iter() {
				if entry.is_tile() {
					if best.is_none_or(|b| entry.tile_id.abs_diff(tile_id) < b.abs_diff(tile_id)) {
						best = Some(entry.tile_id);
					}
				} else if !entry.range.is_empty() {
					pending.push(self.get_leaf(entry.range).await?);
				}
			}
		}
		Ok(best)
	}

	/// All tile entries reachable from the root, in tile-id order. Leaf
	/// pointers are resolved, so this is a full directory scan; meant for
	/// diagnostics and merging, not for lookups.
	pub async fn get_tile_entries(&self) -> Result<Vec<EntryV3>> {
		let mut entries: Vec<EntryV3> = Vec::new();
		let mut pending: Vec<Arc<Directory>> = vec![self.root.clone()];
		while let Some(directory) = pending.pop() {
			for entry in directory.iter() {
				if entry.is_tile() {
					entries.push(*entry);
				} else if !entry.range.is_empty() {
					pending.push(self.get_leaf(entry.range).await?);
				}
			}
		}
		entries.sort_unstable_by_key(|entry| entry.tile_id);
		Ok(entries)
	}

	/// Tile coverage per zoom level, derived from the directories. Walks
	/// every entry, so this is a full directory scan.
	pub async fn get_bbox_pyramid(&self) -> Result<TileBBoxPyramid> {
		let mut pyramid = TileBBoxPyramid::new_empty();

		let mut pending: Vec<Arc<Directory>> = vec![self.root.clone()];
		while let Some(directory) = pending.pop() {
			for entry in directory.iter() {
				if entry.range.is_empty() {
					continue;
				}
				if entry.is_tile() {
					for tile_id in entry.tile_id..entry.id_end() {
						pyramid.include_coord(&tile_id_to_coord(tile_id)?);
					}
				} else {
					pending.push(self.get_leaf(entry.range).await?);
				}
			}
		}
		Ok(pyramid)
	}
}

impl std::fmt::Debug for PMTilesReader {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PMTilesReader")
			.field("name", &self.get_name())
			.field("header", &self.header)
			.finish()
	}
}
