//! Authoring of PMTiles archives.
//!
//! Tiles arrive in arbitrary order. Each body is hashed; unique bodies are
//! appended to a spool file, duplicates only add a directory entry pointing
//! at the existing body. `complete` lays the bodies out in Hilbert order,
//! merges runs of identical consecutive tiles, builds the root/leaf
//! directory, and stitches header, root, metadata, leaves and tile data
//! into the final layout.

use crate::types::{
	EntryV3, HeaderV3, PMTilesCompression, PMTilesType, build_root_and_leaves, coord_to_tile_id,
};
use rangetiles_core::io::{DataWriterFile, DataWriterTrait};
use rangetiles_core::{
	Blob, ByteRange, GeoBBox, GeoCenter, ProgressListener, Result, TileCompression, TileCoord, TileFormat,
	TilesError, compress,
};
use std::collections::HashMap;
use std::fs::File;
use std::hash::BuildHasherDefault;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Arc;
use twox_hash::XxHash3_64;

/// Static description of the archive to be written.
#[derive(Clone)]
pub struct WriterConfig {
	pub tile_type: TileFormat,
	/// Codec the writer applies to every new tile body before spooling.
	pub tile_compression: TileCompression,
	/// Codec applied to directories and metadata at `complete`.
	pub internal_compression: TileCompression,
	pub min_zoom: u8,
	pub max_zoom: u8,
	/// `(west, south, east, north)` in degrees.
	pub bounds: GeoBBox,
	/// `(longitude, latitude, zoom)`.
	pub center: GeoCenter,
	/// Upper bound for the compressed root directory.
	pub target_root_bytes: u64,
	pub progress: Option<Arc<dyn ProgressListener>>,
}

impl Default for WriterConfig {
	fn default() -> Self {
		WriterConfig {
			tile_type: TileFormat::Unknown,
			tile_compression: TileCompression::Uncompressed,
			internal_compression: TileCompression::Gzip,
			min_zoom: 0,
			max_zoom: 14,
			bounds: GeoBBox::world(),
			center: GeoCenter(0.0, 0.0, 0),
			target_root_bytes: 16384,
			progress: None,
		}
	}
}

impl std::fmt::Debug for WriterConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WriterConfig")
			.field("tile_type", &self.tile_type)
			.field("tile_compression", &self.tile_compression)
			.field("internal_compression", &self.internal_compression)
			.field("min_zoom", &self.min_zoom)
			.field("max_zoom", &self.max_zoom)
			.field("bounds", &self.bounds)
			.field("center", &self.center)
			.field("target_root_bytes", &self.target_root_bytes)
			.finish()
	}
}

/// A writer for one PMTiles archive.
///
/// `add_tile` calls are serialized through `&mut self`; `complete_to_*`
/// must be called exactly once.
pub struct PMTilesWriter {
	config: WriterConfig,
	metadata: Blob,
	spool: File,
	spool_length: u64,
	entries: Vec<EntryV3>,
	entry_index_by_id: HashMap<u64, usize>,
	spool_range_by_hash: HashMap<u64, ByteRange, BuildHasherDefault<XxHash3_64>>,
	finished: bool,
}

impl PMTilesWriter {
	pub fn new(config: WriterConfig) -> Result<PMTilesWriter> {
		config.bounds.check()?;
		Ok(PMTilesWriter {
			config,
			metadata: Blob::new_empty(),
			spool: tempfile::tempfile()?,
			spool_length: 0,
			entries: Vec::new(),
			entry_index_by_id: HashMap::new(),
			spool_range_by_hash: HashMap::default(),
			finished: false,
		})
	}

	pub fn get_config(&self) -> &WriterConfig {
		&self.config
	}

	/// Stores the raw metadata bytes; they are compressed with the internal
	/// codec at `complete`.
	pub fn set_metadata(&mut self, metadata: Blob) -> Result<()> {
		self.check_open()?;
		self.metadata = metadata;
		Ok(())
	}

	/// Adds one tile body (uncompressed; the writer applies the configured
	/// tile compression). The body is hashed for deduplication; adding the
	/// same coordinate again replaces the earlier tile.
	pub fn add_tile(&mut self, coord: &TileCoord, body: &Blob) -> Result<()> {
		let hash = XxHash3_64::oneshot(body.as_slice());
		self.add_tile_prehashed(coord, hash, body)
	}

	/// Variant of [`add_tile`](Self::add_tile) for callers that already
	/// hold the XxHash3 of the uncompressed body.
	pub fn add_tile_prehashed(&mut self, coord: &TileCoord, hash: u64, body: &Blob) -> Result<()> {
		self.check_open()?;
		let tile_id = coord_to_tile_id(coord)?;

		let spool_range = if let Some(range) = self.spool_range_by_hash.get(&hash) {
			*range
		} else {
			let stored = compress(body.clone(), self.config.tile_compression)?;
			let range = ByteRange::new(self.spool_length, stored.len());
			self.spool.write_all(stored.as_slice())?;
			self.spool_length += stored.len();
			self.spool_range_by_hash.insert(hash, range);
			range
		};

		let entry = EntryV3::new(tile_id, spool_range, 1);
		if let Some(&index) = self.entry_index_by_id.get(&tile_id) {
			self.entries[index] = entry;
		} else {
			self.entry_index_by_id.insert(tile_id, self.entries.len());
			self.entries.push(entry);
		}
		Ok(())
	}

	/// Finalizes into a file at `path`.
	pub fn complete_to_path(&mut self, path: &Path) -> Result<()> {
		let mut writer = DataWriterFile::from_path(path)?;
		self.complete_to_writer(&mut writer)?;
		writer.finish()
	}

	/// Finalizes into a data writer. See the module documentation for the
	/// phase sequence; cancellation is honored at every phase boundary and
	/// periodically during the body copy.
	pub fn complete_to_writer(&mut self, writer: &mut dyn DataWriterTrait) -> Result<()> {
		self.check_open()?;
		self.finished = true;

		// sorting
		self.check_cancelled()?;
		self.report_progress(0.05);
		self.entries.sort_unstable_by_key(|entry| entry.tile_id);

		// clustered body layout: final offsets in order of first reference
		self.check_cancelled()?;
		self.report_progress(0.1);
		let mut body_order: Vec<ByteRange> = Vec::with_capacity(self.spool_range_by_hash.len());
		let mut final_offset_by_spool: HashMap<u64, u64> = HashMap::with_capacity(self.spool_range_by_hash.len());
		let mut tile_data_length: u64 = 0;
		for entry in &mut self.entries {
			let spool_range = entry.range;
			let final_offset = *final_offset_by_spool.entry(spool_range.offset).or_insert_with(|| {
				let offset = tile_data_length;
				tile_data_length += spool_range.length;
				body_order.push(spool_range);
				offset
			});
			entry.range = ByteRange::new(final_offset, spool_range.length);
		}
		let addressed_tiles_count = self.entries.len() as u64;
		let tile_contents_count = body_order.len() as u64;

		// run-length merging
		self.check_cancelled()?;
		self.report_progress(0.15);
		let mut merged: Vec<EntryV3> = Vec::with_capacity(self.entries.len());
		for &entry in &self.entries {
			if let Some(last) = merged.last_mut() {
				if last.id_end() == entry.tile_id && last.range == entry.range {
					last.run_length += entry.run_length;
					continue;
				}
			}
			merged.push(entry);
		}

		// directory layout
		self.check_cancelled()?;
		self.report_progress(0.2);
		let directory = build_root_and_leaves(&merged, self.config.target_root_bytes, self.config.internal_compression)?;
		log::debug!(
			"directory: {} entries, {} leaves, {} byte root",
			merged.len(),
			directory.num_leaves,
			directory.root_bytes.len()
		);

		// metadata compression
		self.check_cancelled()?;
		self.report_progress(0.25);
		let metadata = compress(self.metadata.clone(), self.config.internal_compression)?;

		// header assembly
		self.check_cancelled()?;
		self.report_progress(0.3);
		let root_dir = ByteRange::new(HeaderV3::len(), directory.root_bytes.len());
		let metadata_range = ByteRange::new(root_dir.end(), metadata.len());
		let leaf_dirs = ByteRange::new(metadata_range.end(), directory.leaves_bytes.len());
		let tile_data = ByteRange::new(leaf_dirs.end(), tile_data_length);

		let bounds_e7 = self.config.bounds.as_e7();
		let header = HeaderV3 {
			root_dir,
			metadata: metadata_range,
			leaf_dirs,
			tile_data,
			addressed_tiles_count,
			tile_entries_count: merged.len() as u64,
			tile_contents_count,
			clustered: true,
			internal_compression: PMTilesCompression::from_value(self.config.internal_compression),
			tile_compression: PMTilesCompression::from_value(self.config.tile_compression),
			tile_type: PMTilesType::from_value(self.config.tile_type),
			min_zoom: self.config.min_zoom,
			max_zoom: self.config.max_zoom,
			min_lon_e7: bounds_e7[0],
			min_lat_e7: bounds_e7[1],
			max_lon_e7: bounds_e7[2],
			max_lat_e7: bounds_e7[3],
			center_zoom: self.config.center.2,
			center_lon_e7: (self.config.center.0 * 1e7) as i32,
			center_lat_e7: (self.config.center.1 * 1e7) as i32,
		};

		// write
		self.check_cancelled()?;
		writer.append(&header.serialize()?)?;
		writer.append(&directory.root_bytes)?;
		writer.append(&metadata)?;
		writer.append(&directory.leaves_bytes)?;
		self.copy_spooled_bodies(writer, &body_order)?;

		self.report_progress(1.0);
		Ok(())
	}

	/// Streams the unique bodies from the spool in their final order.
	fn copy_spooled_bodies(&mut self, writer: &mut dyn DataWriterTrait, body_order: &[ByteRange]) -> Result<()> {
		let report_every = (body_order.len() / 100).max(1);
		for (index, spool_range) in body_order.iter().enumerate() {
			if index % report_every == 0 {
				self.check_cancelled()?;
				self.report_progress(0.3 + 0.7 * index as f64 / body_order.len() as f64);
			}
			let mut body = Blob::new_sized(spool_range.length as usize);
			self.spool.seek(SeekFrom::Start(spool_range.offset))?;
			self.spool.read_exact(body.as_mut_slice())?;
			writer.append(&body)?;
		}
		Ok(())
	}

	fn check_open(&self) -> Result<()> {
		if self.finished {
			return Err(TilesError::WriterStateViolation("writer is already completed"));
		}
		Ok(())
	}

	fn check_cancelled(&self) -> Result<()> {
		if self.config.progress.as_ref().is_some_and(|p| p.is_cancelled()) {
			return Err(TilesError::Cancelled);
		}
		Ok(())
	}

	fn report_progress(&self, fraction: f64) {
		if let Some(progress) = &self.config.progress {
			progress.on_progress(fraction);
		}
	}
}

impl std::fmt::Debug for PMTilesWriter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("PMTilesWriter")
			.field("config", &self.config)
			.field("tiles", &self.entries.len())
			.field("unique_bodies", &self.spool_range_by_hash.len())
			.field("finished", &self.finished)
			.finish()
	}
}
