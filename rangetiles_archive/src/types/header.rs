use super::{PMTilesCompression, PMTilesType};
use rangetiles_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
use rangetiles_core::{Blob, ByteRange, MAX_ZOOM_LEVEL, Result, TilesError};

/// The fixed 127-byte record at offset 0 of every archive, little-endian.
///
/// Section ranges are absolute file positions; the counts describe the
/// directory (`tile_entries_count`), the addressable tiles including
/// run-length expansion (`addressed_tiles_count`) and the deduplicated
/// bodies (`tile_contents_count`). Bounding box and center are fixed-point
/// degrees scaled by 1e7.
#[derive(Debug, PartialEq)]
pub struct HeaderV3 {
	pub root_dir: ByteRange,
	pub metadata: ByteRange,
	pub leaf_dirs: ByteRange,
	pub tile_data: ByteRange,
	pub addressed_tiles_count: u64,
	pub tile_entries_count: u64,
	pub tile_contents_count: u64,
	pub clustered: bool,
	pub internal_compression: PMTilesCompression,
	pub tile_compression: PMTilesCompression,
	pub tile_type: PMTilesType,
	pub min_zoom: u8,
	pub max_zoom: u8,
	pub min_lon_e7: i32,
	pub min_lat_e7: i32,
	pub max_lon_e7: i32,
	pub max_lat_e7: i32,
	pub center_zoom: u8,
	pub center_lon_e7: i32,
	pub center_lat_e7: i32,
}

impl HeaderV3 {
	/// Size of the serialized header in bytes.
	pub fn len() -> u64 {
		127
	}

	pub fn serialize(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();
		writer.write_slice(b"PMTiles")?;
		writer.write_u8(3)?; // spec version

		writer.write_u64(self.root_dir.offset)?;
		writer.write_u64(self.root_dir.length)?;
		writer.write_u64(self.metadata.offset)?;
		writer.write_u64(self.metadata.length)?;
		writer.write_u64(self.leaf_dirs.offset)?;
		writer.write_u64(self.leaf_dirs.length)?;
		writer.write_u64(self.tile_data.offset)?;
		writer.write_u64(self.tile_data.length)?;
		writer.write_u64(self.addressed_tiles_count)?;
		writer.write_u64(self.tile_entries_count)?;
		writer.write_u64(self.tile_contents_count)?;

		writer.write_u8(u8::from(self.clustered))?;
		writer.write_u8(self.internal_compression as u8)?;
		writer.write_u8(self.tile_compression as u8)?;
		writer.write_u8(self.tile_type as u8)?;
		writer.write_u8(self.min_zoom)?;
		writer.write_u8(self.max_zoom)?;
		writer.write_i32(self.min_lon_e7)?;
		writer.write_i32(self.min_lat_e7)?;
		writer.write_i32(self.max_lon_e7)?;
		writer.write_i32(self.max_lat_e7)?;
		writer.write_u8(self.center_zoom)?;
		writer.write_i32(self.center_lon_e7)?;
		writer.write_i32(self.center_lat_e7)?;

		Ok(writer.into_blob())
	}

	pub fn deserialize(blob: &Blob) -> Result<Self> {
		let buffer = blob.as_slice();

		if buffer.len() != Self::len() as usize {
			return Err(TilesError::InvalidHeader(format!(
				"header must be {} bytes, got {}",
				Self::len(),
				buffer.len()
			)));
		}
		if &buffer[0..7] != b"PMTiles" {
			return Err(TilesError::InvalidHeader("magic number mismatch".to_string()));
		}
		if buffer[7] != 3 {
			return Err(TilesError::InvalidHeader(format!(
				"spec version must be 3, got {}",
				buffer[7]
			)));
		}

		let mut reader = ValueReaderSlice::new_le(buffer);
		reader.set_position(8)?;

		let header = Self {
			root_dir: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			metadata: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			leaf_dirs: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			tile_data: ByteRange::new(reader.read_u64()?, reader.read_u64()?),
			addressed_tiles_count: reader.read_u64()?,
			tile_entries_count: reader.read_u64()?,
			tile_contents_count: reader.read_u64()?,
			clustered: reader.read_u8()? == 1,
			internal_compression: PMTilesCompression::from_u8(reader.read_u8()?)?,
			tile_compression: PMTilesCompression::from_u8(reader.read_u8()?)?,
			tile_type: PMTilesType::from_u8(reader.read_u8()?)?,
			min_zoom: reader.read_u8()?,
			max_zoom: reader.read_u8()?,
			min_lon_e7: reader.read_i32()?,
			min_lat_e7: reader.read_i32()?,
			max_lon_e7: reader.read_i32()?,
			max_lat_e7: reader.read_i32()?,
			center_zoom: reader.read_u8()?,
			center_lon_e7: reader.read_i32()?,
			center_lat_e7: reader.read_i32()?,
		};

		header.check()?;
		Ok(header)
	}

	/// Structural invariants beyond the byte layout.
	fn check(&self) -> Result<()> {
		if self.root_dir.offset != Self::len() {
			return Err(TilesError::InvalidHeader(format!(
				"root directory must start at {}, not {}",
				Self::len(),
				self.root_dir.offset
			)));
		}
		if self.min_zoom > self.max_zoom || self.max_zoom > MAX_ZOOM_LEVEL {
			return Err(TilesError::InvalidHeader(format!(
				"invalid zoom range {}..{}",
				self.min_zoom, self.max_zoom
			)));
		}
		Ok(())
	}
}
