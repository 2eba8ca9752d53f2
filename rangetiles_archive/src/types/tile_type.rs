use rangetiles_core::{Result, TileFormat, TilesError};

/// Tile type code as stored in the archive header:
/// 0 = unknown, 1 = MVT, 2 = PNG, 3 = JPEG, 4 = WebP.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PMTilesType {
	Unknown = 0x0,
	Mvt = 0x1,
	Png = 0x2,
	Jpeg = 0x3,
	Webp = 0x4,
}

impl PMTilesType {
	pub fn from_u8(value: u8) -> Result<Self> {
		match value {
			0 => Ok(PMTilesType::Unknown),
			1 => Ok(PMTilesType::Mvt),
			2 => Ok(PMTilesType::Png),
			3 => Ok(PMTilesType::Jpeg),
			4 => Ok(PMTilesType::Webp),
			_ => Err(TilesError::InvalidHeader(format!("unknown tile type code {value}"))),
		}
	}

	pub fn from_value(value: TileFormat) -> Self {
		match value {
			TileFormat::Unknown => PMTilesType::Unknown,
			TileFormat::Mvt => PMTilesType::Mvt,
			TileFormat::Png => PMTilesType::Png,
			TileFormat::Jpeg => PMTilesType::Jpeg,
			TileFormat::Webp => PMTilesType::Webp,
		}
	}

	pub fn as_value(&self) -> TileFormat {
		match self {
			PMTilesType::Unknown => TileFormat::Unknown,
			PMTilesType::Mvt => TileFormat::Mvt,
			PMTilesType::Png => TileFormat::Png,
			PMTilesType::Jpeg => TileFormat::Jpeg,
			PMTilesType::Webp => TileFormat::Webp,
		}
	}
}
