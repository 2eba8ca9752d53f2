use rangetiles_core::{Result, TileCompression, TilesError};

/// Compression code as stored in the archive header:
/// 0 = none, 1 = gzip, 2 = brotli, 3 = zstd.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PMTilesCompression {
	None = 0x0,
	Gzip = 0x1,
	Brotli = 0x2,
	Zstd = 0x3,
}

impl PMTilesCompression {
	pub fn from_u8(value: u8) -> Result<Self> {
		match value {
			0 => Ok(PMTilesCompression::None),
			1 => Ok(PMTilesCompression::Gzip),
			2 => Ok(PMTilesCompression::Brotli),
			3 => Ok(PMTilesCompression::Zstd),
			_ => Err(TilesError::UnsupportedCompression(value)),
		}
	}

	pub fn from_value(value: TileCompression) -> Self {
		match value {
			TileCompression::Uncompressed => PMTilesCompression::None,
			TileCompression::Gzip => PMTilesCompression::Gzip,
			TileCompression::Brotli => PMTilesCompression::Brotli,
			TileCompression::Zstd => PMTilesCompression::Zstd,
		}
	}

	pub fn as_value(&self) -> TileCompression {
		match self {
			PMTilesCompression::None => TileCompression::Uncompressed,
			PMTilesCompression::Gzip => TileCompression::Gzip,
			PMTilesCompression::Brotli => TileCompression::Brotli,
			PMTilesCompression::Zstd => TileCompression::Zstd,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn byte_codes() {
		assert_eq!(PMTilesCompression::from_u8(0).unwrap(), PMTilesCompression::None);
		assert_eq!(PMTilesCompression::from_u8(1).unwrap(), PMTilesCompression::Gzip);
		assert_eq!(PMTilesCompression::from_u8(2).unwrap(), PMTilesCompression::Brotli);
		assert_eq!(PMTilesCompression::from_u8(3).unwrap(), PMTilesCompression::Zstd);
		assert!(matches!(
			PMTilesCompression::from_u8(4),
			Err(TilesError::UnsupportedCompression(4))
		));
	}

	#[test]
	fn conversion_cycle() {
		for codec in [
			TileCompression::Uncompressed,
			TileCompression::Gzip,
			TileCompression::Brotli,
			TileCompression::Zstd,
		] {
			let wire = PMTilesCompression::from_value(codec);
			assert_eq!(wire.as_value(), codec);
			assert_eq!(PMTilesCompression::from_u8(wire as u8).unwrap(), wire);
		}
	}
}
