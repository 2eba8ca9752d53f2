use crate::{GeoBBox, Result, TilesError};
use std::f64::consts::PI;
use std::fmt::{self, Debug};

/// Highest zoom level addressable by a 64-bit tile id.
pub const MAX_ZOOM_LEVEL: u8 = 26;

/// A tile coordinate in a Web Mercator pyramid: zoom level `z` and XYZ tile
/// indices `x`, `y` (origin top-left, y grows southward).
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct TileCoord {
	pub z: u8,
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	/// Creates a coordinate, validating `z <= 26` and `x, y < 2^z`.
	pub fn new(z: u8, x: u32, y: u32) -> Result<TileCoord> {
		if z > MAX_ZOOM_LEVEL {
			return Err(TilesError::InvalidCoord { z, x, y });
		}
		let max = 1u32 << z;
		if x >= max || y >= max {
			return Err(TilesError::InvalidCoord { z, x, y });
		}
		Ok(TileCoord { z, x, y })
	}

	/// The same tile addressed with a TMS-style (bottom-left origin) y axis.
	/// The archive core is strictly XYZ; this transform belongs to callers.
	pub fn flip_y(&self) -> TileCoord {
		TileCoord {
			z: self.z,
			x: self.x,
			y: (1u32 << self.z) - 1 - self.y,
		}
	}

	/// Longitude/latitude of the north-west corner of the tile.
	pub fn as_geo(&self) -> [f64; 2] {
		let scale = f64::from(1u32 << self.z);
		[
			(f64::from(self.x) / scale - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * f64::from(self.y) / scale)).exp().atan() / PI - 0.25) * 360.0,
		]
	}

	/// Geographic extent covered by the tile.
	pub fn as_geo_bbox(&self) -> GeoBBox {
		let nw = self.as_geo();
		let se = TileCoord {
			z: self.z,
			x: self.x + 1,
			y: self.y + 1,
		}
		.as_geo();
		GeoBBox(nw[0], se[1], se[0], nw[1])
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.z, self.x, self.y)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn validation() {
		assert!(TileCoord::new(0, 0, 0).is_ok());
		assert!(TileCoord::new(26, (1 << 26) - 1, 0).is_ok());
		assert!(TileCoord::new(27, 0, 0).is_err());
		assert!(TileCoord::new(3, 8, 0).is_err());
		assert!(TileCoord::new(3, 0, 8).is_err());
	}

	#[test]
	fn flip_y_is_an_involution() {
		let coord = TileCoord::new(5, 11, 3).unwrap();
		assert_eq!(coord.flip_y().y, 28);
		assert_eq!(coord.flip_y().flip_y(), coord);
	}

	#[test]
	fn geo_corners() {
		let coord = TileCoord::new(0, 0, 0).unwrap();
		let bbox = coord.as_geo_bbox();
		assert!((bbox.0 + 180.0).abs() < 1e-9);
		assert!((bbox.2 - 180.0).abs() < 1e-9);
		assert!((bbox.3 - 85.0511).abs() < 0.001);
		assert!((bbox.1 + 85.0511).abs() < 0.001);
	}

	#[test]
	fn debug_format() {
		assert_eq!(format!("{:?}", TileCoord::new(3, 1, 2).unwrap()), "TileCoord(3, [1, 2])");
	}
}
