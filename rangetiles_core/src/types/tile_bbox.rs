use crate::{Result, TileCoord, TilesError};
use std::fmt::{self, Debug};

/// A contiguous, inclusive rectangle of tiles on one zoom level.
#[derive(Clone, Copy, Eq, PartialEq)]
pub struct TileBBox {
	pub level: u8,
	pub x_min: u32,
	pub y_min: u32,
	pub x_max: u32,
	pub y_max: u32,
}

impl TileBBox {
	pub fn new(level: u8, x_min: u32, y_min: u32, x_max: u32, y_max: u32) -> Result<TileBBox> {
		let max = 1u32 << level;
		if level > crate::MAX_ZOOM_LEVEL || x_max >= max || y_max >= max || x_min > x_max || y_min > y_max {
			return Err(TilesError::InvalidCoord {
				z: level,
				x: x_max,
				y: y_max,
			});
		}
		Ok(TileBBox {
			level,
			x_min,
			y_min,
			x_max,
			y_max,
		})
	}

	/// The full tile grid at `level`.
	pub fn new_full(level: u8) -> Result<TileBBox> {
		let max = (1u32 << level) - 1;
		TileBBox::new(level, 0, 0, max, max)
	}

	pub fn from_coord(coord: &TileCoord) -> TileBBox {
		TileBBox {
			level: coord.z,
			x_min: coord.x,
			y_min: coord.y,
			x_max: coord.x,
			y_max: coord.y,
		}
	}

	pub fn count_tiles(&self) -> u64 {
		u64::from(self.x_max - self.x_min + 1) * u64::from(self.y_max - self.y_min + 1)
	}

	pub fn contains(&self, coord: &TileCoord) -> bool {
		coord.z == self.level
			&& coord.x >= self.x_min
			&& coord.x <= self.x_max
			&& coord.y >= self.y_min
			&& coord.y <= self.y_max
	}

	/// Grows the box so that `coord` is inside. The coordinate must be on the
	/// same zoom level.
	pub fn include_coord(&mut self, coord: &TileCoord) {
		debug_assert_eq!(coord.z, self.level);
		self.x_min = self.x_min.min(coord.x);
		self.y_min = self.y_min.min(coord.y);
		self.x_max = self.x_max.max(coord.x);
		self.y_max = self.y_max.max(coord.y);
	}

	/// Row-major iteration over all contained coordinates.
	pub fn iter_coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
		let level = self.level;
		(self.y_min..=self.y_max)
			.flat_map(move |y| (self.x_min..=self.x_max).map(move |x| TileCoord { z: level, x, y }))
	}
}

impl Debug for TileBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}: [{},{},{},{}] ({})",
			self.level,
			self.x_min,
			self.y_min,
			self.x_max,
			self.y_max,
			self.count_tiles()
		)
	}
}
