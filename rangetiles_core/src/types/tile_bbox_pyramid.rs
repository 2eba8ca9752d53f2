use crate::{GeoBBox, MAX_ZOOM_LEVEL, TileBBox, TileCoord};
use std::fmt::{self, Debug};

/// A sparse tile coverage across zoom levels: at most one bounding box per
/// level 0..=26. Readers derive it from their directories; the `join` tool
/// and header assembly consume it.
#[derive(Clone, PartialEq)]
pub struct TileBBoxPyramid {
	levels: [Option<TileBBox>; MAX_ZOOM_LEVEL as usize + 1],
}

impl TileBBoxPyramid {
	pub fn new_empty() -> TileBBoxPyramid {
		TileBBoxPyramid {
			levels: [None; MAX_ZOOM_LEVEL as usize + 1],
		}
	}

	pub fn is_empty(&self) -> bool {
		self.levels.iter().all(Option::is_none)
	}

	pub fn get_level(&self, level: u8) -> Option<&TileBBox> {
		self.levels.get(level as usize).and_then(Option::as_ref)
	}

	pub fn include_coord(&mut self, coord: &TileCoord) {
		match &mut self.levels[coord.z as usize] {
			Some(bbox) => bbox.include_coord(coord),
			slot => *slot = Some(TileBBox::from_coord(coord)),
		}
	}

	pub fn include_bbox(&mut self, other: &TileBBox) {
		match &mut self.levels[other.level as usize] {
			Some(bbox) => {
				bbox.x_min = bbox.x_min.min(other.x_min);
				bbox.y_min = bbox.y_min.min(other.y_min);
				bbox.x_max = bbox.x_max.max(other.x_max);
				bbox.y_max = bbox.y_max.max(other.y_max);
			}
			slot => *slot = Some(*other),
		}
	}

	pub fn get_level_min(&self) -> Option<u8> {
		self.levels.iter().position(Option::is_some).map(|i| i as u8)
	}

	pub fn get_level_max(&self) -> Option<u8> {
		self.levels.iter().rposition(Option::is_some).map(|i| i as u8)
	}

	pub fn count_tiles(&self) -> u64 {
		self.levels.iter().flatten().map(TileBBox::count_tiles).sum()
	}

	/// Geographic extent of the most detailed populated level.
	pub fn get_geo_bbox(&self) -> Option<GeoBBox> {
		let bbox = self.levels.iter().flatten().next_back()?;
		let mut geo = TileCoord {
			z: bbox.level,
			x: bbox.x_min,
			y: bbox.y_min,
		}
		.as_geo_bbox();
		geo.extend(
			&TileCoord {
				z: bbox.level,
				x: bbox.x_max,
				y: bbox.y_max,
			}
			.as_geo_bbox(),
		);
		Some(geo)
	}

	pub fn iter_levels(&self) -> impl Iterator<Item = &TileBBox> + '_ {
		self.levels.iter().flatten()
	}
}

impl Default for TileBBoxPyramid {
	fn default() -> Self {
		Self::new_empty()
	}
}

impl Debug for TileBBoxPyramid {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.iter_levels()).finish()
	}
}
