use crate::GeoBBox;
use std::fmt;

/// A map center: longitude, latitude (degrees) and a zoom level.
#[derive(Clone, Copy, PartialEq)]
pub struct GeoCenter(pub f64, pub f64, pub u8);

impl GeoCenter {
	/// The midpoint of a bounding box at the given zoom.
	pub fn from_bbox(bbox: &GeoBBox, zoom: u8) -> GeoCenter {
		GeoCenter((bbox.0 + bbox.2) / 2.0, (bbox.1 + bbox.3) / 2.0, zoom)
	}
}

impl fmt::Debug for GeoCenter {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GeoCenter[{}, {}, {}]", self.0, self.1, self.2)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn from_bbox_midpoint() {
		let center = GeoCenter::from_bbox(&GeoBBox(10.0, 40.0, 20.0, 50.0), 7);
		assert_eq!(center, GeoCenter(15.0, 45.0, 7));
	}
}
