use crate::{Result, TilesError};
use std::fmt;

/// A geographic bounding box in degrees: `(west, south, east, north)`.
#[derive(Clone, Copy, PartialEq)]
pub struct GeoBBox(pub f64, pub f64, pub f64, pub f64);

impl GeoBBox {
	/// The full Web Mercator world extent.
	pub fn world() -> GeoBBox {
		GeoBBox(-180.0, -85.051129, 180.0, 85.051129)
	}

	/// Validates coordinate ranges and west/east, south/north ordering.
	pub fn check(&self) -> Result<()> {
		let ok = self.0 >= -180.0
			&& self.2 <= 180.0
			&& self.1 >= -90.0
			&& self.3 <= 90.0
			&& self.0 <= self.2
			&& self.1 <= self.3;
		if ok {
			Ok(())
		} else {
			Err(TilesError::InvalidHeader(format!("invalid bounding box {self:?}")))
		}
	}

	/// Grows this bbox to include `other`.
	pub fn extend(&mut self, other: &GeoBBox) {
		self.0 = self.0.min(other.0);
		self.1 = self.1.min(other.1);
		self.2 = self.2.max(other.2);
		self.3 = self.3.max(other.3);
	}

	/// Degrees scaled by 1e7, the header's fixed-point representation.
	pub fn as_e7(&self) -> [i32; 4] {
		[
			(self.0 * 1e7) as i32,
			(self.1 * 1e7) as i32,
			(self.2 * 1e7) as i32,
			(self.3 * 1e7) as i32,
		]
	}

	pub fn from_e7(values: [i32; 4]) -> GeoBBox {
		GeoBBox(
			f64::from(values[0]) / 1e7,
			f64::from(values[1]) / 1e7,
			f64::from(values[2]) / 1e7,
			f64::from(values[3]) / 1e7,
		)
	}
}

impl fmt::Debug for GeoBBox {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "GeoBBox[{}, {}, {}, {}]", self.0, self.1, self.2, self.3)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn check_ranges() {
		assert!(GeoBBox::world().check().is_ok());
		assert!(GeoBBox(13.1, 52.3, 13.8, 52.7).check().is_ok());
		assert!(GeoBBox(-190.0, 0.0, 0.0, 0.0).check().is_err());
		assert!(GeoBBox(10.0, 0.0, 5.0, 0.0).check().is_err());
	}

	#[test]
	fn e7_round_trip() {
		let bbox = GeoBBox(13.0828, 52.3344, 13.7622, 52.6783);
		let restored = GeoBBox::from_e7(bbox.as_e7());
		assert!((restored.0 - bbox.0).abs() < 1e-6);
		assert!((restored.3 - bbox.3).abs() < 1e-6);
	}

	#[test]
	fn extend_grows() {
		let mut bbox = GeoBBox(0.0, 0.0, 1.0, 1.0);
		bbox.extend(&GeoBBox(-1.0, 0.5, 0.5, 2.0));
		assert_eq!(bbox, GeoBBox(-1.0, 0.0, 1.0, 2.0));
	}
}
