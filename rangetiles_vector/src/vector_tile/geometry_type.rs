use crate::geo::Geometry;

/// Geometry type of a feature on the wire.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GeomType {
	#[default]
	Unknown = 0,
	Point = 1,
	LineString = 2,
	Polygon = 3,
}

impl GeomType {
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}
}

impl From<u64> for GeomType {
	fn from(value: u64) -> Self {
		match value {
			1 => GeomType::Point,
			2 => GeomType::LineString,
			3 => GeomType::Polygon,
			_ => GeomType::Unknown,
		}
	}
}

impl From<&Geometry> for GeomType {
	fn from(geometry: &Geometry) -> Self {
		match geometry {
			Geometry::Point(_) | Geometry::MultiPoint(_) => GeomType::Point,
			Geometry::LineString(_) | Geometry::MultiLineString(_) => GeomType::LineString,
			Geometry::Polygon(_) | Geometry::MultiPolygon(_) => GeomType::Polygon,
			Geometry::Collection(_) => GeomType::Unknown,
		}
	}
}
