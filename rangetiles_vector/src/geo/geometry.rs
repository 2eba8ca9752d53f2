use super::{Convertible, Coordinates0, Coordinates1, Coordinates2, Coordinates3};
use std::fmt::{self, Debug};

/// A geometry in tile (extent) coordinates.
///
/// Rings of polygons carry the closing duplicate of their first position;
/// the wire codec drops and restores it around `ClosePath`.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(Coordinates0),
	LineString(Coordinates1),
	Polygon(Coordinates2),
	MultiPoint(Coordinates1),
	MultiLineString(Coordinates2),
	MultiPolygon(Coordinates3),
	/// A heterogeneous collection; the layer builder explodes these into
	/// one feature per member.
	Collection(Vec<Geometry>),
}

impl Geometry {
	pub fn new_point<T: Convertible>(value: [T; 2]) -> Self {
		Self::Point(T::convert_coordinates0(value))
	}

	pub fn new_line_string<T: Convertible>(value: Vec<[T; 2]>) -> Self {
		Self::LineString(T::convert_coordinates1(value))
	}

	pub fn new_polygon<T: Convertible>(value: Vec<Vec<[T; 2]>>) -> Self {
		Self::Polygon(T::convert_coordinates2(value))
	}

	pub fn new_multi_point<T: Convertible>(value: Vec<[T; 2]>) -> Self {
		Self::MultiPoint(T::convert_coordinates1(value))
	}

	pub fn new_multi_line_string<T: Convertible>(value: Vec<Vec<[T; 2]>>) -> Self {
		Self::MultiLineString(T::convert_coordinates2(value))
	}

	pub fn new_multi_polygon<T: Convertible>(value: Vec<Vec<Vec<[T; 2]>>>) -> Self {
		Self::MultiPolygon(T::convert_coordinates3(value))
	}

	pub fn get_type_name(&self) -> &'static str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::MultiPolygon(_) => "MultiPolygon",
			Geometry::Collection(_) => "GeometryCollection",
		}
	}

	/// Lifts single geometries into their multi variant; multis and
	/// collections pass through.
	pub fn into_multi(self) -> Self {
		match self {
			Geometry::Point(g) => Geometry::MultiPoint(vec![g]),
			Geometry::LineString(g) => Geometry::MultiLineString(vec![g]),
			Geometry::Polygon(g) => Geometry::MultiPolygon(vec![g]),
			other => other,
		}
	}

	/// Bounding box `[x_min, y_min, x_max, y_max]`, `None` for empty
	/// geometries.
	pub fn bbox(&self) -> Option<[f64; 4]> {
		let mut bounds: Option<[f64; 4]> = None;
		self.for_each_position(&mut |position| {
			bounds = Some(match bounds {
				None => [position[0], position[1], position[0], position[1]],
				Some(b) => [
					b[0].min(position[0]),
					b[1].min(position[1]),
					b[2].max(position[0]),
					b[3].max(position[1]),
				],
			});
		});
		bounds
	}

	fn for_each_position(&self, callback: &mut dyn FnMut(&Coordinates0)) {
		match self {
			Geometry::Point(g) => callback(g),
			Geometry::LineString(g) | Geometry::MultiPoint(g) => g.iter().for_each(&mut *callback),
			Geometry::Polygon(g) | Geometry::MultiLineString(g) => {
				g.iter().flatten().for_each(&mut *callback)
			}
			Geometry::MultiPolygon(g) => g.iter().flatten().flatten().for_each(&mut *callback),
			Geometry::Collection(members) => {
				for member in members {
					member.for_each_position(callback);
				}
			}
		}
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let inner: &dyn Debug = match self {
			Geometry::Point(g) => g,
			Geometry::LineString(g) => g,
			Geometry::Polygon(g) => g,
			Geometry::MultiPoint(g) => g,
			Geometry::MultiLineString(g) => g,
			Geometry::MultiPolygon(g) => g,
			Geometry::Collection(g) => g,
		};
		f.debug_tuple(self.get_type_name()).field(inner).finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn into_multi_lifts_singles() {
		assert_eq!(
			Geometry::new_point([1, 2]).into_multi(),
			Geometry::new_multi_point(vec![[1, 2]])
		);
		assert_eq!(
			Geometry::new_line_string(vec![[0, 0], [1, 1]]).into_multi(),
			Geometry::new_multi_line_string(vec![vec![[0, 0], [1, 1]]])
		);
		let multi = Geometry::new_multi_point(vec![[1, 2]]);
		assert_eq!(multi.clone().into_multi(), multi);
	}

	#[test]
	fn bbox_spans_all_members() {
		let collection = Geometry::Collection(vec![
			Geometry::new_point([10, 20]),
			Geometry::new_line_string(vec![[-5, 0], [3, 40]]),
		]);
		assert_eq!(collection.bbox(), Some([-5.0, 0.0, 10.0, 40.0]));
		assert_eq!(Geometry::MultiPoint(vec![]).bbox(), None);
	}

	#[test]
	fn debug_shows_type() {
		assert_eq!(format!("{:?}", Geometry::new_point([1, 2])), "Point([1.0, 2.0])");
	}
}
