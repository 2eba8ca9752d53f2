/// A single position.
pub type Coordinates0 = [f64; 2];

/// A sequence of positions: a linestring or a ring (rings carry the
/// closing duplicate of their first position).
pub type Coordinates1 = Vec<Coordinates0>;

/// A sequence of sequences: a polygon (outer ring first) or a
/// multi-linestring.
pub type Coordinates2 = Vec<Coordinates1>;

/// A sequence of polygons.
pub type Coordinates3 = Vec<Coordinates2>;

/// Anything that converts into `f64` coordinate containers. Lets tests and
/// callers write geometries with integer literals.
pub trait Convertible: Copy {
	fn convert_coordinates0(value: [Self; 2]) -> Coordinates0;

	fn convert_coordinates1(value: Vec<[Self; 2]>) -> Coordinates1 {
		value.into_iter().map(Self::convert_coordinates0).collect()
	}

	fn convert_coordinates2(value: Vec<Vec<[Self; 2]>>) -> Coordinates2 {
		value.into_iter().map(Self::convert_coordinates1).collect()
	}

	fn convert_coordinates3(value: Vec<Vec<Vec<[Self; 2]>>>) -> Coordinates3 {
		value.into_iter().map(Self::convert_coordinates2).collect()
	}
}

macro_rules! impl_convertible {
	($($t:ty),*) => {$(
		impl Convertible for $t {
			fn convert_coordinates0(value: [$t; 2]) -> Coordinates0 {
				[value[0] as f64, value[1] as f64]
			}
		}
	)*}
}
impl_convertible!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn integer_literals_convert() {
		assert_eq!(i32::convert_coordinates0([1, 2]), [1.0, 2.0]);
		assert_eq!(
			u8::convert_coordinates1(vec![[0, 1], [2, 3]]),
			vec![[0.0, 1.0], [2.0, 3.0]]
		);
	}
}
