use super::area_ring;
use crate::geo::{Coordinates0, Coordinates1, Geometry};

/// Simplifies a geometry with the given tolerance (in coordinate units).
/// Points pass through. Rings that would collapse below four distinct
/// positions fall back to a vertex-count-preserving pass, then to the
/// original ring.
pub fn simplify_geometry(geometry: Geometry, tolerance: f64) -> Geometry {
	if tolerance <= 0.0 {
		return geometry;
	}
	match geometry {
		Geometry::LineString(line) => Geometry::LineString(simplify_line(&line, tolerance)),
		Geometry::MultiLineString(lines) => Geometry::MultiLineString(
			lines.iter().map(|line| simplify_line(line, tolerance)).collect(),
		),
		Geometry::Polygon(rings) => Geometry::Polygon(simplify_rings(&rings, tolerance)),
		Geometry::MultiPolygon(polygons) => Geometry::MultiPolygon(
			polygons
				.iter()
				.map(|rings| simplify_rings(rings, tolerance))
				.collect(),
		),
		Geometry::Collection(members) => Geometry::Collection(
			members
				.into_iter()
				.map(|member| simplify_geometry(member, tolerance))
				.collect(),
		),
		other => other,
	}
}

fn simplify_rings(rings: &[Coordinates1], tolerance: f64) -> Vec<Coordinates1> {
	rings.iter().map(|ring| simplify_ring(ring, tolerance)).collect()
}

/// Simplifies a closed ring, keeping it closed and valid (at least four
/// positions including the closing one, non-zero area).
pub fn simplify_ring(ring: &Coordinates1, tolerance: f64) -> Coordinates1 {
	if ring.len() <= 4 {
		return ring.clone();
	}

	for attempt_tolerance in [tolerance, 2.0 * tolerance] {
		let core = &ring[..ring.len() - 1];
		let mut simplified = simplify_line(&core.to_vec(), attempt_tolerance);
		if ring_is_valid(&simplified) {
			simplified.push(simplified[0]);
			return simplified;
		}

		// too aggressive: retry with an ordering that cannot drop below
		// three distinct positions
		let mut preserved = simplify_visvalingam(core, attempt_tolerance * attempt_tolerance, 3);
		if ring_is_valid(&preserved) {
			preserved.push(preserved[0]);
			return preserved;
		}
	}

	ring.clone()
}

fn ring_is_valid(open_ring: &Coordinates1) -> bool {
	let mut closed = open_ring.clone();
	if let Some(first) = closed.first().copied() {
		closed.push(first);
	}
	open_ring.len() >= 3 && area_ring(&closed).abs() > 0.0
}

/// Radial-distance prefilter followed by Douglas-Peucker.
pub fn simplify_line(points: &Coordinates1, tolerance: f64) -> Coordinates1 {
	if points.len() <= 2 {
		return points.clone();
	}
	let sq_tolerance = tolerance * tolerance;
	let reduced = simplify_radial_dist(points, sq_tolerance);
	if reduced.len() <= 2 {
		return reduced;
	}
	simplify_douglas_peucker(&reduced, sq_tolerance)
}

fn get_sq_dist(a: Coordinates0, b: Coordinates0) -> f64 {
	let dx = a[0] - b[0];
	let dy = a[1] - b[1];
	dx * dx + dy * dy
}

fn simplify_radial_dist(points: &Coordinates1, sq_tolerance: f64) -> Coordinates1 {
	let mut previous = points[0];
	let mut out = vec![previous];
	for &point in points.iter().skip(1) {
		if get_sq_dist(point, previous) > sq_tolerance {
			out.push(point);
			previous = point;
		}
	}
	let last = points[points.len() - 1];
	if previous != last {
		out.push(last);
	}
	out
}

/// Squared distance of `point` to the segment `a..b`.
fn get_sq_seg_dist(point: Coordinates0, a: Coordinates0, b: Coordinates0) -> f64 {
	let mut x = a[0];
	let mut y = a[1];
	let mut dx = b[0] - x;
	let mut dy = b[1] - y;

	if dx != 0.0 || dy != 0.0 {
		let t = ((point[0] - x) * dx + (point[1] - y) * dy) / (dx * dx + dy * dy);
		if t > 1.0 {
			x = b[0];
			y = b[1];
		} else if t > 0.0 {
			x += dx * t;
			y += dy * t;
		}
	}
	dx = point[0] - x;
	dy = point[1] - y;
	dx * dx + dy * dy
}

fn simplify_douglas_peucker(points: &Coordinates1, sq_tolerance: f64) -> Coordinates1 {
	let last = points.len() - 1;
	let mut simplified = vec![points[0]];
	simplify_dp_step(points, 0, last, sq_tolerance, &mut simplified);
	simplified.push(points[last]);
	simplified
}

fn simplify_dp_step(
	points: &Coordinates1,
	first: usize,
	last: usize,
	sq_tolerance: f64,
	simplified: &mut Coordinates1,
) {
	let mut max_sq_dist = sq_tolerance;
	let mut index = 0;

	for i in first + 1..last {
		let sq_dist = get_sq_seg_dist(points[i], points[first], points[last]);
		if sq_dist > max_sq_dist {
			index = i;
			max_sq_dist = sq_dist;
		}
	}

	if max_sq_dist > sq_tolerance {
		if index - first > 1 {
			simplify_dp_step(points, first, index, sq_tolerance, simplified);
		}
		simplified.push(points[index]);
		if last - index > 1 {
			simplify_dp_step(points, index, last, sq_tolerance, simplified);
		}
	}
}

/// Visvalingam-Whyatt: repeatedly removes the vertex spanning the smallest
/// triangle, but never below `min_points`. Used as the fallback when
/// Douglas-Peucker collapses a ring.
pub fn simplify_visvalingam(points: &[Coordinates0], sq_tolerance: f64, min_points: usize) -> Coordinates1 {
	let mut out: Coordinates1 = points.to_vec();
	while out.len() > min_points {
		let mut smallest = f64::INFINITY;
		let mut smallest_index = 0;
		for i in 1..out.len() - 1 {
			let doubled_area = triangle_area_doubled(out[i - 1], out[i], out[i + 1]);
			if doubled_area < smallest {
				smallest = doubled_area;
				smallest_index = i;
			}
		}
		if smallest > sq_tolerance {
			break;
		}
		out.remove(smallest_index);
	}
	out
}

fn triangle_area_doubled(a: Coordinates0, b: Coordinates0, c: Coordinates0) -> f64 {
	((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn collinear_points_are_removed() {
		let line = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
		assert_eq!(simplify_line(&line, 0.5), vec![[0.0, 0.0], [4.0, 0.0]]);
	}

	#[test]
	fn significant_corners_survive() {
		let line = vec![[0.0, 0.0], [5.0, 0.1], [10.0, 10.0], [20.0, 10.1]];
		let simplified = simplify_line(&line, 1.0);
		assert_eq!(simplified.first(), Some(&[0.0, 0.0]));
		assert_eq!(simplified.last(), Some(&[20.0, 10.1]));
		assert!(simplified.contains(&[10.0, 10.0]), "the corner must stay");
	}

	#[test]
	fn endpoints_always_stay() {
		let line = vec![[0.0, 0.0], [0.1, 0.0], [0.2, 0.0]];
		let simplified = simplify_line(&line, 10.0);
		assert_eq!(simplified, vec![[0.0, 0.0], [0.2, 0.0]]);
	}

	#[test]
	fn small_rings_pass_through() {
		let ring = vec![[0.0, 0.0], [4.0, 0.0], [0.0, 4.0], [0.0, 0.0]];
		assert_eq!(simplify_ring(&ring, 100.0), ring);
	}

	#[test]
	fn ring_stays_closed_and_valid() {
		let ring = vec![
			[0.0, 0.0],
			[10.0, 0.1],
			[20.0, 0.0],
			[20.0, 20.0],
			[10.0, 19.9],
			[0.0, 20.0],
			[0.0, 0.0],
		];
		let simplified = simplify_ring(&ring, 1.0);
		assert_eq!(simplified.first(), simplified.last());
		assert!(simplified.len() >= 4);
		assert!(area_ring(&simplified).abs() > 0.0);
		assert!(simplified.len() < ring.len(), "near-collinear vertices are dropped");
	}

	#[test]
	fn aggressive_tolerance_keeps_ring_usable() {
		let ring = vec![
			[0.0, 0.0],
			[4.0, 1.0],
			[8.0, 0.0],
			[8.0, 8.0],
			[4.0, 7.0],
			[0.0, 8.0],
			[0.0, 0.0],
		];
		// tolerance far above the ring size would collapse plain dp
		let simplified = simplify_ring(&ring, 1000.0);
		assert_eq!(simplified.first(), simplified.last());
		assert!(simplified.len() >= 4);
	}

	#[test]
	fn visvalingam_floor() {
		let points = vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0], [4.0, 0.0]];
		let reduced = simplify_visvalingam(&points, f64::INFINITY, 3);
		assert_eq!(reduced.len(), 3);
	}

	#[test]
	fn points_are_untouched() {
		let point = Geometry::new_point([5, 5]);
		assert_eq!(simplify_geometry(point.clone(), 10.0), point);
	}
}
