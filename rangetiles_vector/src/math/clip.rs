use crate::geo::{Coordinates0, Coordinates1, Coordinates2, Geometry};

/// An axis-aligned clip window `[x_min, y_min, x_max, y_max]`.
pub type ClipRect = [f64; 4];

/// Clips a geometry to a rectangle.
///
/// Points are kept or dropped whole; lines are cut into parts; rings are
/// clipped with Sutherland-Hodgman. `None` means nothing is left inside.
/// If clipping produces nothing although the geometry's bounding box does
/// intersect the window, the original geometry is returned instead of
/// losing it to a degenerate intersection.
pub fn clip_geometry(geometry: Geometry, rect: &ClipRect) -> Option<Geometry> {
	let bbox = geometry.bbox()?;
	let bbox_intersects = bbox[0] <= rect[2] && bbox[2] >= rect[0] && bbox[1] <= rect[3] && bbox[3] >= rect[1];
	if !bbox_intersects {
		return None;
	}

	let clipped = clip_inner(geometry.clone(), rect);
	if clipped.is_none() {
		return Some(geometry);
	}
	clipped
}

fn clip_inner(geometry: Geometry, rect: &ClipRect) -> Option<Geometry> {
	match geometry {
		Geometry::Point(position) => contains(rect, &position).then_some(Geometry::Point(position)),
		Geometry::MultiPoint(positions) => {
			let kept: Coordinates1 = positions.into_iter().filter(|p| contains(rect, p)).collect();
			if kept.is_empty() { None } else { Some(Geometry::MultiPoint(kept)) }
		}
		Geometry::LineString(line) => {
			let mut parts = clip_line(&line, rect);
			match parts.len() {
				0 => None,
				1 => Some(Geometry::LineString(parts.pop().unwrap())),
				_ => Some(Geometry::MultiLineString(parts)),
			}
		}
		Geometry::MultiLineString(lines) => {
			let parts: Coordinates2 = lines.iter().flat_map(|line| clip_line(line, rect)).collect();
			if parts.is_empty() {
				None
			} else {
				Some(Geometry::MultiLineString(parts))
			}
		}
		Geometry::Polygon(rings) => clip_polygon(&rings, rect).map(Geometry::Polygon),
		Geometry::MultiPolygon(polygons) => {
			let kept: Vec<Coordinates2> = polygons
				.iter()
				.filter_map(|rings| clip_polygon(rings, rect))
				.collect();
			if kept.is_empty() {
				None
			} else {
				Some(Geometry::MultiPolygon(kept))
			}
		}
		Geometry::Collection(members) => {
			let kept: Vec<Geometry> = members
				.into_iter()
				.filter_map(|member| clip_inner(member, rect))
				.collect();
			if kept.is_empty() {
				None
			} else {
				Some(Geometry::Collection(kept))
			}
		}
	}
}

fn contains(rect: &ClipRect, position: &Coordinates0) -> bool {
	position[0] >= rect[0] && position[0] <= rect[2] && position[1] >= rect[1] && position[1] <= rect[3]
}

/// Liang-Barsky clip of one segment; returns the clipped pair, or `None`
/// if the segment misses the window.
fn clip_segment(a: Coordinates0, b: Coordinates0, rect: &ClipRect) -> Option<(Coordinates0, Coordinates0)> {
	let dx = b[0] - a[0];
	let dy = b[1] - a[1];
	let mut t0 = 0.0f64;
	let mut t1 = 1.0f64;

	for (p, q) in [
		(-dx, a[0] - rect[0]),
		(dx, rect[2] - a[0]),
		(-dy, a[1] - rect[1]),
		(dy, rect[3] - a[1]),
	] {
		if p == 0.0 {
			if q < 0.0 {
				return None;
			}
		} else {
			let r = q / p;
			if p < 0.0 {
				if r > t1 {
					return None;
				}
				t0 = t0.max(r);
			} else {
				if r < t0 {
					return None;
				}
				t1 = t1.min(r);
			}
		}
	}

	Some(([a[0] + t0 * dx, a[1] + t0 * dy], [a[0] + t1 * dx, a[1] + t1 * dy]))
}

/// Clips a line into the parts inside the window.
pub fn clip_line(line: &Coordinates1, rect: &ClipRect) -> Coordinates2 {
	let mut parts: Coordinates2 = Vec::new();
	let mut current: Coordinates1 = Vec::new();

	for pair in line.windows(2) {
		match clip_segment(pair[0], pair[1], rect) {
			None => {
				if current.len() >= 2 {
					parts.push(std::mem::take(&mut current));
				} else {
					current.clear();
				}
			}
			Some((from, to)) => {
				if current.last() != Some(&from) {
					if current.len() >= 2 {
						parts.push(std::mem::take(&mut current));
					} else {
						current.clear();
					}
					current.push(from);
				}
				current.push(to);
			}
		}
	}
	if current.len() >= 2 {
		parts.push(current);
	}
	parts
}

/// Sutherland-Hodgman clip of one closed ring against the window. The
/// result is closed again; fewer than four positions means the ring
/// degenerated.
pub fn clip_ring(ring: &Coordinates1, rect: &ClipRect) -> Option<Coordinates1> {
	// edges: (axis, bound, keep_if_less)
	let edges = [
		(0usize, rect[0], false),
		(0, rect[2], true),
		(1, rect[1], false),
		(1, rect[3], true),
	];

	let mut current: Coordinates1 = if ring.first() == ring.last() && ring.len() > 1 {
		ring[..ring.len() - 1].to_vec()
	} else {
		ring.clone()
	};

	for (axis, bound, keep_less) in edges {
		if current.is_empty() {
			return None;
		}
		let inside = |p: &Coordinates0| {
			if keep_less { p[axis] <= bound } else { p[axis] >= bound }
		};
		let mut next: Coordinates1 = Vec::with_capacity(current.len() + 4);
		for i in 0..current.len() {
			let a = current[i];
			let b = current[(i + 1) % current.len()];
			let a_in = inside(&a);
			let b_in = inside(&b);
			if a_in {
				next.push(a);
			}
			if a_in != b_in {
				let t = (bound - a[axis]) / (b[axis] - a[axis]);
				let mut crossing = [0.0, 0.0];
				crossing[axis] = bound;
				crossing[1 - axis] = a[1 - axis] + t * (b[1 - axis] - a[1 - axis]);
				next.push(crossing);
			}
		}
		current = next;
	}

	current.dedup();
	if current.len() < 3 {
		return None;
	}
	current.push(current[0]);
	Some(current)
}

fn clip_polygon(rings: &Coordinates2, rect: &ClipRect) -> Option<Coordinates2> {
	let mut clipped: Coordinates2 = Vec::new();
	for (i, ring) in rings.iter().enumerate() {
		match clip_ring(ring, rect) {
			Some(result) => clipped.push(result),
			None if i == 0 => return None,
			None => (),
		}
	}
	Some(clipped)
}
