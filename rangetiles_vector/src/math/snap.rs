use crate::geo::{Coordinates1, Coordinates2, Geometry};

/// Snaps all coordinates to the integer grid and drops everything that
/// degenerates: repeated positions are merged, lines need two positions,
/// rings four (including the closing one). `None` means nothing usable is
/// left.
pub fn snap_to_grid(geometry: Geometry) -> Option<Geometry> {
	match geometry {
		Geometry::Point(p) => Some(Geometry::Point([p[0].round(), p[1].round()])),
		Geometry::MultiPoint(points) => {
			let mut snapped: Coordinates1 = points.iter().map(|p| [p[0].round(), p[1].round()]).collect();
			snapped.dedup();
			if snapped.is_empty() {
				None
			} else {
				Some(Geometry::MultiPoint(snapped))
			}
		}
		Geometry::LineString(line) => snap_line(&line).map(Geometry::LineString),
		Geometry::MultiLineString(lines) => {
			let snapped: Coordinates2 = lines.iter().filter_map(|line| snap_line(line)).collect();
			if snapped.is_empty() {
				None
			} else {
				Some(Geometry::MultiLineString(snapped))
			}
		}
		Geometry::Polygon(rings) => snap_rings(&rings).map(Geometry::Polygon),
		Geometry::MultiPolygon(polygons) => {
			let snapped: Vec<Coordinates2> = polygons.iter().filter_map(|rings| snap_rings(rings)).collect();
			if snapped.is_empty() {
				None
			} else {
				Some(Geometry::MultiPolygon(snapped))
			}
		}
		Geometry::Collection(members) => {
			let snapped: Vec<Geometry> = members.into_iter().filter_map(snap_to_grid).collect();
			if snapped.is_empty() {
				None
			} else {
				Some(Geometry::Collection(snapped))
			}
		}
	}
}

fn snap_line(line: &Coordinates1) -> Option<Coordinates1> {
	let mut snapped: Coordinates1 = line.iter().map(|p| [p[0].round(), p[1].round()]).collect();
	snapped.dedup();
	if snapped.len() < 2 { None } else { Some(snapped) }
}

/// Snaps the rings of one polygon. A collapsed outer ring drops the whole
/// polygon, collapsed holes are removed.
fn snap_rings(rings: &Coordinates2) -> Option<Coordinates2> {
	let mut snapped: Coordinates2 = Vec::with_capacity(rings.len());
	for (i, ring) in rings.iter().enumerate() {
		match snap_ring(ring) {
			Some(result) => snapped.push(result),
			None if i == 0 => return None,
			None => (),
		}
	}
	Some(snapped)
}

fn snap_ring(ring: &Coordinates1) -> Option<Coordinates1> {
	let mut snapped: Coordinates1 = ring.iter().map(|p| [p[0].round(), p[1].round()]).collect();
	snapped.dedup();
	// reclose after dedup
	if snapped.first() != snapped.last() {
		if let Some(first) = snapped.first().copied() {
			snapped.push(first);
		}
	}
	if snapped.len() < 4 { None } else { Some(snapped) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rounding_and_dedup() {
		let line = Geometry::new_line_string(vec![[0.4, 0.4], [0.6, 0.4], [5.0, 5.0]]);
		assert_eq!(
			snap_to_grid(line),
			Some(Geometry::new_line_string(vec![[0.0, 0.0], [1.0, 0.0], [5.0, 5.0]]))
		);
	}

	#[test]
	fn collapsed_line_is_dropped() {
		let line = Geometry::new_line_string(vec![[0.1, 0.1], [0.2, 0.2], [0.3, 0.1]]);
		assert_eq!(snap_to_grid(line), None);
	}

	#[test]
	fn collapsed_outer_ring_drops_the_polygon() {
		let polygon = Geometry::new_polygon(vec![vec![
			[0.1, 0.1],
			[0.2, 0.1],
			[0.2, 0.2],
			[0.1, 0.1],
		]]);
		assert_eq!(snap_to_grid(polygon), None);
	}

	#[test]
	fn collapsed_hole_is_removed() {
		let polygon = Geometry::new_polygon(vec![
			vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0], [0.0, 0.0]],
			vec![[5.0, 5.0], [5.1, 5.0], [5.1, 5.1], [5.0, 5.0]],
		]);
		match snap_to_grid(polygon).unwrap() {
			Geometry::Polygon(rings) => assert_eq!(rings.len(), 1),
			other => panic!("expected a Polygon, got {other:?}"),
		}
	}

	#[test]
	fn point_always_survives() {
		assert_eq!(
			snap_to_grid(Geometry::new_point([1.4, 1.6])),
			Some(Geometry::new_point([1.0, 2.0]))
		);
	}
}
