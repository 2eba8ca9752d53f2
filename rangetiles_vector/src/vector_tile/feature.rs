use super::{GeomType, VectorTileLayer};
use crate::geo::{Coordinates1, Coordinates2, Coordinates3, GeoFeature, Geometry};
use crate::math::area_ring;
use byteorder::LE;
use rangetiles_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
use rangetiles_core::{Blob, Result, TilesError};

const CMD_MOVE_TO: u64 = 1;
const CMD_LINE_TO: u64 = 2;
const CMD_CLOSE_PATH: u64 = 7;

/// Rings with less doubled area than this are treated as degenerate.
const AREA_EPSILON: f64 = 1e-14;

/// A feature as stored on the wire: tag indices into the layer tables and
/// the raw geometry command stream.
///
/// Geometry and attributes are decoded on access; the blob itself is what
/// travels through archives, so keeping it raw makes pass-through cheap.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Blob,
}

impl VectorTileFeature {
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileFeature> {
		let mut feature = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key()? {
				(1, 0) => feature.id = Some(reader.read_varint()?),
				(2, 2) => feature.tag_ids = reader.read_pbf_packed_uint32()?,
				(3, 0) => feature.geom_type = GeomType::from(reader.read_varint()?),
				(4, 2) => feature.geom_data = reader.read_pbf_blob()?,
				(f, w) => {
					return Err(TilesError::MalformedVectorTile(format!(
						"unexpected feature field {f} with wire type {w}"
					)));
				}
			}
		}

		Ok(feature)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0)?;
			writer.write_varint(id)?;
		}
		if !self.tag_ids.is_empty() {
			writer.write_pbf_key(2, 2)?;
			writer.write_pbf_packed_uint32(&self.tag_ids)?;
		}
		writer.write_pbf_key(3, 0)?;
		writer.write_varint(self.geom_type.as_u64())?;
		if !self.geom_data.is_empty() {
			writer.write_pbf_key(4, 2)?;
			writer.write_pbf_blob(&self.geom_data)?;
		}

		Ok(writer.into_blob())
	}

	/// Decodes the command stream into a geometry.
	///
	/// `MoveTo` starts a part, `LineTo` extends it, `ClosePath` restores
	/// the first position of a ring. A single part maps to the narrow type
	/// (`Point`, `LineString`, `Polygon`); several parts to the multi
	/// variant; polygon rings are grouped by winding.
	pub fn to_geometry(&self) -> Result<Geometry> {
		let parts = self.decode_parts()?;

		match self.geom_type {
			GeomType::Unknown => Err(TilesError::MalformedVectorTile(
				"feature has unknown geometry type".to_string(),
			)),

			GeomType::Point => {
				let mut points: Coordinates1 = Vec::with_capacity(parts.len());
				for part in parts {
					if part.len() != 1 {
						return Err(TilesError::MalformedVectorTile(
							"point features take exactly one position per part".to_string(),
						));
					}
					points.extend(part);
				}
				match points.len() {
					0 => Err(TilesError::MalformedVectorTile("point feature without positions".to_string())),
					1 => Ok(Geometry::Point(points[0])),
					_ => Ok(Geometry::MultiPoint(points)),
				}
			}

			GeomType::LineString => {
				for part in &parts {
					if part.len() < 2 {
						return Err(TilesError::MalformedVectorTile(
							"linestring parts need at least two positions".to_string(),
						));
					}
				}
				let mut parts = parts;
				match parts.len() {
					0 => Err(TilesError::MalformedVectorTile("linestring feature without parts".to_string())),
					1 => Ok(Geometry::LineString(parts.pop().unwrap())),
					_ => Ok(Geometry::MultiLineString(parts)),
				}
			}

			GeomType::Polygon => {
				let mut polygons: Coordinates3 = Vec::new();
				for ring in parts {
					if ring.len() < 4 || ring.first() != ring.last() {
						return Err(TilesError::MalformedVectorTile(
							"polygon rings need at least four positions and must close".to_string(),
						));
					}
					let area = area_ring(&ring);
					if area > AREA_EPSILON {
						polygons.push(vec![ring]);
					} else if area < -AREA_EPSILON {
						match polygons.last_mut() {
							Some(polygon) => polygon.push(ring),
							None => log::trace!("dropping hole without a preceding exterior ring"),
						}
					} else {
						log::trace!("dropping ring with zero area");
					}
				}
				match polygons.len() {
					0 => Err(TilesError::MalformedVectorTile("polygon feature without usable rings".to_string())),
					1 => Ok(Geometry::Polygon(polygons.pop().unwrap())),
					_ => Ok(Geometry::MultiPolygon(polygons)),
				}
			}
		}
	}

	/// Runs the cursor over the command stream and collects the parts.
	fn decode_parts(&self) -> Result<Coordinates2> {
		let mut reader = ValueReaderSlice::new_le(self.geom_data.as_slice());

		let mut parts: Coordinates2 = Vec::new();
		let mut part: Coordinates1 = Vec::new();
		let mut x: i64 = 0;
		let mut y: i64 = 0;

		while reader.has_remaining() {
			let value = reader.read_varint()?;
			let command = value & 0x7;
			let count = value >> 3;

			match command {
				CMD_MOVE_TO | CMD_LINE_TO => {
					for _ in 0..count {
						if command == CMD_MOVE_TO && !part.is_empty() {
							parts.push(std::mem::take(&mut part));
						}
						x += reader.read_svarint()?;
						y += reader.read_svarint()?;
						part.push([x as f64, y as f64]);
					}
				}
				CMD_CLOSE_PATH => {
					if part.is_empty() {
						return Err(TilesError::MalformedVectorTile(
							"ClosePath on an empty part".to_string(),
						));
					}
					part.push(part[0]);
				}
				_ => {
					return Err(TilesError::MalformedVectorTile(format!(
						"unknown geometry command {command}"
					)));
				}
			}
		}

		if !part.is_empty() {
			parts.push(part);
		}
		Ok(parts)
	}

	pub fn decode_properties(&self, layer: &VectorTileLayer) -> Result<crate::geo::GeoProperties> {
		layer.property_manager.decode_tag_ids(&self.tag_ids)
	}

	/// Decodes into a full feature, optionally passing the geometry through
	/// `transform` (e.g. to shift tile-extent coordinates into world
	/// coordinates).
	pub fn to_feature(
		&self,
		layer: &VectorTileLayer,
		transform: Option<&dyn Fn(Geometry) -> Geometry>,
	) -> Result<GeoFeature> {
		let mut geometry = self.to_geometry()?;
		if let Some(transform) = transform {
			geometry = transform(geometry);
		}
		let mut feature = GeoFeature::new(geometry);
		feature.id = self.id;
		feature.properties = self.decode_properties(layer)?;
		Ok(feature)
	}

	/// Encodes a geometry into the command stream.
	///
	/// The cursor persists across parts; ring winding is normalized
	/// (exterior positive, holes negative) and the closing vertex of each
	/// ring is left to `ClosePath`.
	pub fn from_geometry(id: Option<u64>, tag_ids: Vec<u32>, geometry: Geometry) -> Result<VectorTileFeature> {
		let geom_type = GeomType::from(&geometry);
		let mut writer = ValueWriterBlob::new_le();
		let cursor = &mut (0i64, 0i64);

		match geometry.into_multi() {
			Geometry::MultiPoint(points) => write_points(&mut writer, cursor, &points)?,
			Geometry::MultiLineString(lines) => write_line_strings(&mut writer, cursor, &lines)?,
			Geometry::MultiPolygon(polygons) => write_polygons(&mut writer, cursor, polygons)?,
			Geometry::Collection(_) => {
				return Err(TilesError::InvalidGeometry(
					"geometry collections must be exploded before encoding".to_string(),
				));
			}
			_ => unreachable!("into_multi lifts all single geometries"),
		}

		Ok(VectorTileFeature {
			id,
			tag_ids,
			geom_type,
			geom_data: writer.into_blob(),
		})
	}
}

fn write_position(
	writer: &mut ValueWriterBlob<LE>,
	cursor: &mut (i64, i64),
	position: &[f64; 2],
) -> Result<()> {
	let x = position[0].round() as i64;
	let y = position[1].round() as i64;
	writer.write_svarint(x - cursor.0)?;
	writer.write_svarint(y - cursor.1)?;
	*cursor = (x, y);
	Ok(())
}

fn command(id: u64, count: u64) -> u64 {
	(count << 3) | id
}

fn write_points(writer: &mut ValueWriterBlob<LE>, cursor: &mut (i64, i64), points: &Coordinates1) -> Result<()> {
	writer.write_varint(command(CMD_MOVE_TO, points.len() as u64))?;
	for point in points {
		write_position(writer, cursor, point)?;
	}
	Ok(())
}

fn write_line_strings(
	writer: &mut ValueWriterBlob<LE>,
	cursor: &mut (i64, i64),
	lines: &Coordinates2,
) -> Result<()> {
	for line in lines {
		if line.len() < 2 {
			continue;
		}
		writer.write_varint(command(CMD_MOVE_TO, 1))?;
		write_position(writer, cursor, &line[0])?;
		writer.write_varint(command(CMD_LINE_TO, line.len() as u64 - 1))?;
		for position in &line[1..] {
			write_position(writer, cursor, position)?;
		}
	}
	Ok(())
}

fn write_polygons(
	writer: &mut ValueWriterBlob<LE>,
	cursor: &mut (i64, i64),
	polygons: Coordinates3,
) -> Result<()> {
	for polygon in polygons {
		for (ring_index, mut ring) in polygon.into_iter().enumerate() {
			if ring.len() < 4 {
				continue;
			}

			// exterior rings wind positive, holes negative
			let area = area_ring(&ring);
			let exterior = ring_index == 0;
			if (exterior && area < 0.0) || (!exterior && area > 0.0) {
				ring.reverse();
			}

			// ClosePath restores the final vertex
			ring.pop();

			writer.write_varint(command(CMD_MOVE_TO, 1))?;
			write_position(writer, cursor, &ring[0])?;
			if ring.len() > 1 {
				writer.write_varint(command(CMD_LINE_TO, ring.len() as u64 - 1))?;
				for position in &ring[1..] {
					write_position(writer, cursor, position)?;
				}
			}
			writer.write_varint(command(CMD_CLOSE_PATH, 1))?;
		}
	}
	Ok(())
}
