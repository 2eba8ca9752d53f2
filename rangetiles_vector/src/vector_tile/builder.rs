use super::{VectorTileFeature, VectorTileLayer};
use crate::geo::{GeoProperties, Geometry};
use crate::math::{area_polygon, clip_geometry, length_line, simplify_geometry, snap_to_grid};
use rangetiles_core::Result;

/// Tuning of the per-layer encoder pipeline.
#[derive(Clone, Debug)]
pub struct LayerBuilderOptions {
	/// Integer coordinate range of the layer.
	pub extent: u32,
	/// Clip margin around the tile, in extent units.
	pub buffer: u32,
	/// Polygons below this area are dropped before encoding.
	pub min_area: f64,
	/// Linestrings below this length are dropped before encoding.
	pub min_length: f64,
	/// Simplification tolerance in extent units; zero disables.
	pub tolerance: f64,
	/// Assign ids from a counter to features arriving without one.
	pub autoincrement_ids: bool,
	/// MVT version written to the layer.
	pub version: u32,
}

impl Default for LayerBuilderOptions {
	fn default() -> Self {
		LayerBuilderOptions {
			extent: 4096,
			buffer: 64,
			min_area: 0.0,
			min_length: 0.0,
			tolerance: 0.0,
			autoincrement_ids: false,
			version: 2,
		}
	}
}

/// Builds one layer feature by feature.
///
/// Every geometry runs through the same pipeline: size filter, collection
/// explosion, simplification, clipping to the buffered tile envelope, and
/// integer snapping; survivors are packed into the command stream with
/// deduplicated attribute tags.
pub struct VectorLayerBuilder {
	name: String,
	options: LayerBuilderOptions,
	layer: VectorTileLayer,
	next_id: u64,
}

impl VectorLayerBuilder {
	pub fn new(name: &str, options: LayerBuilderOptions) -> VectorLayerBuilder {
		let layer = VectorTileLayer::new(name.to_string(), options.extent, options.version);
		VectorLayerBuilder {
			name: name.to_string(),
			options,
			layer,
			next_id: 0,
		}
	}

	pub fn get_name(&self) -> &str {
		&self.name
	}

	pub fn len(&self) -> usize {
		self.layer.features.len()
	}

	pub fn is_empty(&self) -> bool {
		self.layer.features.is_empty()
	}

	/// Runs the pipeline on `geometry` and appends the surviving features,
	/// all carrying `properties`. Returns how many features were emitted:
	/// zero when everything was filtered or clipped away, more than one
	/// when a collection was exploded.
	///
	/// An explicit `id` is honored when exactly one feature results;
	/// exploded collection members always draw fresh ids.
	pub fn add_feature(&mut self, geometry: Geometry, properties: &GeoProperties, id: Option<u64>) -> Result<usize> {
		let mut prepared = Vec::new();
		self.prepare(geometry, &mut prepared);
		let count = prepared.len();

		for geometry in prepared {
			let assigned = if count == 1 { id.or_else(|| self.draw_id()) } else { self.draw_id() };
			let tag_ids = self.layer.property_manager.encode_tag_ids(properties.clone());
			self
				.layer
				.features
				.push(VectorTileFeature::from_geometry(assigned, tag_ids, geometry)?);
		}
		Ok(count)
	}

	fn draw_id(&mut self) -> Option<u64> {
		if !self.options.autoincrement_ids {
			return None;
		}
		let id = self.next_id;
		self.next_id += 1;
		Some(id)
	}

	/// Pipeline steps up to (not including) packing.
	fn prepare(&self, geometry: Geometry, out: &mut Vec<Geometry>) {
		if let Geometry::Collection(members) = geometry {
			for member in members {
				self.prepare(member, out);
			}
			return;
		}

		if self.is_below_minimum_size(&geometry) {
			return;
		}

		let simplified = simplify_geometry(geometry, self.options.tolerance);

		let buffer = f64::from(self.options.buffer);
		let envelope = [
			-buffer,
			-buffer,
			f64::from(self.options.extent) + buffer,
			f64::from(self.options.extent) + buffer,
		];
		let Some(clipped) = clip_geometry(simplified, &envelope) else {
			return;
		};

		if let Some(snapped) = snap_to_grid(clipped) {
			out.push(snapped);
		}
	}

	fn is_below_minimum_size(&self, geometry: &Geometry) -> bool {
		match geometry {
			Geometry::Polygon(rings) => area_polygon(rings) / 2.0 < self.options.min_area,
			Geometry::MultiPolygon(polygons) => {
				polygons.iter().map(|rings| area_polygon(rings) / 2.0).sum::<f64>() < self.options.min_area
			}
			Geometry::LineString(line) => length_line(line) < self.options.min_length,
			Geometry::MultiLineString(lines) => {
				lines.iter().map(length_line).sum::<f64>() < self.options.min_length
			}
			_ => false,
		}
	}

	/// Finishes the layer.
	pub fn build(self) -> VectorTileLayer {
		self.layer
	}
}
