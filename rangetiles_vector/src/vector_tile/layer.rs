use super::{GeoValuePBF, PropertyManager, VectorTileFeature};
use crate::geo::{GeoFeature, GeoValue, Geometry};
use byteorder::LE;
use rangetiles_core::io::{ValueReader, ValueWriter, ValueWriterBlob};
use rangetiles_core::{Blob, Result, TilesError};

/// One named layer of a vector tile: features plus the key/value tables
/// their tags point into.
#[derive(Debug, Default, PartialEq)]
pub struct VectorTileLayer {
	pub name: String,
	pub extent: u32,
	pub version: u32,
	pub features: Vec<VectorTileFeature>,
	pub property_manager: PropertyManager,
}

impl VectorTileLayer {
	pub fn new(name: String, extent: u32, version: u32) -> VectorTileLayer {
		VectorTileLayer {
			name,
			extent,
			version,
			features: Vec::new(),
			property_manager: PropertyManager::new(),
		}
	}

	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileLayer> {
		let mut name = None;
		let mut extent = 4096;
		let mut version = 1;
		let mut features = Vec::new();
		let mut property_manager = PropertyManager::new();

		while reader.has_remaining() {
			match reader.read_pbf_key()? {
				(1, 2) => name = Some(reader.read_pbf_string()?),
				(2, 2) => features.push(VectorTileFeature::read(reader.get_pbf_sub_reader()?.as_mut())?),
				(3, 2) => {
					property_manager.add_key(reader.read_pbf_string()?);
				}
				(4, 2) => {
					property_manager.add_val(GeoValue::read(reader.get_pbf_sub_reader()?.as_mut())?);
				}
				(5, 0) => extent = reader.read_varint()? as u32,
				(15, 0) => version = reader.read_varint()? as u32,
				(f, w) => {
					return Err(TilesError::MalformedVectorTile(format!(
						"unexpected layer field {f} with wire type {w}"
					)));
				}
			}
		}

		if extent == 0 {
			return Err(TilesError::MalformedVectorTile("layer extent must not be zero".to_string()));
		}

		Ok(VectorTileLayer {
			name: name.ok_or_else(|| TilesError::MalformedVectorTile("layer without a name".to_string()))?,
			extent,
			version,
			features,
			property_manager,
		})
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		writer.write_pbf_key(1, 2)?;
		writer.write_pbf_string(&self.name)?;

		for feature in &self.features {
			writer.write_pbf_key(2, 2)?;
			writer.write_pbf_blob(&feature.to_blob()?)?;
		}

		for key in self.property_manager.iter_key() {
			writer.write_pbf_key(3, 2)?;
			writer.write_pbf_string(key)?;
		}

		for value in self.property_manager.iter_val() {
			writer.write_pbf_key(4, 2)?;
			writer.write_pbf_blob(&value.to_blob()?)?;
		}

		if self.extent != 4096 {
			writer.write_pbf_key(5, 0)?;
			writer.write_varint(u64::from(self.extent))?;
		}
		if self.version != 1 {
			writer.write_pbf_key(15, 0)?;
			writer.write_varint(u64::from(self.version))?;
		}

		Ok(writer.into_blob())
	}

	/// Builds a layer from features, deduplicating keys and values.
	pub fn from_features(name: String, features: Vec<GeoFeature>, extent: u32, version: u32) -> Result<VectorTileLayer> {
		let mut layer = VectorTileLayer::new(name, extent, version);
		for feature in features {
			let tag_ids = layer.property_manager.encode_tag_ids(feature.properties);
			layer
				.features
				.push(VectorTileFeature::from_geometry(feature.id, tag_ids, feature.geometry)?);
		}
		Ok(layer)
	}

	/// Decodes every feature.
	pub fn to_features(&self) -> Result<Vec<GeoFeature>> {
		self.features.iter().map(|f| f.to_feature(self, None)).collect()
	}

	/// Decodes every feature, passing geometries through `transform`.
	pub fn to_features_transformed(&self, transform: &dyn Fn(Geometry) -> Geometry) -> Result<Vec<GeoFeature>> {
		self
			.features
			.iter()
			.map(|f| f.to_feature(self, Some(transform)))
			.collect()
	}
}
