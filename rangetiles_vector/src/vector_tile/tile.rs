use super::VectorTileLayer;
use rangetiles_core::io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob};
use rangetiles_core::{Blob, Result, TilesError};

/// A vector tile: its layers, in wire order. Layer names are unique.
#[derive(Debug, Default, PartialEq)]
pub struct VectorTile {
	pub layers: Vec<VectorTileLayer>,
}

impl VectorTile {
	pub fn new(layers: Vec<VectorTileLayer>) -> VectorTile {
		VectorTile { layers }
	}

	pub fn from_blob(blob: &Blob) -> Result<VectorTile> {
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());
		let mut tile = VectorTile::default();

		while reader.has_remaining() {
			match reader.read_pbf_key()? {
				(3, 2) => {
					tile
						.layers
						.push(VectorTileLayer::read(reader.get_pbf_sub_reader()?.as_mut())?);
				}
				(f, w) => {
					return Err(TilesError::MalformedVectorTile(format!(
						"unexpected tile field {f} with wire type {w}"
					)));
				}
			}
		}

		Ok(tile)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();
		for layer in &self.layers {
			writer.write_pbf_key(3, 2)?;
			writer.write_pbf_blob(&layer.to_blob()?)?;
		}
		Ok(writer.into_blob())
	}

	pub fn find_layer(&self, name: &str) -> Option<&VectorTileLayer> {
		self.layers.iter().find(|layer| layer.name == name)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::{GeoFeature, Geometry};

	fn sample_tile() -> VectorTile {
		let roads = VectorTileLayer::from_features(
			"roads".to_string(),
			vec![GeoFeature::new(Geometry::new_line_string(vec![[0, 0], [100, 100]]))],
			4096,
			2,
		)
		.unwrap();
		let pois = VectorTileLayer::from_features(
			"pois".to_string(),
			vec![GeoFeature::new(Geometry::new_point([50, 50]))],
			4096,
			2,
		)
		.unwrap();
		VectorTile::new(vec![roads, pois])
	}

	#[test]
	fn blob_round_trip_preserves_layer_order() -> Result<()> {
		let tile = sample_tile();
		let restored = VectorTile::from_blob(&tile.to_blob()?)?;
		assert_eq!(restored, tile);
		assert_eq!(restored.layers[0].name, "roads");
		assert_eq!(restored.layers[1].name, "pois");
		Ok(())
	}

	#[test]
	fn find_layer_by_name() {
		let tile = sample_tile();
		assert!(tile.find_layer("pois").is_some());
		assert!(tile.find_layer("buildings").is_none());
	}

	#[test]
	fn garbage_is_malformed() {
		assert!(matches!(
			VectorTile::from_blob(&Blob::from(&[0x08u8, 0x01])),
			Err(TilesError::MalformedVectorTile(_))
		));
	}
}
