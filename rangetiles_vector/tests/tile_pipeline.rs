//! The full pipeline: build vector tiles with the layer builder, store
//! them gzip-compressed in a PMTiles archive, read them back and decode.

use anyhow::Result;
use rangetiles_archive::{PMTilesReader, PMTilesWriter, WriterConfig};
use rangetiles_core::io::DataWriterBlob;
use rangetiles_core::{GeoBBox, GeoCenter, TileCompression, TileCoord, TileFormat};
use rangetiles_vector::{
	GeoProperties, GeoValue, Geometry, LayerBuilderOptions, VectorLayerBuilder, VectorTile,
};

fn road_properties(name: &str) -> GeoProperties {
	[
		("name", GeoValue::from(name)),
		("kind", GeoValue::from("road")),
	]
	.into_iter()
	.collect()
}

fn build_tile(seed: u32) -> Result<VectorTile> {
	let mut roads = VectorLayerBuilder::new(
		"roads",
		LayerBuilderOptions {
			tolerance: 1.0,
			autoincrement_ids: true,
			..LayerBuilderOptions::default()
		},
	);
	let offset = i64::from(seed % 100);
	roads.add_feature(
		Geometry::new_line_string(vec![[offset, 0], [offset + 500, 500], [offset + 1000, 400]]),
		&road_properties("main street"),
		None,
	)?;
	roads.add_feature(
		Geometry::new_line_string(vec![[0, 4000], [4095, 4000]]),
		&road_properties("ring road"),
		None,
	)?;

	let mut water = VectorLayerBuilder::new(
		"water",
		LayerBuilderOptions {
			min_area: 100.0,
			..LayerBuilderOptions::default()
		},
	);
	water.add_feature(
		Geometry::new_polygon(vec![vec![
			[1000, 1000],
			[3000, 1000],
			[3000, 3000],
			[1000, 3000],
			[1000, 1000],
		]]),
		&[("kind", GeoValue::from("lake"))].into_iter().collect(),
		Some(7),
	)?;

	Ok(VectorTile::new(vec![roads.build(), water.build()]))
}

#[tokio::test]
async fn tiles_survive_the_archive() -> Result<()> {
	let config = WriterConfig {
		tile_type: TileFormat::Mvt,
		tile_compression: TileCompression::Gzip,
		internal_compression: TileCompression::Gzip,
		min_zoom: 2,
		max_zoom: 2,
		bounds: GeoBBox(-180.0, -85.0, 180.0, 85.0),
		center: GeoCenter(0.0, 0.0, 2),
		..WriterConfig::default()
	};
	let mut writer = PMTilesWriter::new(config)?;
	writer.set_metadata(rangetiles_core::Blob::from(
		"{\"vector_layers\":[{\"id\":\"roads\"},{\"id\":\"water\"}]}",
	))?;

	let mut coords = Vec::new();
	for y in 0..4u32 {
		for x in 0..4u32 {
			let coord = TileCoord::new(2, x, y)?;
			writer.add_tile(&coord, &build_tile(x * 4 + y)?.to_blob()?)?;
			coords.push(coord);
		}
	}

	let mut output = DataWriterBlob::new();
	writer.complete_to_writer(&mut output)?;
	let reader = PMTilesReader::open_reader(output.into_reader()).await?;

	for coord in coords {
		let body = reader.get_tile_decompressed(&coord).await?.unwrap();
		let tile = VectorTile::from_blob(&body)?;

		assert_eq!(tile.layers.len(), 2);
		let roads = tile.find_layer("roads").unwrap();
		assert_eq!(roads.version, 2);
		assert_eq!(roads.features.len(), 2);
		assert_eq!(roads.features[0].id, Some(0));
		assert_eq!(roads.features[1].id, Some(1));

		let features = roads.to_features()?;
		assert_eq!(features[0].properties.get("kind"), Some(&GeoValue::from("road")));
		assert_eq!(
			features[1].geometry,
			Geometry::new_line_string(vec![[0, 4000], [4095, 4000]])
		);

		let water = tile.find_layer("water").unwrap();
		assert_eq!(water.features.len(), 1);
		assert_eq!(water.features[0].id, Some(7));
		let lake = &water.to_features()?[0];
		assert_eq!(lake.properties.get("kind"), Some(&GeoValue::from("lake")));
		let Geometry::Polygon(rings) = &lake.geometry else {
			panic!("expected a Polygon, got {:?}", lake.geometry);
		};
		assert_eq!(rings.len(), 1);
		assert_eq!(rings[0].len(), 5);
	}
	Ok(())
}

#[tokio::test]
async fn identical_tiles_share_one_body() -> Result<()> {
	let config = WriterConfig {
		tile_type: TileFormat::Mvt,
		tile_compression: TileCompression::Gzip,
		min_zoom: 1,
		max_zoom: 1,
		..WriterConfig::default()
	};
	let mut writer = PMTilesWriter::new(config)?;

	let blob = build_tile(0)?.to_blob()?;
	for (x, y) in [(0u32, 0u32), (0, 1), (1, 0), (1, 1)] {
		writer.add_tile(&TileCoord::new(1, x, y)?, &blob)?;
	}

	let mut output = DataWriterBlob::new();
	writer.complete_to_writer(&mut output)?;
	let reader = PMTilesReader::open_reader(output.into_reader()).await?;

	assert_eq!(reader.get_header().addressed_tiles_count, 4);
	assert_eq!(reader.get_header().tile_contents_count, 1);
	assert_eq!(reader.get_header().tile_entries_count, 1, "one run covers the whole level");

	let body = reader.get_tile_decompressed(&TileCoord::new(1, 1, 1)?).await?.unwrap();
	assert_eq!(VectorTile::from_blob(&body)?.layers.len(), 2);
	Ok(())
}
