//! End-to-end archive tests: write with `PMTilesWriter`, read back with
//! `PMTilesReader`, all in memory through the blob writer/reader pair.

use anyhow::Result;
use rangetiles_archive::{
	Directory, HeaderV3, PMTilesCompression, PMTilesReader, PMTilesType, PMTilesWriter, WriterConfig,
	coord_to_tile_id,
};
use rangetiles_core::io::DataWriterBlob;
use rangetiles_core::{
	Blob, ByteRange, CancelFlag, GeoBBox, GeoCenter, ProgressListener, TileCompression, TileCoord,
	TileFormat, TilesError, decompress_gzip,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn mvt_config() -> WriterConfig {
	WriterConfig {
		tile_type: TileFormat::Mvt,
		tile_compression: TileCompression::Gzip,
		internal_compression: TileCompression::Gzip,
		min_zoom: 0,
		max_zoom: 0,
		bounds: GeoBBox(-180.0, -85.0, 180.0, 85.0),
		center: GeoCenter(0.0, 0.0, 0),
		..WriterConfig::default()
	}
}

async fn write_and_reopen(writer: &mut PMTilesWriter) -> Result<PMTilesReader> {
	let mut output = DataWriterBlob::new();
	writer.complete_to_writer(&mut output)?;
	Ok(PMTilesReader::open_reader(output.into_reader()).await?)
}

#[tokio::test]
async fn single_tile_round_trip() -> Result<()> {
	let mut writer = PMTilesWriter::new(mvt_config())?;
	writer.set_metadata(Blob::from("{\"name\":\"t\"}"))?;
	writer.add_tile(&TileCoord::new(0, 0, 0)?, &Blob::from("hello"))?;

	let reader = write_and_reopen(&mut writer).await?;

	let header = reader.get_header();
	assert_eq!(header.root_dir.offset, HeaderV3::len());
	assert_eq!(header.tile_type, PMTilesType::Mvt);
	assert_eq!(header.tile_compression, PMTilesCompression::Gzip);
	assert_eq!(header.internal_compression, PMTilesCompression::Gzip);
	assert_eq!(header.min_zoom, 0);
	assert_eq!(header.max_zoom, 0);
	assert_eq!(header.addressed_tiles_count, 1);
	assert_eq!(header.tile_entries_count, 1);
	assert_eq!(header.tile_contents_count, 1);
	assert!(header.clustered);
	assert_eq!(header.min_lon_e7, -1_800_000_000);
	assert_eq!(header.max_lat_e7, 850_000_000);

	// the stored body is gzip; the convenience accessor decompresses
	let raw = reader.get_tile(&TileCoord::new(0, 0, 0)?).await?.unwrap();
	assert_eq!(decompress_gzip(&raw)?.as_str(), "hello");
	let plain = reader.get_tile_decompressed(&TileCoord::new(0, 0, 0)?).await?.unwrap();
	assert_eq!(plain.as_str(), "hello");

	assert_eq!(reader.get_metadata().await?.as_str(), "{\"name\":\"t\"}");

	// absent tiles are None, not errors
	assert!(reader.get_tile(&TileCoord::new(1, 0, 0)?).await?.is_none());
	assert!(reader.get_tile(&TileCoord::new(5, 11, 29)?).await?.is_none());
	Ok(())
}

#[tokio::test]
async fn rle_deduplication() -> Result<()> {
	let mut config = mvt_config();
	config.max_zoom = 1;
	config.tile_compression = TileCompression::Uncompressed;
	let mut writer = PMTilesWriter::new(config)?;

	// z=1 in hilbert order: (0,0), (0,1), (1,1), (1,0)
	writer.add_tile(&TileCoord::new(1, 0, 0)?, &Blob::from("AAAA"))?;
	writer.add_tile(&TileCoord::new(1, 0, 1)?, &Blob::from("AAAA"))?;
	writer.add_tile(&TileCoord::new(1, 1, 0)?, &Blob::from("BBBB"))?;
	writer.add_tile(&TileCoord::new(1, 1, 1)?, &Blob::from("BBBB"))?;

	let reader = write_and_reopen(&mut writer).await?;
	let header = reader.get_header();

	assert_eq!(header.addressed_tiles_count, 4);
	assert_eq!(header.tile_contents_count, 2, "two distinct bodies");
	assert_eq!(header.tile_data.length, 8, "tile data holds each body once");

	// adjacent identical tiles must merge: ids 1+2 share A, ids 3+4 share B
	assert_eq!(header.tile_entries_count, 2);

	for (x, y, expected) in [(0, 0, "AAAA"), (0, 1, "AAAA"), (1, 0, "BBBB"), (1, 1, "BBBB")] {
		let body = reader.get_tile_decompressed(&TileCoord::new(1, x, y)?).await?.unwrap();
		assert_eq!(body.as_str(), expected, "tile 1/{x}/{y}");
	}
	Ok(())
}

#[tokio::test]
async fn no_adjacent_mergeable_entries_remain() -> Result<()> {
	let mut config = mvt_config();
	config.max_zoom = 3;
	config.tile_compression = TileCompression::Uncompressed;
	config.internal_compression = TileCompression::Uncompressed;
	let mut writer = PMTilesWriter::new(config)?;

	// bodies repeat in groups of three consecutive tile ids, so merging
	// must produce runs of exactly three
	for z in 0..=3u8 {
		let n = 1u32 << z;
		for y in 0..n {
			for x in 0..n {
				let coord = TileCoord::new(z, x, y)?;
				let body = if (coord_to_tile_id(&coord)? / 3) % 2 == 0 {
					Blob::from("even")
				} else {
					Blob::from("odd!")
				};
				writer.add_tile(&coord, &body)?;
			}
		}
	}

	let mut output = DataWriterBlob::new();
	writer.complete_to_writer(&mut output)?;
	let blob = output.into_blob();

	let header = HeaderV3::deserialize(&blob.read_range(&ByteRange::new(0, HeaderV3::len()))?)?;
	assert_eq!(header.addressed_tiles_count, 1 + 4 + 16 + 64);
	assert_eq!(header.tile_contents_count, 2);

	// all 85 tile ids are dense, so the directory is runs of three
	let root = Directory::from_blob(&blob.read_range(&header.root_dir)?)?;
	assert_eq!(root.len() as u64, header.tile_entries_count);
	assert!(root.iter().any(|e| e.run_length == 3));
	for pair in root.as_slice().windows(2) {
		let mergeable = pair[0].id_end() == pair[1].tile_id && pair[0].range == pair[1].range;
		assert!(!mergeable, "adjacent entries {pair:?} should have been merged");
	}
	Ok(())
}

#[tokio::test]
async fn duplicate_coordinates_are_last_wins() -> Result<()> {
	let mut config = mvt_config();
	config.tile_compression = TileCompression::Uncompressed;
	let mut writer = PMTilesWriter::new(config)?;

	writer.add_tile(&TileCoord::new(0, 0, 0)?, &Blob::from("first"))?;
	writer.add_tile(&TileCoord::new(0, 0, 0)?, &Blob::from("second"))?;

	let reader = write_and_reopen(&mut writer).await?;
	assert_eq!(reader.get_header().addressed_tiles_count, 1);
	let body = reader.get_tile_decompressed(&TileCoord::new(0, 0, 0)?).await?.unwrap();
	assert_eq!(body.as_str(), "second");
	Ok(())
}

#[tokio::test]
async fn many_tiles_with_leaf_directories() -> Result<()> {
	let mut config = mvt_config();
	config.max_zoom = 7;
	config.tile_compression = TileCompression::Uncompressed;
	config.internal_compression = TileCompression::Uncompressed;
	config.target_root_bytes = 4096;
	let mut writer = PMTilesWriter::new(config)?;

	let z = 7u8;
	let n = 1u32 << z;
	for y in 0..n {
		for x in 0..n {
			writer.add_tile(&TileCoord::new(z, x, y)?, &Blob::from(format!("tile {x} {y}")))?;
		}
	}

	let reader = write_and_reopen(&mut writer).await?;
	let header = reader.get_header();
	assert_eq!(header.addressed_tiles_count, u64::from(n) * u64::from(n));
	assert!(header.root_dir.length <= 4096, "root must fit the target");
	assert!(header.leaf_dirs.length > 0, "16k entries force a leaf split");

	for (x, y) in [(0u32, 0u32), (1, 1), (127, 0), (0, 127), (127, 127), (64, 47)] {
		let body = reader.get_tile_decompressed(&TileCoord::new(z, x, y)?).await?.unwrap();
		assert_eq!(body.as_str(), format!("tile {x} {y}"));
	}
	assert!(reader.get_tile(&TileCoord::new(6, 0, 0)?).await?.is_none());

	// coverage is derived from the directories
	let pyramid = reader.get_bbox_pyramid().await?;
	assert_eq!(pyramid.get_level_min(), Some(z));
	assert_eq!(pyramid.count_tiles(), u64::from(n) * u64::from(n));
	Ok(())
}

#[tokio::test]
async fn stream_tiles_visits_one_zoom() -> Result<()> {
	let mut config = mvt_config();
	config.max_zoom = 3;
	config.tile_compression = TileCompression::Uncompressed;
	let mut writer = PMTilesWriter::new(config)?;

	for z in [1u8, 2, 3] {
		let n = 1u32 << z;
		for y in 0..n {
			for x in 0..n {
				writer.add_tile(&TileCoord::new(z, x, y)?, &Blob::from(format!("{z}/{x}/{y}")))?;
			}
		}
	}

	let reader = write_and_reopen(&mut writer).await?;
	let mut count = 0u64;
	reader
		.stream_tiles(2, |tile_id, body| {
			assert!(body.as_str().starts_with("2/"), "unexpected body {:?}", body.as_str());
			assert!(tile_id >= 5 && tile_id < 21);
			count += 1;
			Ok(())
		})
		.await?;
	assert_eq!(count, 16);

	let mut none = 0;
	reader
		.stream_tiles(0, |_, _| {
			none += 1;
			Ok(())
		})
		.await?;
	assert_eq!(none, 0, "zoom 0 was never written");
	Ok(())
}

#[tokio::test]
async fn find_closest_tile_id_is_exact_or_nearest() -> Result<()> {
	let mut config = mvt_config();
	config.max_zoom = 2;
	let mut writer = PMTilesWriter::new(config)?;
	for (z, x, y) in [(2u8, 0u32, 0u32), (2, 3, 3)] {
		writer.add_tile(&TileCoord::new(z, x, y)?, &Blob::from("x"))?;
	}
	let reader = write_and_reopen(&mut writer).await?;

	let id_a = coord_to_tile_id(&TileCoord::new(2, 0, 0)?)?;
	assert_eq!(reader.find_closest_tile_id(id_a).await?, Some(id_a));
	assert_eq!(reader.find_closest_tile_id(id_a + 1).await?, Some(id_a));
	Ok(())
}

#[tokio::test]
async fn writer_state_violations() -> Result<()> {
	let mut writer = PMTilesWriter::new(mvt_config())?;
	writer.add_tile(&TileCoord::new(0, 0, 0)?, &Blob::from("x"))?;

	let mut output = DataWriterBlob::new();
	writer.complete_to_writer(&mut output)?;

	assert!(matches!(
		writer.add_tile(&TileCoord::new(0, 0, 0)?, &Blob::from("y")),
		Err(TilesError::WriterStateViolation(_))
	));
	let mut second = DataWriterBlob::new();
	assert!(matches!(
		writer.complete_to_writer(&mut second),
		Err(TilesError::WriterStateViolation(_))
	));
	Ok(())
}

#[tokio::test]
async fn invalid_coordinates_are_rejected() -> Result<()> {
	let mut writer = PMTilesWriter::new(mvt_config())?;
	let bogus = TileCoord { z: 3, x: 9, y: 0 };
	assert!(matches!(
		writer.add_tile(&bogus, &Blob::from("x")),
		Err(TilesError::InvalidCoord { .. })
	));
	Ok(())
}

#[test]
fn cancellation_aborts_completion() {
	let flag = Arc::new(CancelFlag::new());
	let mut config = mvt_config();
	config.progress = Some(flag.clone());
	let mut writer = PMTilesWriter::new(config).unwrap();
	writer
		.add_tile(&TileCoord::new(0, 0, 0).unwrap(), &Blob::from("x"))
		.unwrap();

	flag.cancel();
	let mut output = DataWriterBlob::new();
	assert!(matches!(
		writer.complete_to_writer(&mut output),
		Err(TilesError::Cancelled)
	));
}

#[test]
fn progress_is_reported_per_phase() {
	#[derive(Debug, Default)]
	struct CountingListener {
		calls: AtomicUsize,
	}
	impl ProgressListener for CountingListener {
		fn on_progress(&self, fraction: f64) {
			assert!((0.0..=1.0).contains(&fraction));
			self.calls.fetch_add(1, Ordering::SeqCst);
		}
	}

	let listener = Arc::new(CountingListener::default());
	let mut config = mvt_config();
	config.progress = Some(listener.clone());
	let mut writer = PMTilesWriter::new(config).unwrap();
	writer
		.add_tile(&TileCoord::new(0, 0, 0).unwrap(), &Blob::from("x"))
		.unwrap();

	let mut output = DataWriterBlob::new();
	writer.complete_to_writer(&mut output).unwrap();
	assert!(listener.calls.load(Ordering::SeqCst) >= 6, "one update per phase at least");
}

#[tokio::test]
async fn archive_layout_sections_are_back_to_back() -> Result<()> {
	let mut writer = PMTilesWriter::new(mvt_config())?;
	writer.set_metadata(Blob::from("{}"))?;
	writer.add_tile(&TileCoord::new(0, 0, 0)?, &Blob::from("body"))?;

	let mut output = DataWriterBlob::new();
	writer.complete_to_writer(&mut output)?;
	let total = output.len() as u64;
	let reader = PMTilesReader::open_reader(output.into_reader()).await?;
	let header = reader.get_header();

	assert_eq!(header.root_dir.offset, 127);
	assert_eq!(header.metadata.offset, header.root_dir.end());
	assert_eq!(header.leaf_dirs.offset, header.metadata.end());
	assert_eq!(header.tile_data.offset, header.leaf_dirs.end());
	assert_eq!(header.tile_data.end(), total);
	Ok(())
}

#[tokio::test]
async fn complete_to_path_writes_a_readable_file() -> Result<()> {
	let dir = tempfile::tempdir()?;
	let path = dir.path().join("out.pmtiles");

	let mut writer = PMTilesWriter::new(mvt_config())?;
	writer.add_tile(&TileCoord::new(0, 0, 0)?, &Blob::from("from disk"))?;
	writer.complete_to_path(&path)?;

	let reader = PMTilesReader::open_path(&path).await?;
	let body = reader.get_tile_decompressed(&TileCoord::new(0, 0, 0)?).await?.unwrap();
	assert_eq!(body.as_str(), "from disk");
	Ok(())
}

#[tokio::test]
async fn entries_are_clustered_in_id_order() -> Result<()> {
	let mut config = mvt_config();
	config.max_zoom = 5;
	config.tile_compression = TileCompression::Uncompressed;
	let mut writer = PMTilesWriter::new(config)?;

	// insertion order deliberately scrambled
	for (z, x, y) in [(5u8, 30u32, 1u32), (2, 0, 0), (5, 0, 0), (3, 7, 7), (4, 2, 3), (5, 30, 2)] {
		writer.add_tile(&TileCoord::new(z, x, y)?, &Blob::from(format!("{z}-{x}-{y}")))?;
	}

	let reader = write_and_reopen(&mut writer).await?;
	let entries = reader.get_tile_entries().await?;
	assert_eq!(entries.len(), 6);

	let mut last_id = 0;
	let mut last_offset = 0;
	for entry in &entries {
		assert!(entry.tile_id >= last_id, "tile ids must ascend");
		assert!(entry.range.offset >= last_offset, "bodies must be laid out in id order");
		last_id = entry.tile_id;
		last_offset = entry.range.offset + entry.range.length;
	}
	Ok(())
}

#[tokio::test]
async fn empty_archive_round_trips() -> Result<()> {
	let mut writer = PMTilesWriter::new(mvt_config())?;
	writer.set_metadata(Blob::from("{}"))?;

	let reader = write_and_reopen(&mut writer).await?;
	let header = reader.get_header();
	assert_eq!(header.addressed_tiles_count, 0);
	assert_eq!(header.tile_entries_count, 0);
	assert_eq!(header.tile_contents_count, 0);
	assert_eq!(header.tile_data.length, 0);

	assert!(reader.get_tile(&TileCoord::new(0, 0, 0)?).await?.is_none());
	assert_eq!(reader.get_metadata().await?.as_str(), "{}");
	assert!(reader.get_tile_entries().await?.is_empty());
	assert!(reader.find_closest_tile_id(5).await?.is_none());
	assert!(reader.get_bbox_pyramid().await?.is_empty());
	Ok(())
}
