use anyhow::{Result, bail};
use clap::Args;
use rangetiles_archive::{PMTilesReader, PMTilesWriter, WriterConfig, tile_id_to_coord};
use rangetiles_core::io::ReaderOptions;
use rangetiles_core::{GeoBBox, GeoCenter};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct Subcommand {
	/// Archives to merge, in order; later inputs win on duplicate tiles
	#[arg(required = true)]
	inputs: Vec<String>,

	/// Path of the merged archive
	#[arg(long)]
	output: PathBuf,
}

pub async fn run(arguments: &Subcommand) -> Result<()> {
	if arguments.inputs.is_empty() {
		bail!("join needs at least one input archive");
	}

	let options = ReaderOptions::default();
	let mut readers = Vec::with_capacity(arguments.inputs.len());
	for input in &arguments.inputs {
		readers.push(PMTilesReader::open_location(input, &options).await?);
	}

	// tile type and compressions follow the first input; zoom range and
	// bounds are the union over all of them
	let first = readers[0].get_header();
	let mut config = WriterConfig {
		tile_type: first.tile_type.as_value(),
		tile_compression: first.tile_compression.as_value(),
		internal_compression: first.internal_compression.as_value(),
		min_zoom: first.min_zoom,
		max_zoom: first.max_zoom,
		bounds: GeoBBox::from_e7([
			first.min_lon_e7,
			first.min_lat_e7,
			first.max_lon_e7,
			first.max_lat_e7,
		]),
		center: GeoCenter(
			f64::from(first.center_lon_e7) / 1e7,
			f64::from(first.center_lat_e7) / 1e7,
			first.center_zoom,
		),
		..WriterConfig::default()
	};
	for reader in &readers[1..] {
		let header = reader.get_header();
		config.min_zoom = config.min_zoom.min(header.min_zoom);
		config.max_zoom = config.max_zoom.max(header.max_zoom);
		config.bounds.extend(&GeoBBox::from_e7([
			header.min_lon_e7,
			header.min_lat_e7,
			header.max_lon_e7,
			header.max_lat_e7,
		]));
	}

	let mut writer = PMTilesWriter::new(config)?;
	writer.set_metadata(readers[0].get_metadata().await?)?;

	for (reader, input) in readers.iter().zip(&arguments.inputs) {
		let mut copied = 0u64;
		for entry in reader.get_tile_entries().await? {
			let first = tile_id_to_coord(entry.tile_id)?;
			let Some(body) = reader.get_tile_decompressed(&first).await? else {
				continue;
			};
			writer.add_tile(&first, &body)?;
			for tile_id in entry.tile_id + 1..entry.id_end() {
				writer.add_tile(&tile_id_to_coord(tile_id)?, &body)?;
			}
			copied += u64::from(entry.run_length);
		}
		log::info!("copied {copied} tiles from {input}");
	}

	writer.complete_to_path(&arguments.output)?;
	Ok(())
}
