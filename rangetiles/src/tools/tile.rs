use anyhow::{Result, anyhow};
use clap::Args;
use rangetiles_archive::PMTilesReader;
use rangetiles_core::io::ReaderOptions;
use rangetiles_core::TileCoord;
use std::io::Write;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct Subcommand {
	/// Path or URL of the archive
	input: String,

	/// Zoom level
	pub z: u8,

	/// Tile column
	pub x: u32,

	/// Tile row
	pub y: u32,

	/// Interpret the row as TMS (origin bottom-left)
	#[arg(long)]
	pub flipped_y: bool,

	/// Emit the stored bytes without decompressing
	#[arg(long)]
	pub raw: bool,

	/// Write to a file instead of stdout
	#[arg(long)]
	pub output: Option<PathBuf>,
}

pub async fn run(arguments: &Subcommand) -> Result<()> {
	let reader = PMTilesReader::open_location(&arguments.input, &ReaderOptions::default()).await?;

	let mut coord = TileCoord::new(arguments.z, arguments.x, arguments.y)?;
	if arguments.flipped_y {
		coord = coord.flip_y();
	}

	let tile = if arguments.raw {
		reader.get_tile(&coord).await?
	} else {
		reader.get_tile_decompressed(&coord).await?
	};
	let tile = tile.ok_or_else(|| {
		anyhow!(
			"tile {}/{}/{} not found in {}",
			arguments.z,
			arguments.x,
			arguments.y,
			arguments.input
		)
	})?;

	match &arguments.output {
		Some(path) => std::fs::write(path, tile.as_slice())?,
		None => std::io::stdout().write_all(tile.as_slice())?,
	}
	Ok(())
}
