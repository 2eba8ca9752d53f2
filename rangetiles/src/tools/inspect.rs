use anyhow::Result;
use clap::Args;
use rangetiles_archive::PMTilesReader;
use rangetiles_core::io::ReaderOptions;

#[derive(Args, Debug)]
pub struct Subcommand {
	/// Path or URL of the archive
	input: String,

	/// Accept invalid TLS certificates
	#[arg(long)]
	trust_all_certificates: bool,

	/// Also scan the directories and report tile counts per zoom level
	#[arg(long)]
	tiles: bool,
}

pub async fn run(arguments: &Subcommand) -> Result<()> {
	let options = ReaderOptions {
		trust_all_certificates: arguments.trust_all_certificates,
		..ReaderOptions::default()
	};
	let reader = PMTilesReader::open_location(&arguments.input, &options).await?;
	let header = reader.get_header();

	println!("archive:               {}", reader.get_name());
	println!("tile type:             {:?}", header.tile_type);
	println!("tile compression:      {:?}", header.tile_compression);
	println!("internal compression:  {:?}", header.internal_compression);
	println!("zoom range:            {}..{}", header.min_zoom, header.max_zoom);
	println!(
		"bounds:                {}, {}, {}, {}",
		f64::from(header.min_lon_e7) / 1e7,
		f64::from(header.min_lat_e7) / 1e7,
		f64::from(header.max_lon_e7) / 1e7,
		f64::from(header.max_lat_e7) / 1e7,
	);
	println!(
		"center:                {}, {} @ {}",
		f64::from(header.center_lon_e7) / 1e7,
		f64::from(header.center_lat_e7) / 1e7,
		header.center_zoom
	);
	println!("addressed tiles:       {}", header.addressed_tiles_count);
	println!("tile entries:          {}", header.tile_entries_count);
	println!("tile contents:         {}", header.tile_contents_count);
	println!("clustered:             {}", header.clustered);
	println!("root directory:        {}", header.root_dir);
	println!("metadata:              {}", header.metadata);
	println!("leaf directories:      {}", header.leaf_dirs);
	println!("tile data:             {}", header.tile_data);

	let metadata = reader.get_metadata().await?;
	if metadata.is_empty() {
		println!("metadata:              (empty)");
	} else {
		println!("{}", metadata.as_str());
	}

	if arguments.tiles {
		let pyramid = reader.get_bbox_pyramid().await?;
		for bbox in pyramid.iter_levels() {
			println!("zoom {:>2}:               {:?}", bbox.level, bbox);
		}
		println!("total tiles:           {}", pyramid.count_tiles());
	}

	Ok(())
}
