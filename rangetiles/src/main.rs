mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use rangetiles_core::TilesError;

#[derive(Parser, Debug)]
#[command(
	author,
	version,
	about,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Show the header and metadata of an archive
	Inspect(tools::inspect::Subcommand),

	/// Extract a single tile from an archive
	GetTile(tools::tile::Subcommand),

	/// Merge archives into one; later inputs win on duplicate tiles
	Join(tools::join::Subcommand),
}

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	if let Err(error) = run(cli).await {
		eprintln!("{error}");
		std::process::exit(exit_code(&error));
	}
}

async fn run(cli: Cli) -> Result<()> {
	match &cli.command {
		Commands::Inspect(arguments) => tools::inspect::run(arguments).await,
		Commands::GetTile(arguments) => tools::tile::run(arguments).await,
		Commands::Join(arguments) => tools::join::run(arguments).await,
	}
}

/// 1 for not-found/invalid input, 3 for cancellation. Usage errors exit
/// with 2 through clap before we get here.
fn exit_code(error: &anyhow::Error) -> i32 {
	match error.downcast_ref::<TilesError>() {
		Some(TilesError::Cancelled) => 3,
		_ => 1,
	}
}
