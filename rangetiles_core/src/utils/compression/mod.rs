//! Compress and decompress blobs with the codecs an archive may declare:
//! gzip, brotli and zstd. Every call creates its own encoder or decoder;
//! nothing is shared between threads.

mod method_brotli;
mod method_gzip;
mod method_zstd;

pub use method_brotli::*;
pub use method_gzip::*;
pub use method_zstd::*;

use crate::{Blob, Result, TileCompression};

/// Compresses a blob with the given codec. `Uncompressed` passes through.
pub fn compress(blob: Blob, compression: TileCompression) -> Result<Blob> {
	match compression {
		TileCompression::Uncompressed => Ok(blob),
		TileCompression::Gzip => compress_gzip(&blob),
		TileCompression::Brotli => compress_brotli(&blob),
		TileCompression::Zstd => compress_zstd(&blob),
	}
}

/// Decompresses a blob with the given codec. `Uncompressed` passes through.
pub fn decompress(blob: Blob, compression: TileCompression) -> Result<Blob> {
	match compression {
		TileCompression::Uncompressed => Ok(blob),
		TileCompression::Gzip => decompress_gzip(&blob),
		TileCompression::Brotli => decompress_brotli(&blob),
		TileCompression::Zstd => decompress_zstd(&blob),
	}
}
