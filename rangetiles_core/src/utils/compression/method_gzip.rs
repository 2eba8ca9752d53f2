use crate::{Blob, Result};
use flate2::bufread::{GzDecoder, GzEncoder};
use std::io::Read;

/// Compresses data using Gzip with the highest quality setting.
pub fn compress_gzip(blob: &Blob) -> Result<Blob> {
	let mut encoder = GzEncoder::new(blob.as_slice(), flate2::Compression::best());
	let mut compressed_data = Vec::new();
	encoder.read_to_end(&mut compressed_data)?;
	Ok(Blob::from(compressed_data))
}

/// Decompresses Gzip data.
pub fn decompress_gzip(blob: &Blob) -> Result<Blob> {
	let mut decoder = GzDecoder::new(blob.as_slice());
	let mut decompressed_data = Vec::new();
	decoder.read_to_end(&mut decompressed_data)?;
	Ok(Blob::from(decompressed_data))
}
