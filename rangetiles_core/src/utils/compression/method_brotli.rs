use crate::{Blob, Result};
use brotli::{CompressorReader, Decompressor};
use std::io::Read;

/// Compresses data using Brotli, quality 10 with a 22-bit window.
pub fn compress_brotli(blob: &Blob) -> Result<Blob> {
	let mut encoder = CompressorReader::new(blob.as_slice(), 4096, 10, 22);
	let mut compressed_data = Vec::new();
	encoder.read_to_end(&mut compressed_data)?;
	Ok(Blob::from(compressed_data))
}

/// Decompresses Brotli data.
pub fn decompress_brotli(blob: &Blob) -> Result<Blob> {
	let mut decoder = Decompressor::new(blob.as_slice(), 4096);
	let mut decompressed_data = Vec::new();
	decoder.read_to_end(&mut decompressed_data)?;
	Ok(Blob::from(decompressed_data))
}

#[cfg(test)]
mod tests {
	use super::super::tests::generate_test_data;
	use super::*;

	#[test]
	fn should_compress_and_decompress_brotli_correctly() -> Result<()> {
		let data = generate_test_data(100_000);
		let compressed = compress_brotli(&data)?;
		assert!(compressed.len() < data.len());
		let decompressed = decompress_brotli(&compressed)?;
		assert_eq!(data, decompressed, "Brotli compression and decompression failed");
		Ok(())
	}
}
