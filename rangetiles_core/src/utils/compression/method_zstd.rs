use crate::{Blob, Result};
use zstd::stream::{decode_all, encode_all};

/// Compresses data using Zstd at its default level.
pub fn compress_zstd(blob: &Blob) -> Result<Blob> {
	Ok(Blob::from(encode_all(blob.as_slice(), 0)?))
}

/// Decompresses Zstd data.
pub fn decompress_zstd(blob: &Blob) -> Result<Blob> {
	Ok(Blob::from(decode_all(blob.as_slice())?))
}
