use std::fmt;

/// Compression codec applied to a blob. Directories and metadata use the
/// archive's internal codec, tile bodies their own.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TileCompression {
	#[default]
	Uncompressed,
	Gzip,
	Brotli,
	Zstd,
}

impl TileCompression {
	pub fn as_str(&self) -> &'static str {
		match self {
			TileCompression::Uncompressed => "none",
			TileCompression::Gzip => "gzip",
			TileCompression::Brotli => "brotli",
			TileCompression::Zstd => "zstd",
		}
	}
}

impl fmt::Display for TileCompression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
