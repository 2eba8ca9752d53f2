use std::fmt;

/// Payload type of the tiles in an archive.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TileFormat {
	#[default]
	Unknown,
	Mvt,
	Png,
	Jpeg,
	Webp,
}

impl TileFormat {
	pub fn as_str(&self) -> &'static str {
		match self {
			TileFormat::Unknown => "unknown",
			TileFormat::Mvt => "mvt",
			TileFormat::Png => "png",
			TileFormat::Jpeg => "jpeg",
			TileFormat::Webp => "webp",
		}
	}

	pub fn content_type(&self) -> &'static str {
		match self {
			TileFormat::Unknown => "application/octet-stream",
			TileFormat::Mvt => "application/vnd.mapbox-vector-tile",
			TileFormat::Png => "image/png",
			TileFormat::Jpeg => "image/jpeg",
			TileFormat::Webp => "image/webp",
		}
	}
}

impl fmt::Display for TileFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
