//! Error type shared by all rangetiles crates.
//!
//! "Tile not present" is never an error: lookups return `Ok(None)`. Reads
//! past the end of a byte-range source return truncated buffers. Everything
//! else surfaces as a [`TilesError`].

use thiserror::Error;

/// All failure modes of the rangetiles crates.
#[derive(Debug, Error)]
pub enum TilesError {
	/// The archive header is missing, truncated, or self-inconsistent.
	#[error("invalid header: {0}")]
	InvalidHeader(String),

	/// The archive declares a compression code this build cannot handle.
	#[error("unsupported compression code {0}")]
	UnsupportedCompression(u8),

	/// A directory blob is truncated or self-inconsistent.
	#[error("corrupt directory: {0}")]
	DirectoryCorrupt(String),

	/// A tile coordinate outside the addressable domain was passed in.
	#[error("invalid tile coordinate {z}/{x}/{y}")]
	InvalidCoord { z: u8, x: u32, y: u32 },

	/// A tile id above the maximum representable value was passed in.
	#[error("invalid tile id {0}")]
	InvalidTileId(u64),

	/// A remote source reported at open time that the object does not exist.
	#[error("object not found: {0}")]
	ObjectNotFound(String),

	/// The remote server does not honor byte-range requests.
	#[error("byte ranges not supported: {0}")]
	RangeUnsupported(String),

	/// The writer was used after `complete()`.
	#[error("writer state violation: {0}")]
	WriterStateViolation(&'static str),

	/// A progress listener requested cancellation.
	#[error("operation cancelled")]
	Cancelled,

	/// A vector tile blob violates the MVT wire format.
	#[error("malformed vector tile: {0}")]
	MalformedVectorTile(String),

	/// A geometry is structurally unusable (empty ring, open ring, ...).
	#[error("invalid geometry: {0}")]
	InvalidGeometry(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error("http: {0}")]
	Http(#[from] reqwest::Error),

	#[error("object storage: {0}")]
	Storage(#[from] object_store::Error),
}

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, TilesError>;

impl TilesError {
	/// True for transient I/O failures that a caller may retry.
	pub fn is_retryable(&self) -> bool {
		matches!(self, TilesError::Io(_) | TilesError::Http(_))
	}
}
