//! PMTiles v3 archives: a single-file, range-friendly container for tile
//! pyramids.
//!
//! [`PMTilesReader`] answers random tile lookups with a bounded number of
//! byte-range reads, even against object storage. [`PMTilesWriter`] accepts
//! tiles in arbitrary order, deduplicates their bodies, and emits a
//! clustered archive with a run-length-compressed root/leaf directory.

mod reader;
pub use reader::*;

pub mod types;
pub use types::*;

mod writer;
pub use writer::*;
