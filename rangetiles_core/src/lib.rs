//! Shared foundation of the rangetiles workspace.
//!
//! Contains the byte-range reader/writer abstractions with their file, HTTP
//! and object-storage backends, caching and block-alignment decorators, the
//! compression codecs, the value (varint/PBF) layer, and the tile pyramid
//! helper types consumed by the archive engine.

mod error;
pub use error::*;

pub mod io;

pub mod progress;
pub use progress::*;

pub mod types;
pub use types::*;

pub mod utils;
pub use utils::*;
