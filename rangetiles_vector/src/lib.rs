//! Mapbox Vector Tile support for the rangetiles workspace.
//!
//! - [`geo`]: the geometry model (coordinates, geometries, feature
//!   properties) shared by decoder and encoder.
//! - [`math`]: ring areas, line simplification, envelope clipping and
//!   integer snapping used by the encoder pipeline.
//! - [`vector_tile`]: the MVT protobuf wire codec and the layer builder
//!   that turns geometries into conforming `.mvt` bytes.

pub mod geo;
pub use geo::*;

pub mod math;

pub mod vector_tile;
pub use vector_tile::*;
