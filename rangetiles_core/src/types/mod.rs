//! Value types shared across the workspace: byte buffers and ranges, tile
//! coordinates and bounding boxes, geographic extents, codec selectors.

mod blob;
mod byte_range;
mod geo_bbox;
mod geo_center;
mod limited_cache;
mod tile_bbox;
mod tile_bbox_pyramid;
mod tile_compression;
mod tile_coord;
mod tile_format;

pub use blob::*;
pub use byte_range::*;
pub use geo_bbox::*;
pub use geo_center::*;
pub use limited_cache::*;
pub use tile_bbox::*;
pub use tile_bbox_pyramid::*;
pub use tile_compression::*;
pub use tile_coord::*;
pub use tile_format::*;
