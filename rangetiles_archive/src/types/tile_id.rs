//! The 64-bit tile id: every tile across all zoom levels gets one number,
//! assigned by walking the Hilbert curve of its zoom level and adding the
//! cumulative tile count of the levels below. Spatially close tiles get
//! close ids, which is what makes clustered archives range-friendly.

use rangetiles_core::{MAX_ZOOM_LEVEL, Result, TileCoord, TilesError};

/// First tile id of zoom level `z`: the number of tiles in all levels
/// below, `(4^z - 1) / 3`.
pub fn zoom_base(z: u8) -> u64 {
	((1u64 << (2 * u32::from(z))) - 1) / 3
}

/// One past the largest valid tile id (the base of zoom 27).
pub const MAX_TILE_ID: u64 = ((1u64 << 54) - 1) / 3;

fn rotate(s: u64, x: &mut u64, y: &mut u64, rx: u64, ry: u64) {
	if ry == 0 {
		if rx == 1 {
			*x = s - 1 - *x;
			*y = s - 1 - *y;
		}
		std::mem::swap(x, y);
	}
}

/// Maps a tile coordinate to its tile id.
pub fn coord_to_tile_id(coord: &TileCoord) -> Result<u64> {
	let n = 1u64 << coord.z;
	if coord.z > MAX_ZOOM_LEVEL || u64::from(coord.x) >= n || u64::from(coord.y) >= n {
		return Err(TilesError::InvalidCoord {
			z: coord.z,
			x: coord.x,
			y: coord.y,
		});
	}

	let mut tx = u64::from(coord.x);
	let mut ty = u64::from(coord.y);
	let mut d: u64 = 0;
	let mut s = n / 2;
	while s > 0 {
		let rx = u64::from((tx & s) > 0);
		let ry = u64::from((ty & s) > 0);
		d += s * s * ((3 * rx) ^ ry);
		rotate(s, &mut tx, &mut ty, rx, ry);
		s /= 2;
	}

	Ok(zoom_base(coord.z) + d)
}

/// Maps a tile id back to its coordinate. Exact inverse of
/// [`coord_to_tile_id`].
pub fn tile_id_to_coord(tile_id: u64) -> Result<TileCoord> {
	if tile_id >= MAX_TILE_ID {
		return Err(TilesError::InvalidTileId(tile_id));
	}

	let mut z = 0u8;
	while zoom_base(z + 1) <= tile_id {
		z += 1;
	}

	let n = 1u64 << z;
	let mut t = tile_id - zoom_base(z);
	let mut x: u64 = 0;
	let mut y: u64 = 0;
	let mut s: u64 = 1;
	while s < n {
		let rx = (t / 2) & 1;
		let ry = (t ^ rx) & 1;
		rotate(s, &mut x, &mut y, rx, ry);
		if rx == 1 {
			x += s;
		}
		if ry == 1 {
			y += s;
		}
		t /= 4;
		s *= 2;
	}

	TileCoord::new(z, x as u32, y as u32)
}
