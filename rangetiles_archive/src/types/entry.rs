use rangetiles_core::ByteRange;

/// One directory entry.
///
/// `run_length > 0` marks a tile entry: the body at `range` (relative to
/// the tile-data section) serves `run_length` consecutive tile ids starting
/// at `tile_id`. `run_length == 0` marks a pointer to a leaf directory at
/// `range` inside the leaf-directories section.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntryV3 {
	pub tile_id: u64,
	pub range: ByteRange,
	pub run_length: u32,
}

impl EntryV3 {
	pub fn new(tile_id: u64, range: ByteRange, run_length: u32) -> Self {
		Self {
			tile_id,
			range,
			run_length,
		}
	}

	pub fn is_tile(&self) -> bool {
		self.run_length > 0
	}

	pub fn is_leaf(&self) -> bool {
		self.run_length == 0
	}

	/// One past the last tile id a tile entry serves.
	pub fn id_end(&self) -> u64 {
		self.tile_id + u64::from(self.run_length)
	}
}
