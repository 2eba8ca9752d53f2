use crate::{Blob, ByteRange, Result};

/// An append-position output target for archive assembly.
///
/// The archive writer emits sections through this trait so that tests can
/// build archives in memory while production code streams to files.
pub trait DataWriterTrait: Send {
	/// Writes `blob` at the current position and returns where it landed.
	fn append(&mut self, blob: &Blob) -> Result<ByteRange>;

	/// Writes `blob` at position 0 without moving the current position.
	/// Used to patch the header after the body is finished.
	fn write_start(&mut self, blob: &Blob) -> Result<()>;

	fn get_position(&mut self) -> Result<u64>;

	fn set_position(&mut self, position: u64) -> Result<()>;
}
