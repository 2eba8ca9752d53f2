use super::ByteRange;
use crate::{Result, TilesError};
use std::fmt::{self, Debug};
use std::ops::Range;

/// An owned byte buffer.
///
/// Thin wrapper around `Vec<u8>` that every layer passes around instead of
/// raw vectors: tile bodies, directory blobs, metadata, wire fragments.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	/// An empty blob.
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// A zero-filled blob of the given size.
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	pub fn as_slice(&self) -> &[u8] {
		self.0.as_slice()
	}

	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		self.0.as_mut_slice()
	}

	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Interprets the content as UTF-8, lossily.
	pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
		String::from_utf8_lossy(&self.0)
	}

	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns the bytes in `range` as a slice.
	///
	/// Panics if the range is out of bounds; use [`Blob::read_range`] for a
	/// checked variant.
	pub fn range(&self, range: Range<usize>) -> &[u8] {
		&self.0[range]
	}

	/// Returns a new blob with the bytes of `range`, or
	/// [`TilesError::DirectoryCorrupt`] if the range leaves the buffer.
	pub fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		if range.offset + range.length > self.len() {
			return Err(TilesError::DirectoryCorrupt(format!(
				"range {range} outside of blob with {} bytes",
				self.len()
			)));
		}
		Ok(Blob::from(&self.0[range.as_range_usize()]))
	}

	/// Hex dump used in tests, bytes separated by spaces.
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|b| format!("{b:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Blob({} bytes)", self.0.len())
	}
}

impl From<Vec<u8>> for Blob {
	fn from(value: Vec<u8>) -> Self {
		Blob(value)
	}
}

impl From<&[u8]> for Blob {
	fn from(value: &[u8]) -> Self {
		Blob(value.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(value: &[u8; N]) -> Self {
		Blob(value.to_vec())
	}
}

impl From<&str> for Blob {
	fn from(value: &str) -> Self {
		Blob(value.as_bytes().to_vec())
	}
}

impl From<String> for Blob {
	fn from(value: String) -> Self {
		Blob(value.into_bytes())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn basics() {
		let blob = Blob::from(&[0u8, 1, 2, 3, 4, 5, 6, 7]);
		assert_eq!(blob.len(), 8);
		assert_eq!(blob.range(2..5), &[2, 3, 4]);
		assert_eq!(blob.clone().into_vec(), vec![0, 1, 2, 3, 4, 5, 6, 7]);
		assert!(!blob.is_empty());
		assert!(Blob::new_empty().is_empty());
	}

	#[test]
	fn read_range_checks_bounds() {
		let blob = Blob::from("abcdef");
		assert_eq!(blob.read_range(&ByteRange::new(2, 3)).unwrap().as_str(), "cde");
		assert!(blob.read_range(&ByteRange::new(4, 3)).is_err());
	}

	#[test]
	fn string_round_trip() {
		let blob = Blob::from("Xylofön");
		assert_eq!(blob.as_str(), "Xylofön");
	}

	#[test]
	fn hex_and_debug() {
		let blob = Blob::from(&[0x0au8, 0xff]);
		assert_eq!(blob.as_hex(), "0a ff");
		assert_eq!(format!("{blob:?}"), "Blob(2 bytes)");
	}
}
