use super::{DataReaderTrait, clamp_range};
use crate::{Blob, ByteRange, Result};
use async_trait::async_trait;

/// An in-memory byte-range source. Used by tests and by `join` when an
/// archive has already been materialized.
#[derive(Debug)]
pub struct DataReaderBlob {
	blob: Blob,
}

impl DataReaderBlob {
	pub fn new(blob: Blob) -> Box<DataReaderBlob> {
		Box::new(DataReaderBlob { blob })
	}

	pub fn len(&self) -> usize {
		self.blob.as_slice().len()
	}

	pub fn is_empty(&self) -> bool {
		self.blob.is_empty()
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderBlob {
	fn get_size(&self) -> u64 {
		self.blob.len()
	}

	fn get_name(&self) -> &str {
		"memory"
	}

	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let clamped = clamp_range(range, self.blob.len());
		Ok(Blob::from(self.blob.range(clamped.as_range_usize())))
	}
}

impl From<Blob> for DataReaderBlob {
	fn from(blob: Blob) -> Self {
		DataReaderBlob { blob }
	}
}

impl From<Vec<u8>> for DataReaderBlob {
	fn from(data: Vec<u8>) -> Self {
		DataReaderBlob { blob: Blob::from(data) }
	}
}
