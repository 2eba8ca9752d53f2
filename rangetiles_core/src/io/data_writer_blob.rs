use super::{DataReaderBlob, DataWriterTrait};
use crate::{Blob, ByteRange, Result};
use std::io::{Cursor, Seek, SeekFrom, Write};

/// An in-memory data writer. Convertible into a reader, which makes
/// write-then-read-back tests cheap.
#[derive(Clone, Default)]
pub struct DataWriterBlob {
	writer: Cursor<Vec<u8>>,
}

impl DataWriterBlob {
	pub fn new() -> DataWriterBlob {
		DataWriterBlob {
			writer: Cursor::new(Vec::new()),
		}
	}

	pub fn as_slice(&self) -> &[u8] {
		self.writer.get_ref().as_slice()
	}

	pub fn len(&self) -> usize {
		self.writer.get_ref().len()
	}

	pub fn is_empty(&self) -> bool {
		self.writer.get_ref().is_empty()
	}

	pub fn into_blob(self) -> Blob {
		Blob::from(self.writer.into_inner())
	}

	pub fn into_reader(self) -> Box<DataReaderBlob> {
		DataReaderBlob::new(self.into_blob())
	}
}

impl DataWriterTrait for DataWriterBlob {
	fn append(&mut self, blob: &Blob) -> Result<ByteRange> {
		let pos = self.writer.position();
		self.writer.write_all(blob.as_slice())?;
		Ok(ByteRange::new(pos, blob.len()))
	}

	fn write_start(&mut self, blob: &Blob) -> Result<()> {
		let pos = self.writer.position();
		self.writer.rewind()?;
		self.writer.write_all(blob.as_slice())?;
		self.writer.seek(SeekFrom::Start(pos))?;
		Ok(())
	}

	fn get_position(&mut self) -> Result<u64> {
		Ok(self.writer.position())
	}

	fn set_position(&mut self, position: u64) -> Result<()> {
		self.writer.seek(SeekFrom::Start(position))?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::io::DataReaderTrait;

	#[test]
	fn into_reader_round_trip() -> Result<()> {
		let mut writer = DataWriterBlob::new();
		writer.append(&Blob::from("round trip"))?;
		let reader = writer.into_reader();
		assert_eq!(reader.get_size(), 10);
		Ok(())
	}

	#[test]
	fn set_position_overwrites() -> Result<()> {
		let mut writer = DataWriterBlob::new();
		writer.append(&Blob::from("0123456789"))?;
		writer.set_position(4)?;
		writer.append(&Blob::from("xy"))?;
		assert_eq!(writer.into_blob().as_str(), "0123xy6789");
		Ok(())
	}
}
