use super::DataWriterTrait;
use crate::{Blob, ByteRange, Result};
use std::fs::File;
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

/// A buffered data writer over a file, created fresh at `from_path`.
pub struct DataWriterFile {
	writer: BufWriter<File>,
}

impl DataWriterFile {
	pub fn from_path(path: &Path) -> Result<DataWriterFile> {
		Ok(DataWriterFile {
			writer: BufWriter::new(File::create(path)?),
		})
	}

	/// Flushes buffered bytes to disk.
	pub fn finish(mut self) -> Result<()> {
		self.writer.flush()?;
		Ok(())
	}
}

impl DataWriterTrait for DataWriterFile {
	fn append(&mut self, blob: &Blob) -> Result<ByteRange> {
		let pos = self.writer.stream_position()?;
		self.writer.write_all(blob.as_slice())?;
		Ok(ByteRange::new(pos, blob.len()))
	}

	fn write_start(&mut self, blob: &Blob) -> Result<()> {
		let pos = self.writer.stream_position()?;
		self.writer.rewind()?;
		self.writer.write_all(blob.as_slice())?;
		self.writer.seek(SeekFrom::Start(pos))?;
		Ok(())
	}

	fn get_position(&mut self) -> Result<u64> {
		Ok(self.writer.stream_position()?)
	}

	fn set_position(&mut self, position: u64) -> Result<()> {
		self.writer.seek(SeekFrom::Start(position))?;
		Ok(())
	}
}
