use super::{DataReaderTrait, clamp_range};
use crate::{Blob, ByteRange, Result, TilesError};
use async_trait::async_trait;
use std::fs::File;
use std::path::Path;

/// A byte-range source over a local file.
///
/// One handle is shared by all readers; ranges are served with positional
/// reads, so no seek state exists to race on.
#[derive(Debug)]
pub struct DataReaderFile {
	name: String,
	file: File,
	size: u64,
}

impl DataReaderFile {
	/// Opens a file as a byte-range source.
	pub fn open(path: &Path) -> Result<Box<DataReaderFile>> {
		if !path.exists() || !path.is_file() {
			return Err(TilesError::ObjectNotFound(path.to_string_lossy().to_string()));
		}
		let path = path.canonicalize()?;
		let file = File::open(&path)?;
		let size = file.metadata()?.len();

		Ok(Box::new(DataReaderFile {
			name: path.to_string_lossy().to_string(),
			file,
			size,
		}))
	}

	fn read_at(&self, offset: u64, buffer: &mut [u8]) -> Result<()> {
		#[cfg(unix)]
		{
			use std::os::unix::fs::FileExt;
			self.file.read_exact_at(buffer, offset)?;
		}
		#[cfg(windows)]
		{
			use std::os::windows::fs::FileExt;
			let mut done = 0;
			while done < buffer.len() {
				let n = self.file.seek_read(&mut buffer[done..], offset + done as u64)?;
				if n == 0 {
					return Err(TilesError::Io(std::io::Error::from(std::io::ErrorKind::UnexpectedEof)));
				}
				done += n;
			}
		}
		Ok(())
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderFile {
	fn get_size(&self) -> u64 {
		self.size
	}

	fn get_name(&self) -> &str {
		&self.name
	}

	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let clamped = clamp_range(range, self.size);
		let mut blob = Blob::new_sized(clamped.length as usize);
		self.read_at(clamped.offset, blob.as_mut_slice())?;
		Ok(blob)
	}

	async fn read_range_into(&self, range: &ByteRange, buffer: &mut Vec<u8>) -> Result<usize> {
		let clamped = clamp_range(range, self.size);
		let start = buffer.len();
		buffer.resize(start + clamped.length as usize, 0);
		self.read_at(clamped.offset, &mut buffer[start..])?;
		Ok(clamped.length as usize)
	}
}
