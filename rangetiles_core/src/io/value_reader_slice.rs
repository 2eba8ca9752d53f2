use super::{SeekRead, ValueReader};
use crate::{Result, TilesError};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::io::{Cursor, Seek, SeekFrom};
use std::marker::PhantomData;

/// A `ValueReader` over a borrowed byte slice.
pub struct ValueReaderSlice<'a, E: ByteOrder> {
	_phantom: PhantomData<E>,
	cursor: Cursor<&'a [u8]>,
}

impl<'a, E: ByteOrder> ValueReaderSlice<'a, E> {
	pub fn new(slice: &'a [u8]) -> ValueReaderSlice<'a, E> {
		ValueReaderSlice {
			_phantom: PhantomData,
			cursor: Cursor::new(slice),
		}
	}
}

impl<'a> ValueReaderSlice<'a, LittleEndian> {
	pub fn new_le(slice: &'a [u8]) -> ValueReaderSlice<'a, LittleEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl<'a> ValueReaderSlice<'a, BigEndian> {
	pub fn new_be(slice: &'a [u8]) -> ValueReaderSlice<'a, BigEndian> {
		ValueReaderSlice::new(slice)
	}
}

impl<'a, E: ByteOrder + 'a> ValueReader<'a, E> for ValueReaderSlice<'a, E> {
	fn get_reader(&mut self) -> &mut dyn SeekRead {
		&mut self.cursor
	}

	fn len(&self) -> u64 {
		self.cursor.get_ref().len() as u64
	}

	fn position(&mut self) -> u64 {
		self.cursor.position()
	}

	fn set_position(&mut self, position: u64) -> Result<()> {
		if position > self.len() {
			return Err(TilesError::Io(std::io::Error::new(
				std::io::ErrorKind::UnexpectedEof,
				format!("cannot seek to {position} in {} bytes", self.len()),
			)));
		}
		self.cursor.seek(SeekFrom::Start(position))?;
		Ok(())
	}

	fn get_pbf_sub_reader<'b>(&'b mut self) -> Result<Box<dyn ValueReader<'b, E> + 'b>> {
		let length = self.read_varint()?;
		let start = self.position();
		let end = start + length;
		if end > self.len() {
			return Err(TilesError::Io(std::io::Error::new(
				std::io::ErrorKind::UnexpectedEof,
				"length-delimited region leaves the buffer",
			)));
		}
		let slice: &'a [u8] = *self.cursor.get_ref();
		self.set_position(end)?;
		Ok(Box::new(ValueReaderSlice::<E>::new(
			&slice[start as usize..end as usize],
		)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn positions() -> Result<()> {
		let data = [1u8, 2, 3, 4, 5];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(reader.len(), 5);
		assert_eq!(reader.position(), 0);
		assert_eq!(reader.read_u8()?, 1);
		assert_eq!(reader.position(), 1);
		reader.set_position(4)?;
		assert_eq!(reader.read_u8()?, 5);
		assert!(!reader.has_remaining());
		assert!(reader.set_position(6).is_err());
		Ok(())
	}

	#[test]
	fn sub_reader_advances_parent() -> Result<()> {
		// [len=3][a b c][0xFF]
		let data = [3u8, b'a', b'b', b'c', 0xFF];
		let mut reader = ValueReaderSlice::new_le(&data);
		{
			let mut sub = reader.get_pbf_sub_reader()?;
			assert_eq!(sub.len(), 3);
			assert_eq!(sub.read_u8()?, b'a');
		}
		assert_eq!(reader.read_u8()?, 0xFF);
		Ok(())
	}

	#[test]
	fn sub_reader_out_of_bounds() {
		let data = [10u8, 1, 2];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert!(reader.get_pbf_sub_reader().is_err());
	}
}
