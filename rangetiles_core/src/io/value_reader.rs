use crate::{Blob, Result, TilesError};
use byteorder::{ByteOrder, ReadBytesExt};
use std::io::{Read, Seek};

/// Alias for readers that can both seek and read, used by the default
/// method implementations below.
pub trait SeekRead: Seek + Read {}

impl<T: Seek + Read> SeekRead for T {}

fn truncated(what: &str) -> TilesError {
	TilesError::Io(std::io::Error::new(
		std::io::ErrorKind::UnexpectedEof,
		format!("truncated input while reading {what}"),
	))
}

/// Reads primitives, varints and protobuf fragments from a byte source
/// with a fixed byte order. The directory codec, the archive header and
/// the MVT codec are all written against this trait.
pub trait ValueReader<'a, E: ByteOrder + 'a> {
	fn get_reader(&mut self) -> &mut dyn SeekRead;

	/// Total length of the readable data.
	fn len(&self) -> u64;

	fn position(&mut self) -> u64;

	fn set_position(&mut self, position: u64) -> Result<()>;

	/// A sub-reader over the next length-delimited (varint-prefixed) region;
	/// the parent position advances past it.
	fn get_pbf_sub_reader<'b>(&'b mut self) -> Result<Box<dyn ValueReader<'b, E> + 'b>>;

	fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn remaining(&mut self) -> u64 {
		self.len() - self.position()
	}

	fn has_remaining(&mut self) -> bool {
		self.remaining() > 0
	}

	/// Reads an unsigned base-128 varint.
	fn read_varint(&mut self) -> Result<u64> {
		let mut value: u64 = 0;
		let mut shift = 0;
		loop {
			let byte = self.get_reader().read_u8().map_err(|_| truncated("varint"))?;
			value |= (u64::from(byte) & 0x7F) << shift;
			if byte & 0x80 == 0 {
				break;
			}
			shift += 7;
			if shift >= 70 {
				return Err(truncated("varint (too many continuation bytes)"));
			}
		}
		Ok(value)
	}

	/// Reads a zigzag-encoded signed varint.
	fn read_svarint(&mut self) -> Result<i64> {
		let value = self.read_varint()?;
		Ok(((value >> 1) as i64) ^ -((value & 1) as i64))
	}

	fn read_u8(&mut self) -> Result<u8> {
		Ok(self.get_reader().read_u8()?)
	}

	fn read_u16(&mut self) -> Result<u16> {
		Ok(self.get_reader().read_u16::<E>()?)
	}

	fn read_u32(&mut self) -> Result<u32> {
		Ok(self.get_reader().read_u32::<E>()?)
	}

	fn read_u64(&mut self) -> Result<u64> {
		Ok(self.get_reader().read_u64::<E>()?)
	}

	fn read_i32(&mut self) -> Result<i32> {
		Ok(self.get_reader().read_i32::<E>()?)
	}

	fn read_i64(&mut self) -> Result<i64> {
		Ok(self.get_reader().read_i64::<E>()?)
	}

	fn read_f32(&mut self) -> Result<f32> {
		Ok(self.get_reader().read_f32::<E>()?)
	}

	fn read_f64(&mut self) -> Result<f64> {
		Ok(self.get_reader().read_f64::<E>()?)
	}

	fn read_blob(&mut self, length: u64) -> Result<Blob> {
		let mut blob = Blob::new_sized(length as usize);
		self
			.get_reader()
			.read_exact(blob.as_mut_slice())
			.map_err(|_| truncated("blob"))?;
		Ok(blob)
	}

	fn read_string(&mut self, length: u64) -> Result<String> {
		let mut buffer = vec![0u8; length as usize];
		self
			.get_reader()
			.read_exact(&mut buffer)
			.map_err(|_| truncated("string"))?;
		String::from_utf8(buffer)
			.map_err(|e| TilesError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
	}

	/// Reads a protobuf key, returning `(field_number, wire_type)`.
	fn read_pbf_key(&mut self) -> Result<(u32, u8)> {
		let value = self.read_varint()?;
		Ok(((value >> 3) as u32, (value & 0x07) as u8))
	}

	/// Reads a length-delimited string.
	fn read_pbf_string(&mut self) -> Result<String> {
		let length = self.read_varint()?;
		self.read_string(length)
	}

	/// Reads a length-delimited blob.
	fn read_pbf_blob(&mut self) -> Result<Blob> {
		let length = self.read_varint()?;
		self.read_blob(length)
	}

	/// Reads a packed repeated field of u32 varints.
	fn read_pbf_packed_uint32(&mut self) -> Result<Vec<u32>> {
		let mut reader = self.get_pbf_sub_reader()?;
		let mut values = Vec::new();
		while reader.has_remaining() {
			values.push(reader.read_varint()? as u32);
		}
		Ok(values)
	}
}

#[cfg(test)]
mod tests {
	use super::super::ValueReaderSlice;
	use super::*;

	#[test]
	fn varints() -> Result<()> {
		let data = [0b10101100u8, 0b00000010, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(reader.read_varint()?, 300);
		assert_eq!(reader.read_varint()?, 0);
		assert_eq!(reader.read_varint()?, u64::from(u32::MAX));
		Ok(())
	}

	#[test]
	fn svarints() -> Result<()> {
		let data = [0x01u8, 0x02, 0x95, 0x01];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(reader.read_svarint()?, -1);
		assert_eq!(reader.read_svarint()?, 1);
		assert_eq!(reader.read_svarint()?, -75);
		Ok(())
	}

	#[test]
	fn truncated_varint_fails() {
		let data = [0x80u8, 0x80];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert!(reader.read_varint().is_err());
	}

	#[test]
	fn endianness() -> Result<()> {
		let data = [0x01u8, 0x02, 0x03, 0x04];
		assert_eq!(ValueReaderSlice::new_le(&data).read_u16()?, 0x0201);
		assert_eq!(ValueReaderSlice::new_be(&data).read_u16()?, 0x0102);
		Ok(())
	}

	#[test]
	fn pbf_key() -> Result<()> {
		let data = [0x08u8];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(reader.read_pbf_key()?, (1, 0));
		Ok(())
	}

	#[test]
	fn pbf_packed_uint32() -> Result<()> {
		let data = [0x04u8, 100, 0x96, 0x01, 0xAC, 0x02];
		let mut reader = ValueReaderSlice::new_le(&data);
		assert_eq!(reader.read_pbf_packed_uint32()?, vec![100, 150, 300]);
		Ok(())
	}
}
