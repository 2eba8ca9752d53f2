use crate::geo::GeoValue;
use byteorder::LE;
use rangetiles_core::io::{ValueReader, ValueWriter, ValueWriterBlob};
use rangetiles_core::{Blob, Result, TilesError};

/// PBF codec for attribute values. Strings are field 1, floats 2, doubles
/// 3, signed ints zigzag-encoded as field 6, unsigned ints field 5, bools
/// field 7. Field 4 (plain int64) is accepted on read for compatibility.
pub trait GeoValuePBF<'a> {
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue>;
	fn to_blob(&self) -> Result<Blob>;
}

impl<'a> GeoValuePBF<'a> for GeoValue {
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue> {
		use GeoValue::*;
		let mut value: Option<GeoValue> = None;

		while reader.has_remaining() {
			value = Some(match reader.read_pbf_key()? {
				(1, 2) => String(reader.read_pbf_string()?),
				(2, 5) => Float(reader.read_f32()?),
				(3, 1) => Double(reader.read_f64()?),
				(4, 0) => Int(reader.read_varint()? as i64),
				(5, 0) => UInt(reader.read_varint()?),
				(6, 0) => Int(reader.read_svarint()?),
				(7, 0) => Bool(reader.read_varint()? != 0),
				(f, w) => {
					return Err(TilesError::MalformedVectorTile(format!(
						"unexpected value field {f} with wire type {w}"
					)));
				}
			})
		}

		value.ok_or_else(|| TilesError::MalformedVectorTile("empty value message".to_string()))
	}

	fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		match self {
			GeoValue::String(v) => {
				writer.write_pbf_key(1, 2)?;
				writer.write_pbf_string(v)?;
			}
			GeoValue::Float(v) => {
				writer.write_pbf_key(2, 5)?;
				writer.write_f32(*v)?;
			}
			GeoValue::Double(v) => {
				writer.write_pbf_key(3, 1)?;
				writer.write_f64(*v)?;
			}
			GeoValue::UInt(v) => {
				writer.write_pbf_key(5, 0)?;
				writer.write_varint(*v)?;
			}
			GeoValue::Int(v) => {
				writer.write_pbf_key(6, 0)?;
				writer.write_svarint(*v)?;
			}
			GeoValue::Bool(v) => {
				writer.write_pbf_key(7, 0)?;
				writer.write_varint(u64::from(*v))?;
			}
		}

		Ok(writer.into_blob())
	}
}
