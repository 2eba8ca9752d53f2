use std::fmt::{self, Debug};
use std::hash::{Hash, Hasher};

/// An attribute value of a vector tile feature.
#[derive(Clone, PartialEq)]
pub enum GeoValue {
	String(String),
	Float(f32),
	Double(f64),
	Int(i64),
	UInt(u64),
	Bool(bool),
}

impl Eq for GeoValue {}

impl Hash for GeoValue {
	fn hash<H: Hasher>(&self, state: &mut H) {
		match self {
			GeoValue::String(v) => {
				state.write_u8(0);
				v.hash(state);
			}
			GeoValue::Float(v) => {
				state.write_u8(1);
				v.to_bits().hash(state);
			}
			GeoValue::Double(v) => {
				state.write_u8(2);
				v.to_bits().hash(state);
			}
			GeoValue::Int(v) => {
				state.write_u8(3);
				v.hash(state);
			}
			GeoValue::UInt(v) => {
				state.write_u8(4);
				v.hash(state);
			}
			GeoValue::Bool(v) => {
				state.write_u8(5);
				v.hash(state);
			}
		}
	}
}

impl Debug for GeoValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			GeoValue::String(v) => write!(f, "String({v:?})"),
			GeoValue::Float(v) => write!(f, "Float({v})"),
			GeoValue::Double(v) => write!(f, "Double({v})"),
			GeoValue::Int(v) => write!(f, "Int({v})"),
			GeoValue::UInt(v) => write!(f, "UInt({v})"),
			GeoValue::Bool(v) => write!(f, "Bool({v})"),
		}
	}
}

impl From<&str> for GeoValue {
	fn from(value: &str) -> Self {
		GeoValue::String(value.to_string())
	}
}

impl From<String> for GeoValue {
	fn from(value: String) -> Self {
		GeoValue::String(value)
	}
}

impl From<f32> for GeoValue {
	fn from(value: f32) -> Self {
		GeoValue::Float(value)
	}
}

impl From<f64> for GeoValue {
	fn from(value: f64) -> Self {
		GeoValue::Double(value)
	}
}

impl From<i32> for GeoValue {
	fn from(value: i32) -> Self {
		GeoValue::Int(i64::from(value))
	}
}

impl From<i64> for GeoValue {
	fn from(value: i64) -> Self {
		GeoValue::Int(value)
	}
}

impl From<u32> for GeoValue {
	fn from(value: u32) -> Self {
		GeoValue::UInt(u64::from(value))
	}
}

impl From<u64> for GeoValue {
	fn from(value: u64) -> Self {
		GeoValue::UInt(value)
	}
}

impl From<bool> for GeoValue {
	fn from(value: bool) -> Self {
		GeoValue::Bool(value)
	}
}
