use crate::geo::{GeoProperties, GeoValue};
use rangetiles_core::{Result, TilesError};
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// An insertion-ordered deduplication table: entries keep the index of
/// their first insertion.
#[derive(Clone, PartialEq)]
pub struct LookupTable<T>
where
	T: Clone + Eq + Hash,
{
	list: Vec<T>,
	index: HashMap<T, u32>,
}

impl<T: Clone + Eq + Hash> Default for LookupTable<T> {
	fn default() -> Self {
		Self {
			list: Vec::new(),
			index: HashMap::new(),
		}
	}
}

impl<T> LookupTable<T>
where
	T: Clone + Debug + Eq + Hash,
{
	pub fn new() -> Self {
		Self {
			list: Vec::new(),
			index: HashMap::new(),
		}
	}

	/// Returns the index of `entry`, inserting it if unseen.
	pub fn add(&mut self, entry: T) -> u32 {
		if let Some(index) = self.index.get(&entry) {
			return *index;
		}
		let index = self.list.len() as u32;
		self.index.insert(entry.clone(), index);
		self.list.push(entry);
		index
	}

	pub fn get(&self, id: u32) -> Result<&T> {
		self
			.list
			.get(id as usize)
			.ok_or_else(|| TilesError::MalformedVectorTile(format!("tag index {id} out of range")))
	}

	pub fn len(&self) -> usize {
		self.list.len()
	}

	pub fn is_empty(&self) -> bool {
		self.list.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
		self.list.iter()
	}
}

impl<T> Debug for LookupTable<T>
where
	T: Clone + Debug + Eq + Hash,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.list).finish()
	}
}

/// The per-layer key and value tables feature tags point into.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropertyManager {
	pub key: LookupTable<String>,
	pub val: LookupTable<GeoValue>,
}

impl PropertyManager {
	pub fn new() -> Self {
		Self {
			key: LookupTable::new(),
			val: LookupTable::new(),
		}
	}

	pub fn add_key(&mut self, key: String) -> u32 {
		self.key.add(key)
	}

	pub fn add_val(&mut self, value: GeoValue) -> u32 {
		self.val.add(value)
	}

	pub fn iter_key(&self) -> impl Iterator<Item = &String> + '_ {
		self.key.iter()
	}

	pub fn iter_val(&self) -> impl Iterator<Item = &GeoValue> + '_ {
		self.val.iter()
	}

	/// Encodes properties as alternating key/value indices.
	pub fn encode_tag_ids(&mut self, properties: GeoProperties) -> Vec<u32> {
		let mut tag_ids = Vec::with_capacity(properties.len() * 2);
		for (key, value) in properties {
			tag_ids.push(self.key.add(key));
			tag_ids.push(self.val.add(value));
		}
		tag_ids
	}

	/// Resolves alternating key/value indices back into properties.
	pub fn decode_tag_ids(&self, tag_ids: &[u32]) -> Result<GeoProperties> {
		if tag_ids.len() % 2 != 0 {
			return Err(TilesError::MalformedVectorTile(format!(
				"feature has {} tag ids, must be even",
				tag_ids.len()
			)));
		}
		let mut properties = GeoProperties::new();
		for pair in tag_ids.chunks(2) {
			properties.insert(self.key.get(pair[0])?.clone(), self.val.get(pair[1])?.clone());
		}
		Ok(properties)
	}
}
