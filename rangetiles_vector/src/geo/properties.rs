use super::GeoValue;
use std::collections::BTreeMap;
use std::fmt::{self, Debug};

/// Attributes of a feature: key-value pairs, ordered by key.
#[derive(Clone, Default, PartialEq)]
pub struct GeoProperties(BTreeMap<String, GeoValue>);

impl GeoProperties {
	pub fn new() -> Self {
		Self(BTreeMap::new())
	}

	pub fn insert(&mut self, key: String, value: GeoValue) {
		self.0.insert(key, value);
	}

	pub fn get(&self, key: &str) -> Option<&GeoValue> {
		self.0.get(key)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &GeoValue)> + '_ {
		self.0.iter()
	}
}

impl IntoIterator for GeoProperties {
	type Item = (String, GeoValue);
	type IntoIter = std::collections::btree_map::IntoIter<String, GeoValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}

impl<K: Into<String>> FromIterator<(K, GeoValue)> for GeoProperties {
	fn from_iter<T: IntoIterator<Item = (K, GeoValue)>>(iter: T) -> Self {
		Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}
}

impl Debug for GeoProperties {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.0.iter()).finish()
	}
}
