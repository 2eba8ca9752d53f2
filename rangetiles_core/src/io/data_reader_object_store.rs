use super::{DataReaderTrait, clamp_range};
use crate::{Blob, ByteRange, Result, TilesError};
use async_trait::async_trait;
use object_store::ObjectStore;
use object_store::ObjectStoreExt;
use object_store::path::Path as ObjectPath;
use std::fmt::{self, Debug};

/// A byte-range source over an `object_store` backend, which covers
/// `s3://bucket/key`, `azure://account/container/blob` and
/// `gs://bucket/object` with one native byte-range primitive.
///
/// Opening issues a `head` request so that a missing object fails early
/// with `ObjectNotFound` and the size is known for read clamping.
pub struct DataReaderObjectStore {
	store: Box<dyn ObjectStore>,
	path: ObjectPath,
	name: String,
	size: u64,
}

impl DataReaderObjectStore {
	/// Validates the object exists and records its size.
	pub async fn open(store: Box<dyn ObjectStore>, path: ObjectPath, name: String) -> Result<Box<DataReaderObjectStore>> {
		let meta = store.head(&path).await.map_err(|error| match error {
			object_store::Error::NotFound { .. } => TilesError::ObjectNotFound(name.clone()),
			other => TilesError::from(other),
		})?;

		Ok(Box::new(DataReaderObjectStore {
			store,
			path,
			name,
			size: meta.size as u64,
		}))
	}
}

impl Debug for DataReaderObjectStore {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("DataReaderObjectStore")
			.field("name", &self.name)
			.field("size", &self.size)
			.finish()
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderObjectStore {
	fn get_size(&self) -> u64 {
		self.size
	}

	fn get_name(&self) -> &str {
		&self.name
	}

	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let clamped = clamp_range(range, self.size);
		if clamped.length == 0 {
			return Ok(Blob::new_empty());
		}
		let bytes = self.store.get_range(&self.path, clamped.offset..clamped.end()).await?;
		Ok(Blob::from(bytes.as_ref()))
	}
}
