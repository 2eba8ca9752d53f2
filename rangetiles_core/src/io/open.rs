use super::{
	DataReader, DataReaderBlockAligned, DataReaderDiskCache, DataReaderFile, DataReaderHttp,
	DataReaderMemoryCache, DataReaderObjectStore, HttpAuth,
};
use crate::{Result, TilesError};
use object_store::aws::AmazonS3Builder;
use object_store::azure::{AzureConfigKey, MicrosoftAzureBuilder};
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::path::Path as ObjectPath;
use reqwest::Url;
use std::path::{Path, PathBuf};

/// Disk cache placement for remote sources.
#[derive(Clone, Debug)]
pub struct DiskCacheOptions {
	/// Directory holding the chunk files.
	pub directory: PathBuf,
	/// Distinguishes sources sharing one cache directory.
	pub source_id: String,
}

/// How to open and decorate a byte-range source.
#[derive(Clone, Debug)]
pub struct ReaderOptions {
	/// Wrap remote sources in an in-memory LRU cache.
	pub enable_memory_cache: bool,
	/// Approximate byte budget of the memory cache.
	pub memory_cache_size: usize,
	/// Block size of reads feeding the memory cache. Power of two.
	pub block_size_mem: u64,
	/// Enable the chunked on-disk cache for remote sources.
	pub disk_cache: Option<DiskCacheOptions>,
	/// Chunk size of the disk cache. Power of two.
	pub block_size_disk: u64,
	/// Accept invalid TLS certificates on HTTPS sources.
	pub trust_all_certificates: bool,
	/// HTTP authentication.
	pub http_auth: HttpAuth,
	/// Region for `s3://` sources; falls back to the environment.
	pub aws_region: Option<String>,
	/// Shared-access signature for `azure://` sources.
	pub azure_sas: Option<String>,
}

impl Default for ReaderOptions {
	fn default() -> Self {
		ReaderOptions {
			enable_memory_cache: true,
			memory_cache_size: 32 * 1024 * 1024,
			block_size_mem: 16 * 1024,
			disk_cache: None,
			block_size_disk: 64 * 1024,
			trust_all_certificates: false,
			http_auth: HttpAuth::None,
			aws_region: None,
			azure_sas: None,
		}
	}
}

/// Opens `location` as a byte-range source.
///
/// `http://`, `https://`, `s3://bucket/key`, `azure://account/container/blob`
/// and `gs://bucket/object` route to their backends; anything else is a
/// local path, unless it does not exist but looks like a URL, in which case
/// `https://` is assumed. Remote sources are wrapped in the cache stack the
/// options describe.
pub async fn open_data_reader(location: &str, options: &ReaderOptions) -> Result<DataReader> {
	if location.starts_with("http://") || location.starts_with("https://") {
		return open_http(location, options).await;
	}
	if let Some(rest) = location.strip_prefix("s3://") {
		return open_s3(location, rest, options).await;
	}
	if let Some(rest) = location.strip_prefix("gs://") {
		return open_gcs(location, rest, options).await;
	}
	if let Some(rest) = location.strip_prefix("azure://") {
		return open_azure(location, rest, options).await;
	}

	let path = Path::new(location);
	if path.exists() {
		let reader: DataReader = DataReaderFile::open(path)?;
		return Ok(reader);
	}
	if looks_like_url(location) {
		return open_http(&format!("https://{location}"), options).await;
	}
	Err(TilesError::ObjectNotFound(location.to_string()))
}

/// A scheme-less location is treated as a URL when it contains both a dot
/// and a slash and neither whitespace nor backslashes.
pub fn looks_like_url(location: &str) -> bool {
	location.contains('.')
		&& location.contains('/')
		&& !location.contains(char::is_whitespace)
		&& !location.contains('\\')
}

async fn open_http(url: &str, options: &ReaderOptions) -> Result<DataReader> {
	let url = Url::parse(url).map_err(|e| TilesError::ObjectNotFound(format!("{url}: {e}")))?;
	let reader = DataReaderHttp::open(url, options.trust_all_certificates, options.http_auth.clone()).await?;
	wrap_remote(reader, options)
}

fn split_bucket_and_key<'a>(location: &str, rest: &'a str) -> Result<(&'a str, &'a str)> {
	rest
		.split_once('/')
		.filter(|(bucket, key)| !bucket.is_empty() && !key.is_empty())
		.ok_or_else(|| TilesError::ObjectNotFound(format!("{location}: expected <bucket>/<key>")))
}

async fn open_s3(location: &str, rest: &str, options: &ReaderOptions) -> Result<DataReader> {
	let (bucket, key) = split_bucket_and_key(location, rest)?;
	let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
	if let Some(region) = &options.aws_region {
		builder = builder.with_region(region.as_str());
	}
	let store = builder.build()?;
	let reader = DataReaderObjectStore::open(Box::new(store), ObjectPath::from(key), location.to_string()).await?;
	wrap_remote(reader, options)
}

async fn open_gcs(location: &str, rest: &str, options: &ReaderOptions) -> Result<DataReader> {
	let (bucket, object) = split_bucket_and_key(location, rest)?;
	let store = GoogleCloudStorageBuilder::from_env().with_bucket_name(bucket).build()?;
	let reader =
		DataReaderObjectStore::open(Box::new(store), ObjectPath::from(object), location.to_string()).await?;
	wrap_remote(reader, options)
}

async fn open_azure(location: &str, rest: &str, options: &ReaderOptions) -> Result<DataReader> {
	// azure://account/container/blob
	let (account, rest) = rest
		.split_once('/')
		.ok_or_else(|| TilesError::ObjectNotFound(format!("{location}: expected <account>/<container>/<blob>")))?;
	let (container, blob) = split_bucket_and_key(location, rest)?;

	let mut builder = MicrosoftAzureBuilder::from_env()
		.with_account(account)
		.with_container_name(container);
	if let Some(sas) = &options.azure_sas {
		builder = builder.with_config(AzureConfigKey::SasKey, sas.as_str());
	}
	let store = builder.build()?;
	let reader = DataReaderObjectStore::open(Box::new(store), ObjectPath::from(blob), location.to_string()).await?;
	wrap_remote(reader, options)
}

/// Builds the cache stack over a remote source:
/// `MemoryCache(BlockAligned(DiskCache(BlockAligned(remote))))`, subject to
/// the options' toggles.
fn wrap_remote(mut reader: DataReader, options: &ReaderOptions) -> Result<DataReader> {
	if let Some(disk) = &options.disk_cache {
		reader = DataReaderBlockAligned::new(reader, options.block_size_disk)?;
		reader = DataReaderDiskCache::new(reader, &disk.directory, &disk.source_id, options.block_size_disk)?;
	}
	if options.enable_memory_cache {
		reader = DataReaderBlockAligned::new(reader, options.block_size_mem)?;
		reader = DataReaderMemoryCache::new(reader, options.memory_cache_size);
	}
	Ok(reader)
}
