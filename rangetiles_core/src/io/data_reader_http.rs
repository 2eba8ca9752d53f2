use super::{DataReaderTrait, clamp_range};
use crate::{Blob, ByteRange, Result, TilesError};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, RANGE};
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Authentication used by the HTTP byte-range source.
#[derive(Clone, Debug, Default)]
pub enum HttpAuth {
	#[default]
	None,
	Bearer(String),
	Basic { username: String, password: String },
}

/// A byte-range source over HTTP(S).
///
/// Opening issues a HEAD request to discover the object size and probe
/// `Accept-Ranges`. Ranges are fetched with `Range: bytes=a-b` requests and
/// validated against the `Content-Range` response header. A server that
/// answers a range request with the whole (larger) body is reported as
/// `RangeUnsupported`.
#[derive(Debug)]
pub struct DataReaderHttp {
	client: Client,
	name: String,
	url: Url,
	auth: HttpAuth,
	size: u64,
}

impl DataReaderHttp {
	/// Opens an HTTP(S) URL as a byte-range source.
	pub async fn open(url: Url, trust_all_certificates: bool, auth: HttpAuth) -> Result<Box<DataReaderHttp>> {
		match url.scheme() {
			"http" | "https" => (),
			_ => {
				return Err(TilesError::ObjectNotFound(format!("url has wrong scheme: {url}")));
			}
		}

		let client = Client::builder()
			.tcp_keepalive(Duration::from_secs(600))
			.timeout(Duration::from_secs(60))
			.danger_accept_invalid_certs(trust_all_certificates)
			.build()?;

		let request = apply_auth(client.head(url.clone()), &auth);
		let response = request.send().await?;

		if response.status() == StatusCode::NOT_FOUND {
			return Err(TilesError::ObjectNotFound(url.to_string()));
		}
		let response = response.error_for_status()?;

		if let Some(value) = response.headers().get(ACCEPT_RANGES) {
			if value.to_str().unwrap_or("") == "none" {
				return Err(TilesError::RangeUnsupported(url.to_string()));
			}
		} else {
			log::debug!("no Accept-Ranges header on {url}, trying range requests anyway");
		}

		let size = response
			.headers()
			.get(CONTENT_LENGTH)
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.parse::<u64>().ok())
			.ok_or_else(|| TilesError::RangeUnsupported(format!("no Content-Length on {url}")))?;

		Ok(Box::new(DataReaderHttp {
			client,
			name: url.to_string(),
			url,
			auth,
			size,
		}))
	}
}

fn apply_auth(request: reqwest::RequestBuilder, auth: &HttpAuth) -> reqwest::RequestBuilder {
	match auth {
		HttpAuth::None => request,
		HttpAuth::Bearer(token) => request.bearer_auth(token),
		HttpAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
	}
}

#[async_trait]
impl DataReaderTrait for DataReaderHttp {
	fn get_size(&self) -> u64 {
		self.size
	}

	fn get_name(&self) -> &str {
		&self.name
	}

	async fn read_range(&self, range: &ByteRange) -> Result<Blob> {
		let range = clamp_range(range, self.size);
		if range.length == 0 {
			return Ok(Blob::new_empty());
		}

		let request_range = format!("bytes={}-{}", range.offset, range.end() - 1);
		let request = apply_auth(self.client.get(self.url.clone()), &self.auth).header(RANGE, request_range);
		let response = request.send().await?;

		match response.status() {
			StatusCode::PARTIAL_CONTENT => {
				let content_range = response
					.headers()
					.get(CONTENT_RANGE)
					.and_then(|v| v.to_str().ok())
					.map(str::to_owned)
					.ok_or_else(|| {
						TilesError::RangeUnsupported(format!("no content-range header from {}", self.url))
					})?;

				lazy_static! {
					static ref RE_RANGE: Regex = RegexBuilder::new(r"^bytes (\d+)-(\d+)/(\d+|\*)$")
						.case_insensitive(true)
						.build()
						.unwrap();
				}
				let caps = RE_RANGE.captures(&content_range).ok_or_else(|| {
					TilesError::RangeUnsupported(format!("invalid content-range header: {content_range}"))
				})?;
				let start: u64 = caps[1].parse().unwrap_or(u64::MAX);
				let end: u64 = caps[2].parse().unwrap_or(0);
				if start != range.offset || end != range.end() - 1 {
					return Err(TilesError::RangeUnsupported(format!(
						"server answered range {range} with content-range {content_range}"
					)));
				}

				let bytes = response.bytes().await?;
				Ok(Blob::from(bytes.as_ref()))
			}
			StatusCode::NOT_FOUND => Err(TilesError::ObjectNotFound(self.url.to_string())),
			status => {
				let bytes = response.error_for_status()?.bytes().await?;
				// some servers ignore Range and return the whole object
				if bytes.len() as u64 > range.length {
					return Err(TilesError::RangeUnsupported(format!(
						"server answered a {}-byte range request with status {status} and {} bytes",
						range.length,
						bytes.len()
					)));
				}
				Ok(Blob::from(bytes.as_ref()))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn rejects_wrong_scheme() {
		let url = Url::parse("ftp://example.org/data.pmtiles").unwrap();
		let result = DataReaderHttp::open(url, false, HttpAuth::None).await;
		assert!(matches!(result, Err(TilesError::ObjectNotFound(_))));
	}

	#[test]
	fn auth_variants_build() {
		// only checks that the builders accept every variant
		let client = Client::new();
		for auth in [
			HttpAuth::None,
			HttpAuth::Bearer("token".to_string()),
			HttpAuth::Basic {
				username: "user".to_string(),
				password: "pass".to_string(),
			},
		] {
			let _request = apply_auth(client.get("http://localhost/"), &auth);
		}
	}
}
