pub mod embedding;
pub mod structured;

mod error;

pub use error::{Error, Result};

use reqwest::{
	RequestBuilder,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

const MAX_ERROR_BODY_CHARS: usize = 512;

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub fn endpoint(api_base: &str, path: &str) -> String {
	format!("{}/{}", api_base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Sends the request and decodes a JSON body, turning non-success statuses into
/// [`Error::Status`] with a truncated body for diagnostics.
pub(crate) async fn send_json(request: RequestBuilder) -> Result<Value> {
	let res = request.send().await?;
	let status = res.status();

	if !status.is_success() {
		let body = res.text().await.unwrap_or_default();
		let body = body.chars().take(MAX_ERROR_BODY_CHARS).collect();

		return Err(Error::Status { status, body });
	}

	Ok(res.json().await?)
}
