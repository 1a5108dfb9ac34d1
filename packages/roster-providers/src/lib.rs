//! OpenAI-compatible HTTP providers for query embeddings and term expansion.

pub mod embedding;
pub mod error;
pub mod expansion;

pub use error::{Error, Result};

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

/// Builds the shared connection pool used by every provider call.
///
/// Timeouts are applied per request from the provider configuration.
pub fn http_client() -> Result<Client> {
	Ok(Client::builder().build()?)
}

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

pub(crate) fn require_api_key(provider: &str, api_key: &str) -> Result<()> {
	if api_key.is_empty() {
		return Err(Error::InvalidConfig {
			message: format!("providers.{provider}.api_key is not configured."),
		});
	}

	Ok(())
}

pub(crate) fn endpoint(api_base: &str, path: &str) -> String {
	format!("{}/{}", api_base.trim_end_matches('/'), path.trim_start_matches('/'))
}
