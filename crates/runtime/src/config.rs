//! Backend location and request settings.

use std::time::Duration;

use url::Url;

use crate::endpoint::{API_PATH, Endpoint};
use crate::error::ConfigError;

/// Connect, request, and socket timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Environment variable holding the API URL.
pub const ENV_API_URL: &str = "EVC_API_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "EVC_API_KEY";

/// Where the backend lives and how to talk to it.
#[derive(Debug, Clone)]
pub struct ApiConfig {
	api_url: Url,
	api_key: Option<String>,
	timeout: Duration,
	accept_language: String,
}

impl ApiConfig {
	/// Creates a config for `api_url` with default settings.
	pub fn new(api_url: Url) -> Self {
		Self {
			api_url,
			api_key: None,
			timeout: DEFAULT_TIMEOUT,
			accept_language: "en".to_string(),
		}
	}

	/// Parses `api_url` and rejects URLs without a host.
	pub fn parse(api_url: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(api_url).map_err(|e| ConfigError::InvalidUrl {
			url: api_url.to_string(),
			reason: e.to_string(),
		})?;
		if url.host_str().is_none_or(str::is_empty) {
			return Err(ConfigError::MissingHost(api_url.to_string()));
		}
		Ok(Self::new(url))
	}

	/// Reads [`ENV_API_URL`] and [`ENV_API_KEY`].
	///
	/// Returns `Ok(None)` when no URL is set.
	pub fn from_env() -> Result<Option<Self>, ConfigError> {
		let Some(url) = std::env::var(ENV_API_URL).ok().filter(|v| !v.trim().is_empty()) else {
			return Ok(None);
		};
		let mut config = Self::parse(url.trim())?;
		if let Ok(key) = std::env::var(ENV_API_KEY) {
			config = config.with_api_key(key);
		}
		Ok(Some(config))
	}

	/// Sets the `ApiKey` header value.
	pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
		let key = key.into();
		self.api_key = (!key.is_empty()).then_some(key);
		self
	}

	/// Overrides [`DEFAULT_TIMEOUT`].
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// Sets the `Accept-Language` header value.
	pub fn with_accept_language(mut self, tag: impl Into<String>) -> Self {
		self.accept_language = tag.into();
		self
	}

	pub fn api_url(&self) -> &Url {
		&self.api_url
	}

	pub fn api_key(&self) -> Option<&str> {
		self.api_key.as_deref()
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	pub fn accept_language(&self) -> &str {
		&self.accept_language
	}

	/// Host of the backend, `None` when the URL cannot address one.
	pub fn host(&self) -> Option<&str> {
		self.api_url.host_str().filter(|h| !h.is_empty())
	}

	/// Path prefix in front of [`API_PATH`].
	///
	/// A configured URL may or may not already end in `/api/v1`; both forms
	/// address the same backend.
	pub fn base_path(&self) -> &str {
		let path = self.api_url.path().trim_end_matches('/');
		path.strip_suffix(API_PATH).unwrap_or(path)
	}

	/// Absolute URL for `endpoint`.
	pub fn endpoint_url(&self, endpoint: &Endpoint) -> Url {
		let mut url = self.api_url.clone();
		url.set_query(None);
		url.set_fragment(None);
		url.set_path(&format!("{}{}", self.base_path(), API_PATH));
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().extend(endpoint.segments());
		}
		url
	}
}
