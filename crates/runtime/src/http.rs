//! reqwest-backed [`SessionApi`] implementation.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use evc_protocol::{ApiProblem, ConnectSessionDescriptor, SessionInfo, SessionRequest};
use reqwest::header::{ACCEPT_LANGUAGE, CONTENT_TYPE};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::api::SessionApi;
use crate::auth::AccessTokenProvider;
use crate::config::ApiConfig;
use crate::endpoint::{Endpoint, Method};
use crate::error::{ApiFailure, ApiResult, ConfigError};

const HEADER_API_KEY: &str = "ApiKey";
const HEADER_CLIENT_VERSION: &str = "Evc-ClientVersion";
const HEADER_CORRELATION_ID: &str = "Evc-CorrelationId";
const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Talks to the backend over HTTPS with JSON bodies.
///
/// A 401 answer triggers one token renewal and a single retry.
pub struct HttpSessionApi {
	config: ApiConfig,
	client: reqwest::Client,
	tokens: Arc<dyn AccessTokenProvider>,
}

impl HttpSessionApi {
	/// Builds a client using the timeouts from `config`.
	pub fn new(config: ApiConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self, ConfigError> {
		let client = reqwest::Client::builder()
			.connect_timeout(config.timeout())
			.timeout(config.timeout())
			.build()
			.map_err(|e| ConfigError::Client(e.to_string()))?;
		Ok(Self { config, client, tokens })
	}

	pub fn config(&self) -> &ApiConfig {
		&self.config
	}

	/// Requests `endpoint`, renewing the access token once on 401.
	pub async fn request(&self, endpoint: &Endpoint) -> ApiResult<ConnectSessionDescriptor> {
		if self.config.host().is_none() {
			error!(target = "evc.api", "API host missing; configure an API url before starting sessions");
			return Err(ApiFailure::NotConfigured);
		}

		let token = self.tokens.access_token().await;
		match self.send(endpoint, token).await {
			Err(ApiFailure::Unauthorized) => match self.tokens.renew_access_token().await.filter(|t| !t.is_empty()) {
				Some(renewed) => {
					debug!(target = "evc.api", path = %endpoint.path(), "retrying with renewed access token");
					self.send(endpoint, Some(renewed)).await
				}
				None => Err(ApiFailure::Unauthorized),
			},
			other => other,
		}
	}

	async fn send(&self, endpoint: &Endpoint, token: Option<String>) -> ApiResult<ConnectSessionDescriptor> {
		let url = self.config.endpoint_url(endpoint);
		let mut builder = match endpoint.method() {
			Method::Get => self.client.get(url),
			Method::Post => self.client.post(url),
		};
		if let Some(body) = endpoint.body() {
			builder = builder.json(body);
		}
		if let Some(key) = self.config.api_key() {
			builder = builder.header(HEADER_API_KEY, key);
		}
		if let Some(token) = token.filter(|t| !t.is_empty()) {
			builder = builder.bearer_auth(token);
		}
		let correlation_id = Uuid::new_v4().to_string();
		builder = builder
			.header(ACCEPT_LANGUAGE, self.config.accept_language())
			.header(HEADER_CLIENT_VERSION, CLIENT_VERSION)
			.header(HEADER_CORRELATION_ID, &correlation_id);

		let started = Instant::now();
		let response = builder.send().await.map_err(|e| {
			warn!(target = "evc.api", path = %endpoint.path(), error = %e, "request failed");
			ApiFailure::NetworkFailure(e.to_string())
		})?;
		let status = response.status();
		debug!(
			target = "evc.api",
			method = ?endpoint.method(),
			path = %endpoint.path(),
			status = status.as_u16(),
			correlation_id = %correlation_id,
			elapsed_ms = started.elapsed().as_millis() as u64,
			"request completed"
		);

		if status.is_success() {
			let bytes = response.bytes().await.map_err(|e| ApiFailure::NetworkFailure(e.to_string()))?;
			return serde_json::from_slice(&bytes).map_err(|e| {
				warn!(target = "evc.api", path = %endpoint.path(), error = %e, "undecodable session payload");
				ApiFailure::InvalidResult(e.to_string())
			});
		}

		let is_json = response
			.headers()
			.get(CONTENT_TYPE)
			.and_then(|v| v.to_str().ok())
			.is_some_and(is_json_content_type);
		let body = response.text().await.unwrap_or_default();
		let problem = if is_json { serde_json::from_str::<ApiProblem>(&body).ok() } else { None };

		Err(endpoint.errors().classify(status.as_u16(), problem))
	}
}

#[async_trait]
impl SessionApi for HttpSessionApi {
	async fn create_session(&self, user_id: &str, request: &SessionRequest) -> ApiResult<ConnectSessionDescriptor> {
		self.request(&Endpoint::create_session(user_id, request)).await
	}

	async fn get_session(&self, user_id: &str, session_id: &str) -> ApiResult<ConnectSessionDescriptor> {
		self.request(&Endpoint::get_session(user_id, session_id)).await
	}

	async fn post_session_info(&self, user_id: &str, session_id: &str, info: &SessionInfo) -> ApiResult<ConnectSessionDescriptor> {
		let endpoint = Endpoint::post_session_info(user_id, session_id, info)?;
		self.request(&endpoint).await
	}
}

fn is_json_content_type(value: &str) -> bool {
	let mime = value.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
	mime == "application/json" || mime == "application/problem+json"
}
