//! Failure types for backend access and configuration.

use evc_protocol::ApiProblem;
use thiserror::Error;

/// Result type alias for session API calls.
pub type ApiResult<T> = std::result::Result<T, ApiFailure>;

/// Every way a backend call can fail.
///
/// The set is closed: the session driver's failure policy matches on it
/// exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
	/// The backend rejected the credentials (status 401).
	#[error("unauthorized")]
	Unauthorized,

	/// The credentials lack access to the resource (status 403).
	#[error("forbidden")]
	Forbidden,

	/// Structured error with a human-readable title and detail.
	#[error("api error{}: {}", status.map(|s| format!(" ({s})")).unwrap_or_default(), title.as_deref().unwrap_or("untitled"))]
	ApiError {
		/// Short summary shown to the user.
		title: Option<String>,
		/// Longer explanation shown to the user.
		detail: Option<String>,
		/// HTTP status, when the backend reported one.
		status: Option<u16>,
	},

	/// Timeout, refused connection, or another transport problem.
	#[error("network failure: {0}")]
	NetworkFailure(String),

	/// The response could not be understood.
	#[error("invalid result: {0}")]
	InvalidResult(String),

	/// No usable backend configuration was provided.
	#[error("connect session client is not configured")]
	NotConfigured,
}

impl ApiFailure {
	/// Builds an [`ApiFailure::ApiError`] from a problem-details body.
	pub fn from_problem(problem: ApiProblem) -> Self {
		ApiFailure::ApiError {
			title: problem.title,
			detail: problem.detail,
			status: problem.status,
		}
	}

	/// Returns true for 401/403 failures.
	pub fn is_auth(&self) -> bool {
		matches!(self, ApiFailure::Unauthorized | ApiFailure::Forbidden)
	}
}

/// Errors raised while building or installing configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The API URL could not be parsed.
	#[error("invalid API url '{url}': {reason}")]
	InvalidUrl { url: String, reason: String },

	/// The API URL has no host to talk to.
	#[error("API url '{0}' has no host")]
	MissingHost(String),

	/// The HTTP client could not be built.
	#[error("failed to build HTTP client: {0}")]
	Client(String),

	/// Configuration was already installed once.
	#[error("connect session client can only be configured once")]
	AlreadyConfigured,
}
