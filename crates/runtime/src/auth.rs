//! Access token supply for authenticated backend calls.

use async_trait::async_trait;

/// Provides the bearer token sent with every request.
///
/// Implementations typically wrap the host's identity provider.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
	/// Latest token, if the user is signed in.
	async fn access_token(&self) -> Option<String>;

	/// Refreshes the token after the backend answered 401.
	///
	/// Returns the renewed token, or `None` when renewal is not possible.
	async fn renew_access_token(&self) -> Option<String> {
		None
	}
}

/// Provider for backends that need no bearer token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

#[async_trait]
impl AccessTokenProvider for NoToken {
	async fn access_token(&self) -> Option<String> {
		None
	}
}

/// Provider returning a fixed token.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}
}

#[async_trait]
impl AccessTokenProvider for StaticToken {
	async fn access_token(&self) -> Option<String> {
		Some(self.0.clone())
	}
}
