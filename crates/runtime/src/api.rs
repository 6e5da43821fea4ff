//! The session API seam consumed by the session driver.

use async_trait::async_trait;
use evc_protocol::{ConnectSessionDescriptor, SessionInfo, SessionRequest};

use crate::error::ApiResult;

/// Backend operations that progress a connect session.
///
/// Every call resolves to a fresh [`ConnectSessionDescriptor`] or an
/// [`ApiFailure`](crate::ApiFailure); implementations never panic on bad input.
#[async_trait]
pub trait SessionApi: Send + Sync {
	/// Creates a new session of the requested kind.
	async fn create_session(&self, user_id: &str, request: &SessionRequest) -> ApiResult<ConnectSessionDescriptor>;

	/// Fetches the current state of an existing session.
	async fn get_session(&self, user_id: &str, session_id: &str) -> ApiResult<ConnectSessionDescriptor>;

	/// Posts harvested redirect info and returns the updated session.
	async fn post_session_info(&self, user_id: &str, session_id: &str, info: &SessionInfo) -> ApiResult<ConnectSessionDescriptor>;
}
