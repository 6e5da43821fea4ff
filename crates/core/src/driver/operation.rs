use evc_protocol::{ConnectSessionDescriptor, SessionInfo, SessionRequest};
use evc_runtime::{ApiFailure, ApiResult, SessionApi};

/// A backend call the driver can issue and, after an alert, re-issue verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Operation {
	Create(SessionRequest),
	Resume(String),
	Refresh(String),
	PostInfo { session_id: String, info: SessionInfo },
}

impl Operation {
	pub(crate) fn name(&self) -> &'static str {
		match self {
			Operation::Create(_) => "create",
			Operation::Resume(_) => "resume",
			Operation::Refresh(_) => "refresh",
			Operation::PostInfo { .. } => "post_info",
		}
	}

	pub(crate) fn is_create(&self) -> bool {
		matches!(self, Operation::Create(_))
	}

	pub(crate) async fn call(&self, api: Option<&dyn SessionApi>, user_id: &str) -> ApiResult<ConnectSessionDescriptor> {
		let Some(api) = api else {
			return Err(ApiFailure::NotConfigured);
		};
		match self {
			Operation::Create(request) => api.create_session(user_id, request).await,
			Operation::Resume(session_id) | Operation::Refresh(session_id) => api.get_session(user_id, session_id).await,
			Operation::PostInfo { session_id, info } => api.post_session_info(user_id, session_id, info).await,
		}
	}
}
