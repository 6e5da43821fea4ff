//! Maps backend failures onto what the flow does next.

use evc_runtime::ApiFailure;
use tracing::{error, warn};

pub const UNKNOWN_ERROR_TITLE: &str = "Unknown error";
pub const NETWORK_ERROR_TITLE: &str = "Network error";
pub const NETWORK_ERROR_MESSAGE: &str = "Try again later";

/// Reaction to a failed backend call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureAction {
	/// Ask the user whether to retry.
	Alert { title: String, message: String },
	/// End the flow with best-known progress.
	Close,
}

/// Decides how failures surface.
///
/// Auth, integrity and configuration failures close the flow; failures the
/// user can act on become alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailurePolicy;

impl FailurePolicy {
	pub fn decide(&self, failure: &ApiFailure) -> FailureAction {
		match failure {
			ApiFailure::Unauthorized | ApiFailure::Forbidden => {
				error!(target = "evc.session", failure = %failure, "failed to authorize");
				FailureAction::Close
			}
			ApiFailure::ApiError { title, detail, status } => {
				warn!(target = "evc.session", ?status, ?title, "backend rejected the request");
				FailureAction::Alert {
					title: title.clone().unwrap_or_else(|| UNKNOWN_ERROR_TITLE.to_string()),
					message: detail.clone().unwrap_or_default(),
				}
			}
			ApiFailure::NetworkFailure(reason) => {
				warn!(target = "evc.session", %reason, "network failure");
				FailureAction::Alert {
					title: NETWORK_ERROR_TITLE.to_string(),
					message: NETWORK_ERROR_MESSAGE.to_string(),
				}
			}
			ApiFailure::InvalidResult(reason) => {
				error!(target = "evc.session", %reason, "invalid backend result");
				FailureAction::Close
			}
			ApiFailure::NotConfigured => {
				error!(target = "evc.session", "SDK is not configured; call Sdk::configure first");
				FailureAction::Close
			}
		}
	}
}
