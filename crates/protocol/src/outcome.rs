//! Terminal outcome of a connect session flow.

use serde::{Deserialize, Serialize};

use crate::descriptor::ConnectSessionDescriptor;

/// The single, user-visible result of a flow.
///
/// Exactly one value is produced per flow invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConnectSessionResult {
	/// The backend marked the session finished.
	Finished {
		/// Identifier of the finished session.
		session_id: String,
	},
	/// The flow was interrupted while a session existed; it can be resumed.
	InProgress {
		/// Identifier to resume later.
		session_id: String,
	},
	/// No session was ever created.
	NotStarted,
}

impl ConnectSessionResult {
	/// Outcome for a flow interrupted with `descriptor` as its best-known progress.
	pub fn interrupted(descriptor: Option<&ConnectSessionDescriptor>) -> Self {
		match descriptor {
			Some(descriptor) => ConnectSessionResult::InProgress {
				session_id: descriptor.id.clone(),
			},
			None => ConnectSessionResult::NotStarted,
		}
	}

	/// Returns the session id carried by this outcome, if any.
	pub fn session_id(&self) -> Option<&str> {
		match self {
			ConnectSessionResult::Finished { session_id } | ConnectSessionResult::InProgress { session_id } => Some(session_id),
			ConnectSessionResult::NotStarted => None,
		}
	}
}
