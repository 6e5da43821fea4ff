use std::sync::Arc;

use evc_protocol::{ConnectSessionDescriptor, ConnectSessionResult};

/// Where a flow is in its lifecycle.
///
/// Moves forward only: `Uninitialized`, `Loading`, any number of `Live`
/// replacements, then `Terminal`, which never changes again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionPhase {
	#[default]
	Uninitialized,
	/// Waiting for the first descriptor.
	Loading,
	/// The most recently published descriptor.
	Live(Arc<ConnectSessionDescriptor>),
	/// The flow ended with this outcome.
	Terminal(ConnectSessionResult),
}

impl SessionPhase {
	pub fn is_terminal(&self) -> bool {
		matches!(self, SessionPhase::Terminal(_))
	}

	/// The live descriptor, if any.
	pub fn descriptor(&self) -> Option<&Arc<ConnectSessionDescriptor>> {
		match self {
			SessionPhase::Live(descriptor) => Some(descriptor),
			_ => None,
		}
	}

	pub fn outcome(&self) -> Option<&ConnectSessionResult> {
		match self {
			SessionPhase::Terminal(outcome) => Some(outcome),
			_ => None,
		}
	}

	/// Hosts show a progress indicator until a descriptor is live.
	pub fn shows_activity_indicator(&self) -> bool {
		matches!(self, SessionPhase::Uninitialized | SessionPhase::Loading)
	}
}
