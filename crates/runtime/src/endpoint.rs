//! Connect session endpoints and their error contracts.

use evc_protocol::{ApiProblem, SessionInfo, SessionRequest};

use crate::error::ApiFailure;

/// Versioned API root appended to the configured base path.
pub const API_PATH: &str = "/api/v1";

/// HTTP method of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
	Get,
	Post,
}

/// How an endpoint's non-success statuses map onto [`ApiFailure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMapping {
	/// Session creation: 400 and 404 carry problem details.
	Create,
	/// Existing session: only 404 carries problem details.
	Session,
}

impl ErrorMapping {
	/// Maps a non-success `status` and its parsed problem body.
	///
	/// A status that should carry problem details but arrives without a
	/// parseable body is an integrity failure.
	pub fn classify(self, status: u16, problem: Option<ApiProblem>) -> ApiFailure {
		let carries_problem = match self {
			ErrorMapping::Create => matches!(status, 400 | 404),
			ErrorMapping::Session => status == 404,
		};

		match status {
			401 => ApiFailure::Unauthorized,
			403 => ApiFailure::Forbidden,
			_ if carries_problem => match problem {
				Some(problem) => ApiFailure::from_problem(problem),
				None => ApiFailure::InvalidResult(format!("status {status} without problem details")),
			},
			_ => ApiFailure::InvalidResult(format!("unexpected status {status}")),
		}
	}
}

/// A requestable endpoint: method, path segments, body, and error contract.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
	method: Method,
	segments: Vec<String>,
	body: Option<serde_json::Value>,
	errors: ErrorMapping,
}

impl Endpoint {
	/// `POST` that starts a new session of the requested kind.
	pub fn create_session(user_id: &str, request: &SessionRequest) -> Self {
		let mut segments = vec!["users".to_string(), user_id.to_string()];
		match request {
			SessionRequest::Vehicle => segments.push("vehicles".into()),
			SessionRequest::SelectedVehicle { vehicle_id } => {
				segments.extend(["vehicles".to_string(), vehicle_id.clone()]);
			}
			SessionRequest::Charger { charging_location_id } => {
				segments.extend([
					"charging-locations".to_string(),
					charging_location_id.clone(),
					"chargers".to_string(),
				]);
			}
			SessionRequest::EnergySupplier { charging_location_id } => {
				segments.extend([
					"charging-locations".to_string(),
					charging_location_id.clone(),
					"energy-suppliers".to_string(),
				]);
			}
		}
		segments.push("connect-sessions".into());

		Self {
			method: Method::Post,
			segments,
			body: Some(serde_json::json!({})),
			errors: ErrorMapping::Create,
		}
	}

	/// `GET` of an existing session.
	pub fn get_session(user_id: &str, session_id: &str) -> Self {
		Self {
			method: Method::Get,
			segments: session_segments(user_id, session_id),
			body: None,
			errors: ErrorMapping::Session,
		}
	}

	/// `POST` of harvested redirect info.
	pub fn post_session_info(user_id: &str, session_id: &str, info: &SessionInfo) -> Result<Self, ApiFailure> {
		let body = serde_json::to_value(info).map_err(|e| ApiFailure::InvalidResult(format!("unserializable session info: {e}")))?;
		let mut segments = session_segments(user_id, session_id);
		segments.push("info".into());
		Ok(Self {
			method: Method::Post,
			segments,
			body: Some(body),
			errors: ErrorMapping::Session,
		})
	}

	pub fn method(&self) -> Method {
		self.method
	}

	/// Unencoded path segments below [`API_PATH`].
	pub fn segments(&self) -> &[String] {
		&self.segments
	}

	pub fn body(&self) -> Option<&serde_json::Value> {
		self.body.as_ref()
	}

	pub fn errors(&self) -> ErrorMapping {
		self.errors
	}

	/// Path below the base path, for logs.
	pub fn path(&self) -> String {
		format!("{API_PATH}/{}", self.segments.join("/"))
	}
}

fn session_segments(user_id: &str, session_id: &str) -> Vec<String> {
	vec![
		"users".to_string(),
		user_id.to_string(),
		"connect-sessions".to_string(),
		session_id.to_string(),
	]
}
