//! Problem-details body returned by the backend on client errors.

use serde::{Deserialize, Serialize};

/// RFC 7807 problem details.
///
/// Every field is optional; the backend omits whatever does not apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProblem {
	/// URI identifying the problem type.
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Short human-readable summary.
	#[serde(default)]
	pub title: Option<String>,
	/// HTTP status code.
	#[serde(default)]
	pub status: Option<u16>,
	/// Human-readable explanation specific to this occurrence.
	#[serde(default)]
	pub detail: Option<String>,
	/// URI identifying this occurrence.
	#[serde(default)]
	pub instance: Option<String>,
}
