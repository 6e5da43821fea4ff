//! Connect session descriptor and the payloads exchanged on redirect events.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Server-issued snapshot of one in-progress linking flow.
///
/// A descriptor is never mutated in place: every backend reply replaces the
/// previous one wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectSessionDescriptor {
	/// Opaque session identifier, stable for the lifetime of the session.
	pub id: String,

	/// `true` once no further pages need loading.
	pub is_finished: bool,

	/// URL the web view should currently display.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub start_url: Option<String>,

	/// Prefix marking a navigation as a redirect event.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub redirect_url: Option<String>,

	/// What to harvest when a redirect event fires.
	#[serde(default, rename = "redirectInfo", skip_serializing_if = "Option::is_none")]
	pub redirect_capture: Option<RedirectCapture>,

	/// Vehicle being linked, for vehicle sessions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vehicle_id: Option<String>,

	/// Charger being linked, for charger sessions.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub charger_id: Option<String>,

	/// Charging location the charger or energy supplier belongs to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub charging_location_id: Option<String>,
}

impl ConnectSessionDescriptor {
	/// Creates an unfinished descriptor with only an id.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			is_finished: false,
			start_url: None,
			redirect_url: None,
			redirect_capture: None,
			vehicle_id: None,
			charger_id: None,
			charging_location_id: None,
		}
	}

	/// Sets the URL to display.
	pub fn start_url(mut self, url: impl Into<String>) -> Self {
		self.start_url = Some(url.into());
		self
	}

	/// Sets the redirect prefix.
	pub fn redirect_url(mut self, url: impl Into<String>) -> Self {
		self.redirect_url = Some(url.into());
		self
	}

	/// Sets the capture settings used on redirect events.
	pub fn redirect_capture(mut self, capture: RedirectCapture) -> Self {
		self.redirect_capture = Some(capture);
		self
	}

	/// Marks the descriptor as finished.
	pub fn finished(mut self) -> Self {
		self.is_finished = true;
		self
	}

	/// Returns `true` when `url` is a redirect event for this descriptor.
	///
	/// Without a redirect prefix nothing ever matches.
	pub fn is_redirect(&self, url: &str) -> bool {
		self.redirect_url.as_deref().is_some_and(|prefix| url.starts_with(prefix))
	}
}

/// Backend instructions for building a [`SessionInfo`] on a redirect event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectCapture {
	/// Include the full page content.
	#[serde(default)]
	pub include_body: bool,

	/// Names of the cookies to include.
	#[serde(default)]
	pub include_cookies: Vec<String>,

	/// Include the full navigated URL.
	#[serde(default)]
	pub include_redirect_url: bool,
}

impl RedirectCapture {
	/// Capture settings that request nothing.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests the page body.
	pub fn with_body(mut self) -> Self {
		self.include_body = true;
		self
	}

	/// Requests the named cookies.
	pub fn with_cookies<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.include_cookies = names.into_iter().map(Into::into).collect();
		self
	}

	/// Requests the navigated URL.
	pub fn with_redirect_url(mut self) -> Self {
		self.include_redirect_url = true;
		self
	}
}

/// Payload harvested from the web view and posted back on a redirect event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
	/// Full page content, present only when requested.
	pub body: Option<String>,

	/// Requested cookies by name.
	#[serde(default)]
	pub cookies: BTreeMap<String, String>,

	/// Full navigated URL, present only when requested.
	#[serde(default)]
	pub redirect_url: Option<String>,
}
