//! Navigation classification.

use std::sync::Arc;

use evc_protocol::ConnectSessionDescriptor;

/// Marker a page prepends to a URL it wants opened outside the web view.
pub const NEW_TAB_PREFIX: &str = "newtab:";

/// What a navigation attempt means for the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlClassification {
	/// Open `url` in an external browser tab.
	NewTabRequest { url: String },
	/// The page reached the redirect prefix of `descriptor`.
	RedirectMatch {
		descriptor: Arc<ConnectSessionDescriptor>,
		url: String,
	},
	/// Let the web view load the URL normally.
	PassThrough,
}

impl UrlClassification {
	/// Whether the host must cancel the navigation.
	pub fn should_intercept(&self) -> bool {
		!matches!(self, UrlClassification::PassThrough)
	}
}

/// Classifies `navigated_url` against the currently published descriptor.
pub fn classify(navigated_url: &str, current: Option<&Arc<ConnectSessionDescriptor>>) -> UrlClassification {
	if let Some(url) = navigated_url.strip_prefix(NEW_TAB_PREFIX) {
		return UrlClassification::NewTabRequest { url: url.to_string() };
	}

	match current {
		Some(descriptor) if descriptor.is_redirect(navigated_url) => UrlClassification::RedirectMatch {
			descriptor: Arc::clone(descriptor),
			url: navigated_url.to_string(),
		},
		_ => UrlClassification::PassThrough,
	}
}
