//! Capabilities a host web view must provide to a flow.

use async_trait::async_trait;
use tokio::sync::oneshot;
use url::Url;

/// Label of the action that re-issues the failed call.
pub const RETRY_LABEL: &str = "Retry";
/// Label of the action that ends the flow.
pub const CANCEL_LABEL: &str = "Cancel";

/// Reads the content of the page currently shown.
#[async_trait]
pub trait PageBodyAccessor: Send + Sync {
	/// Serialized DOM of the current page, `None` when unavailable.
	async fn page_body(&self) -> Option<String>;
}

/// Reads the host's cookie jar.
pub trait CookieAccessor: Send + Sync {
	/// Raw `name=value; name=value` cookie string for `url`.
	fn cookies_for(&self, url: &str) -> Option<String>;
}

/// The embedding surface driven by a [`SessionDriver`](crate::SessionDriver).
///
/// All methods are commands; none of them may block. They are invoked from
/// the driver's task, so implementations hop to their UI thread if needed.
pub trait ConnectHost: PageBodyAccessor + CookieAccessor {
	/// Show `url` in the web view.
	fn load_url(&self, url: &Url);

	/// The flow is over; dismiss the surface.
	fn hide(&self);

	/// Open `url` in an external browser tab.
	fn open_external_tab(&self, url: &str);

	/// Present `alert` and answer it with [`Alert::retry`] or [`Alert::cancel`].
	///
	/// Dropping an unanswered alert counts as cancel.
	fn show_alert(&self, alert: Alert);
}

/// The user's answer to an [`Alert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertChoice {
	Retry,
	Cancel,
}

/// A recoverable failure awaiting the user's decision.
///
/// Both actions consume the alert, so each alert is answered at most once.
/// Answering after the flow has ended does nothing.
#[derive(Debug)]
pub struct Alert {
	title: String,
	message: String,
	responder: oneshot::Sender<AlertChoice>,
}

impl Alert {
	pub(crate) fn new(title: String, message: String) -> (Self, oneshot::Receiver<AlertChoice>) {
		let (responder, choice) = oneshot::channel();
		(
			Self {
				title,
				message,
				responder,
			},
			choice,
		)
	}

	pub fn title(&self) -> &str {
		&self.title
	}

	pub fn message(&self) -> &str {
		&self.message
	}

	/// Re-issue the call that failed.
	pub fn retry(self) {
		self.respond(AlertChoice::Retry);
	}

	/// End the flow, reporting best-known progress.
	pub fn cancel(self) {
		self.respond(AlertChoice::Cancel);
	}

	pub fn respond(self, choice: AlertChoice) {
		let _ = self.responder.send(choice);
	}
}
