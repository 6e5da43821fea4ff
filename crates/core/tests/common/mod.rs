#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use evc::{
	Alert, ApiFailure, ConnectHost, ConnectSessionDescriptor, ConnectSessionObserver, ConnectSessionResult, CookieAccessor,
	OutcomeReceiver, PageBodyAccessor, SessionApi, SessionInfo, SessionPhase, SessionRequest,
};
use evc_runtime::ApiResult;
use parking_lot::Mutex;
use tokio::sync::{Notify, watch};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
	Create(SessionRequest),
	Get(String),
	PostInfo(String, SessionInfo),
}

pub struct Reply {
	result: ApiResult<ConnectSessionDescriptor>,
	gate: Option<Arc<Notify>>,
}

impl Reply {
	pub fn ok(descriptor: ConnectSessionDescriptor) -> Self {
		Self {
			result: Ok(descriptor),
			gate: None,
		}
	}

	pub fn err(failure: ApiFailure) -> Self {
		Self {
			result: Err(failure),
			gate: None,
		}
	}

	/// Holds the reply back until `gate` is notified.
	pub fn gated(mut self, gate: &Arc<Notify>) -> Self {
		self.gate = Some(Arc::clone(gate));
		self
	}
}

/// Backend answering from a script and recording every call.
#[derive(Default)]
pub struct ScriptedApi {
	replies: Mutex<VecDeque<Reply>>,
	calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
	pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
		Arc::new(Self {
			replies: Mutex::new(replies.into_iter().collect()),
			calls: Mutex::new(Vec::new()),
		})
	}

	pub fn calls(&self) -> Vec<Call> {
		self.calls.lock().clone()
	}

	async fn answer(&self, call: Call) -> ApiResult<ConnectSessionDescriptor> {
		self.calls.lock().push(call);
		let reply = self.replies.lock().pop_front();
		let Some(reply) = reply else {
			return Err(ApiFailure::InvalidResult("script exhausted".into()));
		};
		if let Some(gate) = reply.gate {
			gate.notified().await;
		}
		reply.result
	}
}

#[async_trait]
impl SessionApi for ScriptedApi {
	async fn create_session(&self, _user_id: &str, request: &SessionRequest) -> ApiResult<ConnectSessionDescriptor> {
		self.answer(Call::Create(request.clone())).await
	}

	async fn get_session(&self, _user_id: &str, session_id: &str) -> ApiResult<ConnectSessionDescriptor> {
		self.answer(Call::Get(session_id.to_string())).await
	}

	async fn post_session_info(&self, _user_id: &str, session_id: &str, info: &SessionInfo) -> ApiResult<ConnectSessionDescriptor> {
		self.answer(Call::PostInfo(session_id.to_string(), info.clone())).await
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
	Load(String),
	Hide,
	ExternalTab(String),
	Alert { title: String, message: String },
}

/// Web view stand-in that records commands and parks alerts for the test.
#[derive(Default)]
pub struct RecordingHost {
	events: Mutex<Vec<HostEvent>>,
	alerts: Mutex<Vec<Alert>>,
	pub body: Mutex<Option<String>>,
	pub cookies: Mutex<Option<String>>,
}

impl RecordingHost {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn events(&self) -> Vec<HostEvent> {
		self.events.lock().clone()
	}

	pub fn loads(&self) -> Vec<String> {
		self.events()
			.into_iter()
			.filter_map(|event| match event {
				HostEvent::Load(url) => Some(url),
				_ => None,
			})
			.collect()
	}

	pub fn take_alert(&self) -> Option<Alert> {
		self.alerts.lock().pop()
	}
}

#[async_trait]
impl PageBodyAccessor for RecordingHost {
	async fn page_body(&self) -> Option<String> {
		self.body.lock().clone()
	}
}

impl CookieAccessor for RecordingHost {
	fn cookies_for(&self, _url: &str) -> Option<String> {
		self.cookies.lock().clone()
	}
}

impl ConnectHost for RecordingHost {
	fn load_url(&self, url: &Url) {
		self.events.lock().push(HostEvent::Load(url.to_string()));
	}

	fn hide(&self) {
		self.events.lock().push(HostEvent::Hide);
	}

	fn open_external_tab(&self, url: &str) {
		self.events.lock().push(HostEvent::ExternalTab(url.to_string()));
	}

	fn show_alert(&self, alert: Alert) {
		let event = HostEvent::Alert {
			title: alert.title().to_string(),
			message: alert.message().to_string(),
		};
		self.alerts.lock().push(alert);
		self.events.lock().push(event);
	}
}

#[derive(Default)]
pub struct RecordingObserver {
	pub created: Mutex<Vec<(String, String)>>,
	pub finished: Mutex<Vec<(String, String)>>,
}

impl ConnectSessionObserver for RecordingObserver {
	fn on_connect_session_created(&self, user_id: &str, session_id: &str) {
		self.created.lock().push((user_id.to_string(), session_id.to_string()));
	}

	fn on_connect_session_finished(&self, user_id: &str, session_id: &str) {
		self.finished.lock().push((user_id.to_string(), session_id.to_string()));
	}
}

const WAIT: Duration = Duration::from_secs(2);

/// Waits until the published phase satisfies `predicate`.
pub async fn wait_phase(rx: &mut watch::Receiver<SessionPhase>, predicate: impl FnMut(&SessionPhase) -> bool) -> SessionPhase {
	tokio::time::timeout(WAIT, rx.wait_for(predicate))
		.await
		.expect("timed out waiting for phase")
		.expect("driver dropped")
		.clone()
}

/// Waits for the flow outcome.
pub async fn settle(outcome: OutcomeReceiver) -> ConnectSessionResult {
	tokio::time::timeout(WAIT, outcome).await.expect("timed out waiting for outcome")
}

/// Polls `condition` until it holds.
pub async fn eventually(mut condition: impl FnMut() -> bool) {
	tokio::time::timeout(WAIT, async {
		while !condition() {
			tokio::time::sleep(Duration::from_millis(5)).await;
		}
	})
	.await
	.expect("condition never held");
}

pub fn live_descriptor(id: &str) -> ConnectSessionDescriptor {
	ConnectSessionDescriptor::new(id)
		.start_url("https://auth.example.com/start")
		.redirect_url("https://done")
}
