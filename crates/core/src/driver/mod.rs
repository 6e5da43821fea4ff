//! The connect session state machine.
//!
//! A [`SessionDriver`] owns one flow. Its public methods only publish state
//! and enqueue commands; backend calls run on a spawned task that handles one
//! command at a time and abandons whatever it is awaiting once the flow turns
//! terminal.

mod operation;
mod phase;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use evc_protocol::{ConnectSessionDescriptor, ConnectSessionResult, SessionRequest};
use evc_runtime::SessionApi;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};
use url::Url;

use self::operation::Operation;
pub use self::phase::SessionPhase;
use crate::classify::{UrlClassification, classify};
use crate::extract::extract;
use crate::host::{Alert, AlertChoice, ConnectHost};
use crate::observer::ConnectSessionObserver;
use crate::outcome::{OutcomeReceiver, OutcomeSlot};
use crate::policy::{FailureAction, FailurePolicy};

enum Command {
	Run(Operation),
	Redirect {
		descriptor: Arc<ConnectSessionDescriptor>,
		url: String,
	},
}

/// Configures a [`SessionDriver`] before its task is spawned.
pub struct DriverBuilder {
	user_id: String,
	host: Arc<dyn ConnectHost>,
	api: Option<Arc<dyn SessionApi>>,
	observer: Option<Arc<dyn ConnectSessionObserver>>,
	policy: FailurePolicy,
}

impl DriverBuilder {
	/// Backend to talk to. Without one every call fails as not configured.
	pub fn api(mut self, api: Arc<dyn SessionApi>) -> Self {
		self.api = Some(api);
		self
	}

	pub fn observer(mut self, observer: Arc<dyn ConnectSessionObserver>) -> Self {
		self.observer = Some(observer);
		self
	}

	/// Spawns the driver task on the current tokio runtime.
	///
	/// # Panics
	///
	/// Panics when called outside a tokio runtime.
	pub fn spawn(self) -> (SessionDriver, OutcomeReceiver) {
		let (outcome, receiver) = OutcomeSlot::new();
		let (phase, _) = watch::channel(SessionPhase::Uninitialized);
		let shared = Arc::new(Shared {
			user_id: self.user_id,
			api: self.api,
			host: self.host,
			observer: self.observer,
			policy: self.policy,
			phase,
			in_flight: AtomicBool::new(false),
			outcome,
		});

		let (commands, rx) = mpsc::unbounded_channel();
		tokio::spawn(Arc::clone(&shared).run(rx));

		(SessionDriver { shared, commands }, receiver)
	}
}

/// Handle to one connect session flow.
///
/// Cheap to clone; all clones drive the same flow. When the last handle is
/// dropped before the flow ends, it ends with best-known progress.
#[derive(Clone)]
pub struct SessionDriver {
	shared: Arc<Shared>,
	commands: mpsc::UnboundedSender<Command>,
}

impl SessionDriver {
	pub fn builder(user_id: impl Into<String>, host: Arc<dyn ConnectHost>) -> DriverBuilder {
		DriverBuilder {
			user_id: user_id.into(),
			host,
			api: None,
			observer: None,
			policy: FailurePolicy,
		}
	}

	/// Creates a new session. Ignored unless the flow is uninitialized.
	pub fn start(&self, request: SessionRequest) {
		if !self.begin() {
			warn!(target = "evc.session", kind = request.kind(), "flow already started; ignoring start");
			return;
		}
		info!(target = "evc.session", user_id = %self.shared.user_id, kind = request.kind(), "starting connect session");
		self.enqueue(Command::Run(Operation::Create(request)));
	}

	/// Continues an existing session. Ignored unless the flow is uninitialized.
	pub fn resume(&self, session_id: impl Into<String>) {
		let session_id = session_id.into();
		if !self.begin() {
			warn!(target = "evc.session", %session_id, "flow already started; ignoring resume");
			return;
		}
		info!(target = "evc.session", user_id = %self.shared.user_id, %session_id, "resuming connect session");
		self.enqueue(Command::Run(Operation::Resume(session_id)));
	}

	/// Decides whether the web view may load `url`.
	///
	/// Returns `true` when the host must cancel the navigation. Once the flow
	/// has ended nothing is intercepted and nothing is scheduled.
	pub fn on_navigation_attempt(&self, url: &str) -> bool {
		let phase = self.phase();
		if phase.is_terminal() {
			debug!(target = "evc.session", url, "flow ended; not intercepting");
			return false;
		}

		match classify(url, phase.descriptor()) {
			UrlClassification::NewTabRequest { url } => {
				info!(target = "evc.session", %url, "opening external tab");
				self.shared.host.open_external_tab(&url);
				true
			}
			UrlClassification::RedirectMatch { descriptor, .. } => {
				if !self.acquire() {
					debug!(target = "evc.session", session_id = %descriptor.id, "call in flight; dropping redirect");
					return true;
				}
				self.claim_redirect(url)
			}
			UrlClassification::PassThrough => false,
		}
	}

	/// Schedules the redirect for `url` while holding the progression slot.
	///
	/// A descriptor published between the first classification and the claim
	/// decides; when it no longer matches, the slot is released.
	fn claim_redirect(&self, url: &str) -> bool {
		match classify(url, self.phase().descriptor()) {
			UrlClassification::RedirectMatch { descriptor, url } => {
				info!(target = "evc.session", session_id = %descriptor.id, "redirect event");
				self.enqueue(Command::Redirect { descriptor, url });
				true
			}
			_ => {
				self.release();
				debug!(target = "evc.session", url, "redirect no longer matches the live descriptor");
				false
			}
		}
	}

	/// The user came back from an external tab; refresh the session.
	pub fn on_external_tab_return(&self) {
		let Some(descriptor) = self.descriptor() else {
			debug!(target = "evc.session", "no live session to refresh");
			return;
		};
		if !self.acquire() {
			debug!(target = "evc.session", session_id = %descriptor.id, "call in flight; dropping refresh");
			return;
		}
		self.enqueue(Command::Run(Operation::Refresh(descriptor.id.clone())));
	}

	/// The host cannot show the current page.
	pub fn on_display_url_became_unavailable(&self) {
		self.shared.interrupt("display url unavailable");
	}

	/// Ends the flow now, reporting best-known progress.
	pub fn force_close(&self) {
		self.shared.interrupt("closed by host");
	}

	pub fn phase(&self) -> SessionPhase {
		self.shared.phase.borrow().clone()
	}

	/// Watches phase changes.
	pub fn subscribe(&self) -> watch::Receiver<SessionPhase> {
		self.shared.phase.subscribe()
	}

	/// The most recently published descriptor.
	pub fn descriptor(&self) -> Option<Arc<ConnectSessionDescriptor>> {
		self.phase().descriptor().cloned()
	}

	pub fn user_id(&self) -> &str {
		&self.shared.user_id
	}

	fn begin(&self) -> bool {
		self.shared.phase.send_if_modified(|phase| {
			if !matches!(phase, SessionPhase::Uninitialized) {
				return false;
			}
			*phase = SessionPhase::Loading;
			self.shared.in_flight.store(true, Ordering::Release);
			true
		})
	}

	/// Claims the single progression slot.
	fn acquire(&self) -> bool {
		self.shared
			.in_flight
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
	}

	fn release(&self) {
		self.shared.in_flight.store(false, Ordering::Release);
	}

	fn enqueue(&self, command: Command) {
		if self.commands.send(command).is_err() {
			debug!(target = "evc.session", "driver task stopped; dropping command");
		}
	}
}

struct Shared {
	user_id: String,
	api: Option<Arc<dyn SessionApi>>,
	host: Arc<dyn ConnectHost>,
	observer: Option<Arc<dyn ConnectSessionObserver>>,
	policy: FailurePolicy,
	phase: watch::Sender<SessionPhase>,
	/// Set while a progression call or its alert is outstanding.
	in_flight: AtomicBool,
	outcome: OutcomeSlot,
}

impl Shared {
	async fn run(self: Arc<Self>, mut commands: mpsc::UnboundedReceiver<Command>) {
		let mut phase = self.phase.subscribe();
		loop {
			let command = tokio::select! {
				biased;
				_ = terminated(&mut phase) => break,
				command = commands.recv() => command,
			};
			let Some(command) = command else {
				self.interrupt("all driver handles dropped");
				break;
			};
			match command {
				Command::Run(operation) => self.drive(operation, &mut phase).await,
				Command::Redirect { descriptor, url } => self.redirect(&descriptor, &url, &mut phase).await,
			}
		}
		debug!(target = "evc.session", user_id = %self.user_id, "driver task stopped");
	}

	async fn redirect(&self, descriptor: &ConnectSessionDescriptor, url: &str, phase: &mut watch::Receiver<SessionPhase>) {
		let operation = match &descriptor.redirect_capture {
			Some(capture) => {
				let host = self.host.as_ref();
				let info = tokio::select! {
					biased;
					_ = terminated(phase) => return,
					info = extract(capture, url, host, host) => info,
				};
				Operation::PostInfo {
					session_id: descriptor.id.clone(),
					info,
				}
			}
			None => Operation::Refresh(descriptor.id.clone()),
		};
		self.drive(operation, phase).await;
	}

	/// Runs `operation` until it publishes, the flow closes, or the flow ends
	/// underneath it. Retries re-issue the identical operation.
	async fn drive(&self, operation: Operation, phase: &mut watch::Receiver<SessionPhase>) {
		loop {
			debug!(target = "evc.session", operation = operation.name(), "calling backend");
			let result = tokio::select! {
				biased;
				_ = terminated(phase) => {
					debug!(target = "evc.session", operation = operation.name(), "flow ended; discarding pending call");
					return;
				}
				result = operation.call(self.api.as_deref(), &self.user_id) => result,
			};

			let failure = match result {
				Ok(descriptor) => {
					self.publish(descriptor, &operation);
					return;
				}
				Err(failure) => failure,
			};

			let FailureAction::Alert { title, message } = self.policy.decide(&failure) else {
				self.interrupt("backend failure");
				return;
			};

			let (alert, answer) = Alert::new(title, message);
			self.host.show_alert(alert);
			let choice = tokio::select! {
				biased;
				_ = terminated(phase) => return,
				choice = answer => choice.unwrap_or(AlertChoice::Cancel),
			};

			match choice {
				AlertChoice::Retry => info!(target = "evc.session", operation = operation.name(), "retrying"),
				AlertChoice::Cancel => {
					self.interrupt("alert cancelled");
					return;
				}
			}
		}
	}

	fn publish(&self, descriptor: ConnectSessionDescriptor, operation: &Operation) {
		let descriptor = Arc::new(descriptor);
		let published = self.phase.send_if_modified(|phase| {
			if phase.is_terminal() {
				return false;
			}
			*phase = SessionPhase::Live(Arc::clone(&descriptor));
			// released before subscribers see the new descriptor
			self.in_flight.store(false, Ordering::Release);
			true
		});
		if !published {
			debug!(target = "evc.session", session_id = %descriptor.id, "flow ended; discarding late response");
			return;
		}
		debug!(
			target = "evc.session",
			session_id = %descriptor.id,
			finished = descriptor.is_finished,
			"descriptor published"
		);

		if operation.is_create() {
			if let Some(observer) = &self.observer {
				observer.on_connect_session_created(&self.user_id, &descriptor.id);
			}
		}

		if descriptor.is_finished {
			let session_id = descriptor.id.clone();
			self.finish(move |_| ConnectSessionResult::Finished { session_id });
			return;
		}

		match display_url(&descriptor) {
			Some(url) => self.host.load_url(&url),
			None => {
				warn!(target = "evc.session", session_id = %descriptor.id, start_url = ?descriptor.start_url, "no loadable start url");
				self.interrupt("display url unavailable");
			}
		}
	}

	fn interrupt(&self, reason: &'static str) -> bool {
		debug!(target = "evc.session", reason, "interrupting flow");
		self.finish(|phase| ConnectSessionResult::interrupted(phase.descriptor().map(|descriptor| descriptor.as_ref())))
	}

	/// Moves to `Terminal` unless already there, then tells the host.
	fn finish(&self, decide: impl FnOnce(&SessionPhase) -> ConnectSessionResult) -> bool {
		let mut emitted = None;
		self.phase.send_if_modified(|phase| {
			if phase.is_terminal() {
				return false;
			}
			let outcome = decide(phase);
			*phase = SessionPhase::Terminal(outcome.clone());
			emitted = Some(outcome);
			true
		});
		let Some(outcome) = emitted else {
			return false;
		};

		info!(target = "evc.session", user_id = %self.user_id, ?outcome, "connect session flow ended");
		if let (ConnectSessionResult::Finished { session_id }, Some(observer)) = (&outcome, &self.observer) {
			observer.on_connect_session_finished(&self.user_id, session_id);
		}
		self.host.hide();
		self.outcome.resolve(outcome);
		true
	}
}

async fn terminated(phase: &mut watch::Receiver<SessionPhase>) {
	let _ = phase.wait_for(SessionPhase::is_terminal).await;
}

fn display_url(descriptor: &ConnectSessionDescriptor) -> Option<Url> {
	Url::parse(descriptor.start_url.as_deref()?).ok()
}
