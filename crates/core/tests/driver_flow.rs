mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
	Call, HostEvent, RecordingHost, RecordingObserver, Reply, ScriptedApi, eventually, live_descriptor, settle, wait_phase,
};
use evc::{
	ApiFailure, ConnectSessionDescriptor, ConnectSessionResult, OutcomeReceiver, RedirectCapture, SessionDriver,
	SessionInfo, SessionPhase, SessionRequest,
};
use tokio::sync::Notify;

fn spawn(api: &Arc<ScriptedApi>, host: &Arc<RecordingHost>) -> (SessionDriver, OutcomeReceiver) {
	SessionDriver::builder("u1", host.clone()).api(api.clone()).spawn()
}

fn in_progress(id: &str) -> ConnectSessionResult {
	ConnectSessionResult::InProgress { session_id: id.into() }
}

fn finished(id: &str) -> ConnectSessionResult {
	ConnectSessionResult::Finished { session_id: id.into() }
}

#[tokio::test]
async fn start_loads_first_page() {
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S1"))]);
	let host = RecordingHost::new();
	let (driver, _outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();

	assert!(driver.phase().shows_activity_indicator());
	driver.start(SessionRequest::Vehicle);

	let live = wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;
	assert_eq!(live.descriptor().map(|d| d.id.as_str()), Some("S1"));
	eventually(|| !host.loads().is_empty()).await;
	assert_eq!(host.loads(), vec!["https://auth.example.com/start".to_string()]);
	assert_eq!(api.calls(), vec![Call::Create(SessionRequest::Vehicle)]);
}

#[tokio::test]
async fn redirect_posts_captured_info_and_finishes() {
	let descriptor = live_descriptor("S1").redirect_capture(RedirectCapture::new().with_body().with_cookies(["sid"]));
	let api = ScriptedApi::new([
		Reply::ok(descriptor),
		Reply::ok(ConnectSessionDescriptor::new("S1").finished()),
	]);
	let host = RecordingHost::new();
	*host.body.lock() = Some("<html>done</html>".into());
	*host.cookies.lock() = Some("sid=abc; other=x".into());
	let observer = Arc::new(RecordingObserver::default());

	let (driver, outcome) = SessionDriver::builder("u1", host.clone())
		.api(api.clone())
		.observer(observer.clone())
		.spawn();
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	assert!(driver.on_navigation_attempt("https://done/callback?code=1"));
	assert_eq!(settle(outcome).await, finished("S1"));

	let mut expected = SessionInfo {
		body: Some("<html>done</html>".into()),
		..Default::default()
	};
	expected.cookies.insert("sid".into(), "abc".into());
	assert_eq!(api.calls()[1], Call::PostInfo("S1".into(), expected));

	assert_eq!(*observer.created.lock(), vec![("u1".to_string(), "S1".to_string())]);
	assert_eq!(*observer.finished.lock(), vec![("u1".to_string(), "S1".to_string())]);
	assert_eq!(host.events().last(), Some(&HostEvent::Hide));

	assert!(!driver.on_navigation_attempt("https://done/callback?code=2"));
	tokio::time::sleep(Duration::from_millis(20)).await;
	assert_eq!(api.calls().len(), 2);
	assert_eq!(driver.phase(), SessionPhase::Terminal(finished("S1")));
}

#[tokio::test]
async fn redirect_without_capture_refreshes_session() {
	let next = ConnectSessionDescriptor::new("S1")
		.start_url("https://auth.example.com/step2")
		.redirect_url("https://done2");
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S1")), Reply::ok(next)]);
	let host = RecordingHost::new();
	let (driver, _outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	assert!(driver.on_navigation_attempt("https://done/x"));
	eventually(|| host.loads().len() == 2).await;

	assert_eq!(api.calls()[1], Call::Get("S1".into()));
	assert_eq!(host.loads()[1], "https://auth.example.com/step2");
	let current = driver.descriptor().unwrap();
	assert_eq!(current.redirect_url.as_deref(), Some("https://done2"));
	// the old prefix no longer matches
	assert!(!driver.on_navigation_attempt("https://done/x"));
}

#[tokio::test]
async fn terminal_state_absorbs_everything() {
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S1"))]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	driver.force_close();
	assert_eq!(settle(outcome).await, in_progress("S1"));
	let terminal = driver.phase();

	assert!(!driver.on_navigation_attempt("https://done/x"));
	assert!(!driver.on_navigation_attempt("https://elsewhere.example.com"));
	assert!(!driver.on_navigation_attempt("newtab:https://help.example.com"));
	driver.on_external_tab_return();
	driver.force_close();
	driver.on_display_url_became_unavailable();
	driver.start(SessionRequest::Vehicle);
	tokio::time::sleep(Duration::from_millis(30)).await;

	assert_eq!(driver.phase(), terminal);
	assert_eq!(api.calls().len(), 1);
	assert_eq!(host.events().iter().filter(|e| **e == HostEvent::Hide).count(), 1);
	assert!(!host.events().iter().any(|e| matches!(e, HostEvent::ExternalTab(_))));
}

#[tokio::test]
async fn retry_reissues_identical_info() {
	let descriptor = live_descriptor("S1").redirect_capture(RedirectCapture::new().with_cookies(["sid"]));
	let api = ScriptedApi::new([
		Reply::ok(descriptor),
		Reply::err(ApiFailure::NetworkFailure("connection reset".into())),
		Reply::ok(ConnectSessionDescriptor::new("S1").finished()),
	]);
	let host = RecordingHost::new();
	*host.cookies.lock() = Some("sid=abc".into());
	let (driver, outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	assert!(driver.on_navigation_attempt("https://done/cb"));
	eventually(|| host.events().iter().any(|e| matches!(e, HostEvent::Alert { .. }))).await;
	assert!(host.events().contains(&HostEvent::Alert {
		title: "Network error".into(),
		message: "Try again later".into(),
	}));

	// a retry must not re-harvest the page
	*host.cookies.lock() = Some("sid=changed".into());
	host.take_alert().unwrap().retry();
	assert_eq!(settle(outcome).await, finished("S1"));

	let calls = api.calls();
	assert_eq!(calls.len(), 3);
	assert_eq!(calls[1], calls[2]);
	let Call::PostInfo(_, info) = &calls[2] else {
		panic!("expected post info, got {:?}", calls[2]);
	};
	assert_eq!(info.cookies.get("sid").map(String::as_str), Some("abc"));
}

#[tokio::test]
async fn cancel_reports_best_known_progress() {
	let api = ScriptedApi::new([
		Reply::ok(live_descriptor("S1")),
		Reply::err(ApiFailure::ApiError {
			title: Some("Vehicle offline".into()),
			detail: None,
			status: Some(404),
		}),
	]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	driver.on_navigation_attempt("https://done/cb");
	eventually(|| host.events().iter().any(|e| matches!(e, HostEvent::Alert { .. }))).await;
	assert!(host.events().contains(&HostEvent::Alert {
		title: "Vehicle offline".into(),
		message: String::new(),
	}));
	host.take_alert().unwrap().cancel();

	assert_eq!(settle(outcome).await, in_progress("S1"));
}

#[tokio::test]
async fn cancel_before_any_session_is_not_started() {
	let api = ScriptedApi::new([Reply::err(ApiFailure::NetworkFailure("offline".into()))]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	driver.start(SessionRequest::Charger {
		charging_location_id: "L1".into(),
	});

	eventually(|| host.events().iter().any(|e| matches!(e, HostEvent::Alert { .. }))).await;
	host.take_alert().unwrap().cancel();

	assert_eq!(settle(outcome).await, ConnectSessionResult::NotStarted);
}

#[tokio::test]
async fn dropped_alert_counts_as_cancel() {
	let api = ScriptedApi::new([Reply::err(ApiFailure::NetworkFailure("offline".into()))]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	driver.start(SessionRequest::Vehicle);

	eventually(|| host.events().iter().any(|e| matches!(e, HostEvent::Alert { .. }))).await;
	drop(host.take_alert());

	assert_eq!(settle(outcome).await, ConnectSessionResult::NotStarted);
}

#[tokio::test]
async fn alert_answered_after_close_does_nothing() {
	let api = ScriptedApi::new([Reply::err(ApiFailure::NetworkFailure("offline".into()))]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	driver.start(SessionRequest::Vehicle);

	eventually(|| host.events().iter().any(|e| matches!(e, HostEvent::Alert { .. }))).await;
	let alert = host.take_alert().unwrap();
	driver.force_close();
	assert_eq!(settle(outcome).await, ConnectSessionResult::NotStarted);

	alert.retry();
	tokio::time::sleep(Duration::from_millis(30)).await;
	assert_eq!(api.calls().len(), 1);
}

#[tokio::test]
async fn new_tab_request_leaves_state_alone() {
	let api = ScriptedApi::new([
		Reply::ok(live_descriptor("S1")),
		Reply::ok(live_descriptor("S1").start_url("https://auth.example.com/after-tab")),
	]);
	let host = RecordingHost::new();
	let (driver, _outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;
	let before = driver.phase();

	assert!(driver.on_navigation_attempt("newtab:https://help.example.com/faq"));
	assert!(host.events().contains(&HostEvent::ExternalTab("https://help.example.com/faq".into())));
	assert_eq!(driver.phase(), before);
	assert_eq!(api.calls().len(), 1);

	driver.on_external_tab_return();
	eventually(|| host.loads().len() == 2).await;
	assert_eq!(api.calls()[1], Call::Get("S1".into()));
	assert_eq!(host.loads()[1], "https://auth.example.com/after-tab");
}

#[tokio::test]
async fn late_response_is_discarded_after_close() {
	let gate = Arc::new(Notify::new());
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S1")).gated(&gate)]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	driver.start(SessionRequest::Vehicle);
	eventually(|| api.calls().len() == 1).await;

	driver.force_close();
	gate.notify_one();
	assert_eq!(settle(outcome).await, ConnectSessionResult::NotStarted);
	tokio::time::sleep(Duration::from_millis(30)).await;

	assert_eq!(driver.phase(), SessionPhase::Terminal(ConnectSessionResult::NotStarted));
	assert!(host.loads().is_empty());
}

#[tokio::test]
async fn superseding_redirects_are_dropped() {
	let gate = Arc::new(Notify::new());
	let api = ScriptedApi::new([
		Reply::ok(live_descriptor("S1")),
		Reply::ok(ConnectSessionDescriptor::new("S1").finished()).gated(&gate),
	]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	assert!(driver.on_navigation_attempt("https://done/first"));
	eventually(|| api.calls().len() == 2).await;
	assert!(driver.on_navigation_attempt("https://done/second"));
	driver.on_external_tab_return();

	gate.notify_one();
	assert_eq!(settle(outcome).await, finished("S1"));
	assert_eq!(api.calls().len(), 2);
}

#[tokio::test]
async fn auth_failure_closes_without_alert() {
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S1")), Reply::err(ApiFailure::Unauthorized)]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	driver.on_navigation_attempt("https://done/cb");
	assert_eq!(settle(outcome).await, in_progress("S1"));
	assert!(!host.events().iter().any(|e| matches!(e, HostEvent::Alert { .. })));
}

#[tokio::test]
async fn invalid_result_closes_without_alert() {
	let api = ScriptedApi::new([Reply::err(ApiFailure::InvalidResult("missing id".into()))]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	driver.start(SessionRequest::Vehicle);

	assert_eq!(settle(outcome).await, ConnectSessionResult::NotStarted);
	assert_eq!(host.events(), vec![HostEvent::Hide]);
}

#[tokio::test]
async fn missing_start_url_ends_flow() {
	let api = ScriptedApi::new([Reply::ok(ConnectSessionDescriptor::new("S1").redirect_url("https://done"))]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	driver.start(SessionRequest::Vehicle);

	assert_eq!(settle(outcome).await, in_progress("S1"));
	assert!(host.loads().is_empty());
}

#[tokio::test]
async fn only_first_start_counts() {
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S1"))]);
	let host = RecordingHost::new();
	let (driver, _outcome) = spawn(&api, &host);

	driver.start(SessionRequest::Vehicle);
	driver.start(SessionRequest::Vehicle);
	driver.resume("S9");
	eventually(|| host.loads().len() == 1).await;
	tokio::time::sleep(Duration::from_millis(30)).await;

	assert_eq!(api.calls(), vec![Call::Create(SessionRequest::Vehicle)]);
}

#[tokio::test]
async fn resume_fetches_existing_session() {
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S7"))]);
	let host = RecordingHost::new();
	let observer = Arc::new(RecordingObserver::default());
	let (driver, _outcome) = SessionDriver::builder("u1", host.clone())
		.api(api.clone())
		.observer(observer.clone())
		.spawn();

	driver.resume("S7");
	eventually(|| host.loads().len() == 1).await;

	assert_eq!(api.calls(), vec![Call::Get("S7".into())]);
	assert!(observer.created.lock().is_empty());
}

#[tokio::test]
async fn dropping_every_handle_ends_flow() {
	let api = ScriptedApi::new([Reply::ok(live_descriptor("S1"))]);
	let host = RecordingHost::new();
	let (driver, outcome) = spawn(&api, &host);
	let mut phase = driver.subscribe();
	driver.start(SessionRequest::Vehicle);
	wait_phase(&mut phase, |p| matches!(p, SessionPhase::Live(_))).await;

	drop(driver);
	assert_eq!(settle(outcome).await, in_progress("S1"));
}
