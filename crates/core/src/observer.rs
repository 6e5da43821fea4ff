/// Lifecycle notifications for hosts that persist resumable sessions.
pub trait ConnectSessionObserver: Send + Sync {
	/// A create call returned the first descriptor of a new session.
	fn on_connect_session_created(&self, user_id: &str, session_id: &str);

	/// The backend marked the session finished.
	fn on_connect_session_finished(&self, user_id: &str, session_id: &str);
}
