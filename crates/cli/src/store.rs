//! Resumable sessions remembered between runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use evc::{ConnectSessionObserver, ConnectSessionResult};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CliError, Result};

/// A session that can be resumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
	pub user_id: String,
	pub session_id: String,
	/// Unix epoch seconds.
	pub updated_at: u64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
	#[serde(default)]
	sessions: Vec<StoredSession>,
}

/// JSON file of `(user, session)` pairs.
#[derive(Debug)]
pub struct SessionStore {
	path: PathBuf,
	sessions: Vec<StoredSession>,
}

impl SessionStore {
	/// Opens the store at `path`; a missing file is an empty store.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let sessions = match fs::read_to_string(&path) {
			Ok(content) => {
				serde_json::from_str::<StoreFile>(&content)
					.map_err(|source| CliError::Malformed {
						path: path.clone(),
						source,
					})?
					.sessions
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
			Err(source) => return Err(CliError::Read { path, source }),
		};
		Ok(Self { path, sessions })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn sessions(&self) -> &[StoredSession] {
		&self.sessions
	}

	pub fn for_user<'a>(&'a self, user_id: &'a str) -> impl Iterator<Item = &'a StoredSession> + 'a {
		self.sessions.iter().filter(move |s| s.user_id == user_id)
	}

	pub fn find(&self, session_id: &str) -> Option<&StoredSession> {
		self.sessions.iter().find(|s| s.session_id == session_id)
	}

	/// Remembers `session_id`, refreshing its timestamp if already known.
	pub fn record(&mut self, user_id: &str, session_id: &str) {
		let updated_at = now();
		match self.sessions.iter_mut().find(|s| s.session_id == session_id) {
			Some(existing) => {
				existing.user_id = user_id.to_string();
				existing.updated_at = updated_at;
			}
			None => self.sessions.push(StoredSession {
				user_id: user_id.to_string(),
				session_id: session_id.to_string(),
				updated_at,
			}),
		}
	}

	/// Forgets `session_id`, returning whether it was known.
	pub fn forget(&mut self, session_id: &str) -> bool {
		let before = self.sessions.len();
		self.sessions.retain(|s| s.session_id != session_id);
		self.sessions.len() != before
	}

	/// Applies a flow outcome: in-progress sessions are kept, finished ones dropped.
	pub fn apply_outcome(&mut self, user_id: &str, outcome: &ConnectSessionResult) {
		match outcome {
			ConnectSessionResult::InProgress { session_id } => self.record(user_id, session_id),
			ConnectSessionResult::Finished { session_id } => {
				self.forget(session_id);
			}
			ConnectSessionResult::NotStarted => {}
		}
	}

	pub fn save(&self) -> Result<()> {
		let write_err = |source| CliError::Write {
			path: self.path.clone(),
			source,
		};
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).map_err(write_err)?;
		}
		let file = StoreFile {
			sessions: self.sessions.clone(),
		};
		fs::write(&self.path, serde_json::to_string_pretty(&file)?).map_err(write_err)?;
		Ok(())
	}
}

/// Persists sessions as the flow reports them.
pub struct StoreObserver {
	store: Arc<Mutex<SessionStore>>,
}

impl StoreObserver {
	pub fn new(store: Arc<Mutex<SessionStore>>) -> Self {
		Self { store }
	}

	fn update(&self, change: impl FnOnce(&mut SessionStore)) {
		let mut store = self.store.lock();
		change(&mut store);
		if let Err(e) = store.save() {
			warn!(target = "evc.cli", error = %e, "failed to save session store");
		}
	}
}

impl ConnectSessionObserver for StoreObserver {
	fn on_connect_session_created(&self, user_id: &str, session_id: &str) {
		self.update(|store| store.record(user_id, session_id));
	}

	fn on_connect_session_finished(&self, _user_id: &str, session_id: &str) {
		self.update(|store| {
			store.forget(session_id);
		});
	}
}

fn now() -> u64 {
	SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}
