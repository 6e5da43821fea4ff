//! `evc sessions`.

use anyhow::Result;
use colored::Colorize;

use crate::cli::SessionsAction;
use crate::config::Paths;
use crate::error::CliError;
use crate::store::SessionStore;

pub fn run(paths: &Paths, action: Option<SessionsAction>, user_id: Option<&str>) -> Result<()> {
	let mut store = SessionStore::open(&paths.sessions)?;
	match action {
		None => {
			print!("{}", render_list(&store, user_id));
			Ok(())
		}
		Some(SessionsAction::Forget { session }) => {
			if !store.forget(&session) {
				return Err(CliError::UnknownSession(session).into());
			}
			store.save()?;
			println!("forgot {session}");
			Ok(())
		}
	}
}

/// One line per stored session, optionally limited to `user_id`.
pub fn render_list(store: &SessionStore, user_id: Option<&str>) -> String {
	let mut sessions: Vec<_> = store
		.sessions()
		.iter()
		.filter(|s| user_id.is_none_or(|user| s.user_id == user))
		.collect();
	if sessions.is_empty() {
		return format!("{}\n", "no stored sessions".dimmed());
	}
	sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

	sessions
		.into_iter()
		.map(|s| format!("{}  {}\n", s.session_id.bold(), s.user_id))
		.collect()
}
