//! `evc connect` and `evc resume`.

use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use evc::{ConnectFlow, ConnectSessionResult, Sdk, SdkConfig, SessionRequest};
use parking_lot::Mutex;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::config::{CliConfig, Paths};
use crate::host::{HELP, TerminalHost, parse_command};
use crate::store::{SessionStore, StoreObserver};

pub async fn start(paths: &Paths, settings: &CliConfig, user_id: &str, request: SessionRequest) -> Result<()> {
	let (sdk, store) = prepare(paths, settings)?;
	let host = Arc::new(TerminalHost::stdout());
	host.say(HELP.dimmed());

	let flow = sdk.start_session(user_id, request, host.clone());
	let outcome = run_interactive(flow, &host, BufReader::new(tokio::io::stdin()))
		.await
		.context("reading commands from stdin")?;
	report(&host, &store, user_id, &outcome)
}

pub async fn resume(paths: &Paths, settings: &CliConfig, user_id: &str, session_id: &str) -> Result<()> {
	let (sdk, store) = prepare(paths, settings)?;
	let host = Arc::new(TerminalHost::stdout());
	host.say(HELP.dimmed());

	let flow = sdk.resume_session(user_id, session_id, host.clone());
	let outcome = run_interactive(flow, &host, BufReader::new(tokio::io::stdin()))
		.await
		.context("reading commands from stdin")?;
	report(&host, &store, user_id, &outcome)
}

fn prepare(paths: &Paths, settings: &CliConfig) -> Result<(Sdk, Arc<Mutex<SessionStore>>)> {
	let api = settings.api_config(&paths.config)?;
	let store = Arc::new(Mutex::new(SessionStore::open(&paths.sessions)?));

	let config = SdkConfig::http(api, settings.token_provider())?.with_observer(Arc::new(StoreObserver::new(store.clone())));
	let sdk = Sdk::new();
	sdk.configure(config)?;
	Ok((sdk, store))
}

/// Feeds input lines to the flow until it produces its outcome.
///
/// End of input abandons the flow.
pub async fn run_interactive<W, R>(flow: ConnectFlow, host: &TerminalHost<W>, input: R) -> std::io::Result<ConnectSessionResult>
where
	W: Write + Send,
	R: AsyncBufRead + Unpin,
{
	let ConnectFlow { driver, mut outcome } = flow;
	let mut lines = input.lines();

	loop {
		tokio::select! {
			biased;
			result = &mut outcome => return Ok(result),
			line = lines.next_line() => match line? {
				Some(line) => match parse_command(&line) {
					Ok(command) => host.apply(&driver, command).await,
					Err(message) => host.say(message.red()),
				},
				None => {
					debug!(target = "evc.cli", "input closed; abandoning flow");
					driver.force_close();
					return Ok(outcome.await);
				}
			},
		}
	}
}

/// Records `outcome` in the store and tells the user.
pub fn report<W: Write + Send>(
	host: &TerminalHost<W>,
	store: &Mutex<SessionStore>,
	user_id: &str,
	outcome: &ConnectSessionResult,
) -> Result<()> {
	{
		let mut store = store.lock();
		store.apply_outcome(user_id, outcome);
		store.save()?;
	}

	match outcome {
		ConnectSessionResult::Finished { session_id } => {
			host.say(format!("{} session {session_id} finished", "done:".green().bold()));
		}
		ConnectSessionResult::InProgress { session_id } => {
			host.say(format!(
				"{} session {session_id} is still in progress; continue with `evc resume {session_id} --user {user_id}`",
				"paused:".yellow().bold()
			));
		}
		ConnectSessionResult::NotStarted => host.say(format!("{} no session was started", "stopped:".red().bold())),
	}
	Ok(())
}
