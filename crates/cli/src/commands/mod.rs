//! Command dispatch.

pub mod connect;
pub mod sessions;

use anyhow::Result;

use crate::cli::{Cli, Commands};
use crate::config::{CliConfig, Paths};

/// Settings merged from the config file, the environment, and `cli` flags.
pub fn resolve_settings(cli: &Cli, paths: &Paths) -> Result<CliConfig> {
	let mut settings = CliConfig::load(&paths.config)?;
	settings.merge(&CliConfig::from_env());
	settings.merge(&cli.overrides());
	Ok(settings)
}

pub async fn dispatch(cli: Cli, paths: Paths, settings: CliConfig) -> Result<()> {
	match cli.command {
		Commands::Connect { kind, id, user } => connect::start(&paths, &settings, &user, kind.request(id)?).await,
		Commands::Resume { session, user } => connect::resume(&paths, &settings, &user, &session).await,
		Commands::Sessions { action, user } => sessions::run(&paths, action, user.as_deref()),
	}
}
