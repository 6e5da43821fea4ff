use clap::Parser;
use colored::Colorize;
use evc_cli::cli::Cli;
use evc_cli::config::Paths;
use evc_cli::{commands, logging};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();

	if let Err(err) = run(cli).await {
		eprintln!("{} {err:#}", "error:".red().bold());
		std::process::exit(1);
	}
}

async fn run(cli: Cli) -> anyhow::Result<()> {
	let paths = Paths::discover()?;
	let settings = commands::resolve_settings(&cli, &paths)?;
	logging::init_logging(settings.log_level.unwrap_or_default(), cli.verbose);

	commands::dispatch(cli, paths, settings).await
}
