use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// How much the client reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
	/// Nothing at all.
	None,
	/// Failures only.
	#[default]
	Errors,
	/// Everything the flow does.
	All,
}

impl LogLevel {
	/// Level implied by `-v` flags; `None` when no flag was given.
	pub fn from_verbosity(verbosity: u8) -> Option<Self> {
		(verbosity > 0).then_some(LogLevel::All)
	}

	/// `EnvFilter` directive for this level.
	///
	/// `-vv` and up also surfaces HTTP plumbing.
	pub fn directive(self, verbosity: u8) -> &'static str {
		match (self, verbosity) {
			(LogLevel::None, _) => "off",
			(LogLevel::Errors, _) => "error",
			(LogLevel::All, 0 | 1) => "info,evc=debug,hyper=warn,reqwest=warn",
			(LogLevel::All, _) => "debug",
		}
	}
}

pub fn init_logging(level: LogLevel, verbosity: u8) {
	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive(verbosity)));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(true)
		.with_level(true)
		.compact()
		.init();
}
