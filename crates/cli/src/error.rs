use std::path::PathBuf;

use evc::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
	#[error("no API url configured; pass --api-url, set EVC_API_URL, or add apiUrl to {0}")]
	MissingApiUrl(PathBuf),

	#[error("cannot locate the {0} directory for this platform")]
	NoPlatformDir(&'static str),

	#[error("failed to read {path}")]
	Read {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to write {path}")]
	Write {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed JSON in {path}")]
	Malformed {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("this kind of connect session needs {0}")]
	MissingTargetId(&'static str),

	#[error("`connect vehicle` takes no id; use `connect selected-vehicle <ID>`")]
	UnexpectedTargetId,

	#[error("no stored session '{0}'")]
	UnknownSession(String),

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Json(#[from] serde_json::Error),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
