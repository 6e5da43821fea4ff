//! CLI settings layered from the config file, the environment, and flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use evc::{AccessTokenProvider, ApiConfig, NoToken, StaticToken};
use evc_runtime::config::{ENV_API_KEY, ENV_API_URL};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};
use crate::logging::LogLevel;

/// Environment variable holding a bearer token.
pub const ENV_TOKEN: &str = "EVC_TOKEN";

/// Where the CLI keeps its files.
///
/// Config lives under the XDG config dir (`~/.config/evc/`), stored sessions
/// under the local data dir (`~/.local/share/evc/`).
#[derive(Debug, Clone)]
pub struct Paths {
	pub config: PathBuf,
	pub sessions: PathBuf,
}

impl Paths {
	pub fn discover() -> Result<Self> {
		let config_dir = dirs::config_dir().ok_or(CliError::NoPlatformDir("config"))?;
		let data_dir = dirs::data_local_dir().ok_or(CliError::NoPlatformDir("data"))?;
		Ok(Self::in_dirs(&config_dir.join("evc"), &data_dir.join("evc")))
	}

	pub fn in_dirs(config_dir: &Path, data_dir: &Path) -> Self {
		Self {
			config: config_dir.join("config.json"),
			sessions: data_dir.join("sessions.json"),
		}
	}
}

/// One settings layer. Unset fields defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub token: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub accept_language: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_ms: Option<u64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub log_level: Option<LogLevel>,
}

impl CliConfig {
	/// Reads `path`; a missing file is an empty layer.
	pub fn load(path: &Path) -> Result<Self> {
		let content = match fs::read_to_string(path) {
			Ok(content) => content,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
			Err(source) => {
				return Err(CliError::Read {
					path: path.to_path_buf(),
					source,
				});
			}
		};
		serde_json::from_str(&content).map_err(|source| CliError::Malformed {
			path: path.to_path_buf(),
			source,
		})
	}

	/// Layer read from `EVC_API_URL`, `EVC_API_KEY` and `EVC_TOKEN`.
	pub fn from_env() -> Self {
		let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
		Self {
			api_url: var(ENV_API_URL),
			api_key: var(ENV_API_KEY),
			token: var(ENV_TOKEN),
			..Default::default()
		}
	}

	/// Overrides every field `other` sets.
	pub fn merge(&mut self, other: &CliConfig) {
		fn take<T: Clone>(slot: &mut Option<T>, other: &Option<T>) {
			if other.is_some() {
				slot.clone_from(other);
			}
		}
		take(&mut self.api_url, &other.api_url);
		take(&mut self.api_key, &other.api_key);
		take(&mut self.token, &other.token);
		take(&mut self.accept_language, &other.accept_language);
		take(&mut self.timeout_ms, &other.timeout_ms);
		take(&mut self.log_level, &other.log_level);
	}

	/// Backend settings; `config_path` is named in the error when no URL is set.
	pub fn api_config(&self, config_path: &Path) -> Result<ApiConfig> {
		let url = self
			.api_url
			.as_deref()
			.map(str::trim)
			.filter(|u| !u.is_empty())
			.ok_or_else(|| CliError::MissingApiUrl(config_path.to_path_buf()))?;

		let mut config = ApiConfig::parse(url)?;
		if let Some(key) = &self.api_key {
			config = config.with_api_key(key.clone());
		}
		if let Some(ms) = self.timeout_ms {
			config = config.with_timeout(Duration::from_millis(ms));
		}
		if let Some(language) = &self.accept_language {
			config = config.with_accept_language(language.clone());
		}
		Ok(config)
	}

	pub fn token_provider(&self) -> Arc<dyn AccessTokenProvider> {
		match self.token.as_deref().filter(|t| !t.is_empty()) {
			Some(token) => Arc::new(StaticToken::new(token)),
			None => Arc::new(NoToken),
		}
	}
}
