//! Process-level configuration and flow entry points.

use std::sync::{Arc, OnceLock};

use evc_protocol::SessionRequest;
use evc_runtime::{AccessTokenProvider, ApiConfig, ConfigError, HttpSessionApi, SessionApi};
use tracing::error;

use crate::driver::{DriverBuilder, SessionDriver};
use crate::host::ConnectHost;
use crate::observer::ConnectSessionObserver;
use crate::outcome::OutcomeReceiver;

/// What every flow started through an [`Sdk`] shares.
#[derive(Clone)]
pub struct SdkConfig {
	api: Arc<dyn SessionApi>,
	observer: Option<Arc<dyn ConnectSessionObserver>>,
}

impl SdkConfig {
	pub fn new(api: Arc<dyn SessionApi>) -> Self {
		Self { api, observer: None }
	}

	/// Talks to the backend described by `config` over HTTP.
	pub fn http(config: ApiConfig, tokens: Arc<dyn AccessTokenProvider>) -> Result<Self, ConfigError> {
		Ok(Self::new(Arc::new(HttpSessionApi::new(config, tokens)?)))
	}

	pub fn with_observer(mut self, observer: Arc<dyn ConnectSessionObserver>) -> Self {
		self.observer = Some(observer);
		self
	}
}

/// A started flow: the driver the host forwards events to, and its outcome.
pub struct ConnectFlow {
	pub driver: SessionDriver,
	pub outcome: OutcomeReceiver,
}

/// Entry point for hosts. Configure once, then start or resume flows.
#[derive(Default)]
pub struct Sdk {
	config: OnceLock<SdkConfig>,
}

impl Sdk {
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs `config`. Only the first call succeeds.
	pub fn configure(&self, config: SdkConfig) -> Result<(), ConfigError> {
		self.config.set(config).map_err(|_| ConfigError::AlreadyConfigured)
	}

	pub fn is_configured(&self) -> bool {
		self.config.get().is_some()
	}

	/// Starts a new session of the requested kind for `user_id`.
	pub fn start_session(&self, user_id: impl Into<String>, request: SessionRequest, host: Arc<dyn ConnectHost>) -> ConnectFlow {
		let (driver, outcome) = self.builder(user_id, host).spawn();
		driver.start(request);
		ConnectFlow { driver, outcome }
	}

	pub fn start_vehicle_session(&self, user_id: impl Into<String>, host: Arc<dyn ConnectHost>) -> ConnectFlow {
		self.start_session(user_id, SessionRequest::Vehicle, host)
	}

	pub fn start_selected_vehicle_session(
		&self,
		user_id: impl Into<String>,
		vehicle_id: impl Into<String>,
		host: Arc<dyn ConnectHost>,
	) -> ConnectFlow {
		let request = SessionRequest::SelectedVehicle {
			vehicle_id: vehicle_id.into(),
		};
		self.start_session(user_id, request, host)
	}

	pub fn start_charger_session(
		&self,
		user_id: impl Into<String>,
		charging_location_id: impl Into<String>,
		host: Arc<dyn ConnectHost>,
	) -> ConnectFlow {
		let request = SessionRequest::Charger {
			charging_location_id: charging_location_id.into(),
		};
		self.start_session(user_id, request, host)
	}

	pub fn start_energy_supplier_session(
		&self,
		user_id: impl Into<String>,
		charging_location_id: impl Into<String>,
		host: Arc<dyn ConnectHost>,
	) -> ConnectFlow {
		let request = SessionRequest::EnergySupplier {
			charging_location_id: charging_location_id.into(),
		};
		self.start_session(user_id, request, host)
	}

	/// Continues `session_id` from wherever the backend says it is.
	pub fn resume_session(&self, user_id: impl Into<String>, session_id: impl Into<String>, host: Arc<dyn ConnectHost>) -> ConnectFlow {
		let (driver, outcome) = self.builder(user_id, host).spawn();
		driver.resume(session_id);
		ConnectFlow { driver, outcome }
	}

	fn builder(&self, user_id: impl Into<String>, host: Arc<dyn ConnectHost>) -> DriverBuilder {
		let builder = SessionDriver::builder(user_id, host);
		let Some(config) = self.config.get() else {
			error!(target = "evc.session", "SDK is not configured; the flow will end without a session");
			return builder;
		};
		let builder = builder.api(Arc::clone(&config.api));
		match &config.observer {
			Some(observer) => builder.observer(Arc::clone(observer)),
			None => builder,
		}
	}
}
