use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{Parser, Subcommand, ValueEnum};
use evc::SessionRequest;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::logging::LogLevel;

fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().bold())
		.usage(AnsiColor::Green.on_default().bold())
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Cyan.on_default())
}

#[derive(Parser, Debug)]
#[command(name = "evc")]
#[command(about = "Link vehicles, chargers and energy suppliers through connect sessions")]
#[command(version)]
#[command(styles = cli_styles())]
pub struct Cli {
	/// Increase verbosity (-v flow events, -vv HTTP details)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Log level when no -v is given
	#[arg(long, global = true, value_enum)]
	pub log_level: Option<LogLevel>,

	/// Backend URL, e.g. https://api.example.com
	#[arg(long, global = true, value_name = "URL")]
	pub api_url: Option<String>,

	/// Value of the ApiKey header
	#[arg(long, global = true, value_name = "KEY")]
	pub api_key: Option<String>,

	/// Bearer token for the user
	#[arg(long, global = true, value_name = "TOKEN")]
	pub token: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

impl Cli {
	/// Settings layer made of the global flags.
	pub fn overrides(&self) -> CliConfig {
		CliConfig {
			api_url: self.api_url.clone(),
			api_key: self.api_key.clone(),
			token: self.token.clone(),
			log_level: LogLevel::from_verbosity(self.verbose).or(self.log_level),
			..Default::default()
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Start a new connect session
	Connect {
		/// What to connect
		#[arg(value_enum)]
		kind: TargetKind,

		/// Vehicle id for selected-vehicle, charging location id for charger and energy-supplier
		id: Option<String>,

		/// User the session belongs to
		#[arg(long, short)]
		user: String,
	},

	/// Continue a session that was left in progress
	Resume {
		/// Session identifier
		session: String,

		#[arg(long, short)]
		user: String,
	},

	/// List or forget stored in-progress sessions
	Sessions {
		#[command(subcommand)]
		action: Option<SessionsAction>,

		/// Only list this user's sessions
		#[arg(long, short)]
		user: Option<String>,
	},
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TargetKind {
	/// Pick a vehicle during the flow
	Vehicle,
	/// A vehicle that is already known
	SelectedVehicle,
	/// A charger at a charging location
	Charger,
	/// The energy supplier of a charging location
	EnergySupplier,
}

impl TargetKind {
	/// Builds the session request, checking that `id` fits this kind.
	pub fn request(self, id: Option<String>) -> Result<SessionRequest, CliError> {
		match (self, id) {
			(TargetKind::Vehicle, None) => Ok(SessionRequest::Vehicle),
			(TargetKind::Vehicle, Some(_)) => Err(CliError::UnexpectedTargetId),
			(TargetKind::SelectedVehicle, Some(vehicle_id)) => Ok(SessionRequest::SelectedVehicle { vehicle_id }),
			(TargetKind::Charger, Some(charging_location_id)) => Ok(SessionRequest::Charger { charging_location_id }),
			(TargetKind::EnergySupplier, Some(charging_location_id)) => {
				Ok(SessionRequest::EnergySupplier { charging_location_id })
			}
			(TargetKind::SelectedVehicle, None) => Err(CliError::MissingTargetId("a vehicle id")),
			(TargetKind::Charger | TargetKind::EnergySupplier, None) => {
				Err(CliError::MissingTargetId("a charging location id"))
			}
		}
	}
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum SessionsAction {
	/// Drop a stored session
	Forget { session: String },
}
