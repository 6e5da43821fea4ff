//! Creation intents supplied by the host at flow start.

use serde::{Deserialize, Serialize};

/// Kind of connect session to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionRequest {
	/// Link a vehicle the user picks during the flow.
	Vehicle,
	/// Link one specific, already known vehicle.
	SelectedVehicle {
		/// Identifier of the vehicle to link.
		vehicle_id: String,
	},
	/// Link a charger at a charging location.
	Charger {
		/// Identifier of the charging location owning the charger.
		charging_location_id: String,
	},
	/// Link the energy supplier contract of a charging location.
	EnergySupplier {
		/// Identifier of the charging location.
		charging_location_id: String,
	},
}

impl SessionRequest {
	/// Short name used in logs.
	pub fn kind(&self) -> &'static str {
		match self {
			SessionRequest::Vehicle => "vehicle",
			SessionRequest::SelectedVehicle { .. } => "selected_vehicle",
			SessionRequest::Charger { .. } => "charger",
			SessionRequest::EnergySupplier { .. } => "energy_supplier",
		}
	}
}
