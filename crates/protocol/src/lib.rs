//! Wire types for the connect session backend.
//!
//! This crate contains the serde-serializable shapes exchanged with the
//! energy-management backend while linking a vehicle or charger:
//!
//! - [`ConnectSessionDescriptor`] - server-issued snapshot of a session
//! - [`RedirectCapture`] - what to harvest when a redirect event fires
//! - [`SessionInfo`] - the harvested payload posted back
//! - [`SessionRequest`] - the kind of session a host asks to create
//! - [`ConnectSessionResult`] - the single terminal outcome of a flow
//! - [`ApiProblem`] - problem-details body returned on client errors
//!
//! Types here carry no behavior beyond serialization and a few accessors.
//! The flow itself lives in `evc-rs`.

pub mod descriptor;
pub mod outcome;
pub mod problem;
pub mod request;

pub use descriptor::*;
pub use outcome::*;
pub use problem::*;
pub use request::*;
