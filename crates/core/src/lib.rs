//! Connect session flows for linking vehicles, chargers and energy suppliers.
//!
//! A flow walks the user through a backend-driven sequence of web pages. The
//! backend hands out a [`ConnectSessionDescriptor`] naming the page to show
//! and the redirect prefix to watch for; when the web view navigates to that
//! prefix, the flow harvests what the descriptor asks for, posts it back, and
//! shows the next page, until the backend marks the session finished.
//!
//! # Layout
//!
//! - [`Sdk`] / [`SdkConfig`]: one-shot configuration and flow entry points
//! - [`SessionDriver`]: the per-flow state machine, published as [`SessionPhase`]
//! - [`ConnectHost`]: the web view capabilities a host provides
//! - [`classify`] and [`extract`]: pure navigation classification and
//!   redirect payload harvesting
//! - [`FailurePolicy`]: how backend failures surface to the user
//!
//! # Example
//!
//! ```ignore
//! let sdk = Sdk::new();
//! sdk.configure(SdkConfig::http(ApiConfig::parse("https://api.example.com")?, Arc::new(NoToken))?)?;
//!
//! let flow = sdk.start_vehicle_session("user-1", host.clone());
//! // forward web view events: flow.driver.on_navigation_attempt(url) ...
//! match flow.outcome.await {
//!     ConnectSessionResult::Finished { session_id } => println!("linked via {session_id}"),
//!     other => println!("ended: {other:?}"),
//! }
//! ```

pub mod classify;
pub mod driver;
pub mod extract;
pub mod host;
pub mod observer;
pub mod outcome;
pub mod policy;
pub mod sdk;

pub use classify::{NEW_TAB_PREFIX, UrlClassification, classify};
pub use driver::{DriverBuilder, SessionDriver, SessionPhase};
pub use evc_protocol::{ConnectSessionDescriptor, ConnectSessionResult, RedirectCapture, SessionInfo, SessionRequest};
pub use evc_runtime::{AccessTokenProvider, ApiConfig, ApiFailure, ConfigError, NoToken, SessionApi, StaticToken};
pub use extract::{decode_js_string, extract, parse_cookies};
pub use host::{Alert, AlertChoice, CANCEL_LABEL, ConnectHost, CookieAccessor, PageBodyAccessor, RETRY_LABEL};
pub use observer::ConnectSessionObserver;
pub use outcome::OutcomeReceiver;
pub use policy::{FailureAction, FailurePolicy};
pub use sdk::{ConnectFlow, Sdk, SdkConfig};
