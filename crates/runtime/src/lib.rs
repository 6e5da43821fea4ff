//! Backend access for connect sessions.
//!
//! This crate is the networking half of the connect session client:
//!
//! - **Configuration**: [`ApiConfig`] describing where the backend lives
//! - **Authentication**: [`AccessTokenProvider`] supplying bearer tokens
//! - **Endpoints**: [`Endpoint`] paths and per-endpoint status mapping
//! - **Session API**: the [`SessionApi`] seam consumed by the session driver,
//!   with [`HttpSessionApi`] as the reqwest-backed implementation
//! - **Failures**: the closed [`ApiFailure`] taxonomy every call resolves to
//!
//! The driver in `evc-rs` only depends on [`SessionApi`], so tests and hosts
//! can substitute their own implementation.

pub mod api;
pub mod auth;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;

pub use api::SessionApi;
pub use auth::{AccessTokenProvider, NoToken, StaticToken};
pub use config::{ApiConfig, DEFAULT_TIMEOUT};
pub use endpoint::{API_PATH, Endpoint, ErrorMapping, Method};
pub use error::{ApiFailure, ApiResult, ConfigError};
pub use http::HttpSessionApi;
