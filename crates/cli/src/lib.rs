//! Terminal host for connect session flows.
//!
//! The `evc` binary prints the pages a flow wants shown and takes the user's
//! reports of what the browser did as line commands, standing in for an
//! embedded web view. In-progress sessions are remembered so they can be
//! resumed later.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod logging;
pub mod store;
