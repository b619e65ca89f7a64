//! Shared foundations for Switchboard.
//!
//! - [`config`] — typed configuration, JSON file + env overrides
//! - [`env`] — the [`env::Environment`] trait used for every variable lookup
//! - [`utils`] — paths and string helpers

pub mod config;
pub mod env;
pub mod utils;

pub use env::{Environment, MapEnvironment, ProcessEnvironment};
