//! Library half of the `poa-authority` operator tool.
//!
//! [`config`] loads and validates the TOML description of an authority set;
//! [`commands`] turns it into cell data, lock args and subblock plans.

pub mod commands;
pub mod config;

pub use config::{CliConfig, ConfigError};
