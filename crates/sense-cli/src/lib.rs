//! # sense-cli
//!
//! Command-line interface for the Sense safety controller.
//!
//! ## Commands
//!
//! - `sense simulate <scenario>`: Run the controller against a simulated world
//! - `sense config`: Show the effective configuration
//! - `sense doctor`: Validate the configuration
//! - `sense init`: Write a starter `sense.toml`

pub mod commands;

pub use commands::Cli;
