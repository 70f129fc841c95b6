//! # sense-config
//!
//! Configuration system for the Sense controller. Reads from `sense.toml` and
//! environment variables, in that precedence order, and exposes the runtime
//! overlay type used to patch options on a live controller.
//!
//! Supports hot-reload via filesystem watcher.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{
    ConfigWarning, FallCheck, ItemRule, LoggingConfig, MitigationOptions, OptionsPatch,
    SenseConfig, TimingConfig, WarningSeverity,
};
