//! # sense-core
//!
//! Core types, traits, and primitives for the Sense safety controller.
//! This crate defines the shared vocabulary used by every other crate in the workspace:
//! block-world geometry, agent snapshots, the world-facing traits a host must
//! implement, and the event bus that carries world notifications.

pub mod error;
pub mod event;
pub mod types;
pub mod world;

pub use error::{Result, SenseError};
pub use event::{EventBus, Subscription, WorldEvent};
pub use types::*;
pub use world::{AgentControl, AgentState, Bot, WorldQuery};

pub use glam::{DVec3, IVec3};
