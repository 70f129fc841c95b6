//! # sense-sim
//!
//! A small, deterministic block world that implements every trait the
//! controller consumes. It steps vanilla-like gravity once per tick, publishes
//! `WorldEvent`s on its bus, and records every world call it receives so tests
//! and the CLI can assert on exactly what the controller did.

pub mod blocks;
pub mod world;

pub use blocks::sim_block;
pub use world::{Impact, SimAction, SimWorld, TICK_PERIOD};
