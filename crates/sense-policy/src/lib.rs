//! # sense-policy
//!
//! The synchronous half of the controller: everything that decides *where* and
//! *with what* to act, given one agent snapshot and read-only world access.
//! Nothing in this crate mutates the world or waits.

pub mod ignition;
pub mod items;
pub mod placement;
pub mod predict;

pub use ignition::{FLAG_ON_FIRE, STATUS_ON_FIRE, ignition_signal};
pub use items::{
    ItemCategory, ItemContext, ItemPolicy, RuleVerdict, Selection, categorize, name_matches,
    spawned_entity_name,
};
pub use placement::{PlacementSearch, SEARCH_WIDTH};
pub use predict::{GravityPredictor, MovementPredictor};
