//! # sense-runtime
//!
//! The async half of the controller: the hazard monitor and everything it
//! dispatches.
//!
//! ## Architecture
//!
//! ```text
//!        WorldEvent bus (ticks, status, block changes, spawns, mounts)
//!                     │
//!                     ▼
//!              ┌──────────────┐
//!              │ CommonSense  │  ← hazard flags, one mitigation per kind
//!              └──────┬───────┘
//!                     │ spawn (uuid-tagged span)
//!                     ▼
//!              ┌──────────────┐
//!              │   Executor   │  ← retry loop: search → policy → act → confirm
//!              └──────┬───────┘
//!         ┌───────────┼────────────┐
//!         ▼           ▼            ▼
//!    place / pour   mount       extinguish
//! ```

pub mod confirm;
pub mod executor;
mod fire;
pub mod hazard;
pub mod monitor;
mod mount;
pub mod outcome;
pub mod retry;
pub mod verify;

pub use executor::{Executor, PICKUP_RANGE};
pub use hazard::{Hazard, HazardFlags, HazardState, Lifeline, MitigationGuard};
pub use monitor::{CommonSense, CommonSenseBuilder, FALLING_VELOCITY};
pub use outcome::{Method, Mitigation, MitigationOutcome, NotHandledReason};
pub use retry::{attempt_budget, retry};
pub use verify::{NameSimilarityVerifier, PlacementVerifier, edit_distance};
