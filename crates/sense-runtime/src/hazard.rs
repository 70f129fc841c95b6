//! Hazard flags and the re-entrancy guard around each mitigation.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Observable hazard state of one agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HazardFlags {
    pub is_falling: bool,
    pub is_on_fire: bool,
    pub mitigating_fall: bool,
    pub mitigating_fire: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hazard {
    Fall,
    Fire,
}

impl Hazard {
    pub fn as_str(&self) -> &'static str {
        match self {
            Hazard::Fall => "fall",
            Hazard::Fire => "fire",
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    flags: HazardFlags,
    /// Bumped on every death or respawn.
    generation: u64,
}

/// Per-agent hazard flags. Every read-then-set happens under one lock.
#[derive(Debug, Default)]
pub struct HazardState {
    inner: Mutex<Inner>,
}

impl HazardState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn flags(&self) -> HazardFlags {
        self.inner.lock().flags
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    pub fn set_falling(&self, falling: bool) {
        self.inner.lock().flags.is_falling = falling;
    }

    pub fn set_on_fire(&self, on_fire: bool) {
        self.inner.lock().flags.is_on_fire = on_fire;
    }

    /// Claim the mitigation slot for `hazard`. Returns `None` if one is
    /// already in flight; the slot is released when the guard drops.
    pub fn try_begin(self: &Arc<Self>, hazard: Hazard) -> Option<MitigationGuard> {
        let mut inner = self.inner.lock();
        let slot = match hazard {
            Hazard::Fall => &mut inner.flags.mitigating_fall,
            Hazard::Fire => &mut inner.flags.mitigating_fire,
        };
        if *slot {
            debug!(hazard = hazard.as_str(), "mitigation already in flight");
            return None;
        }
        *slot = true;
        Some(MitigationGuard {
            state: Arc::clone(self),
            hazard,
            generation: inner.generation,
        })
    }

    /// Clear every flag and start a new generation. Guards and lifelines from
    /// the previous generation become stale.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.flags = HazardFlags::default();
        inner.generation += 1;
    }

    pub fn lifeline(self: &Arc<Self>) -> Lifeline {
        Lifeline {
            state: Arc::clone(self),
            generation: self.generation(),
        }
    }
}

/// Holds a mitigation slot open.
#[derive(Debug)]
pub struct MitigationGuard {
    state: Arc<HazardState>,
    hazard: Hazard,
    generation: u64,
}

impl MitigationGuard {
    pub fn hazard(&self) -> Hazard {
        self.hazard
    }

    pub fn lifeline(&self) -> Lifeline {
        Lifeline {
            state: Arc::clone(&self.state),
            generation: self.generation,
        }
    }
}

impl Drop for MitigationGuard {
    fn drop(&mut self) {
        let mut inner = self.state.inner.lock();
        if inner.generation != self.generation {
            return;
        }
        match self.hazard {
            Hazard::Fall => inner.flags.mitigating_fall = false,
            Hazard::Fire => inner.flags.mitigating_fire = false,
        }
    }
}

/// Tells in-flight work whether the life it started in is still going.
#[derive(Debug, Clone)]
pub struct Lifeline {
    state: Arc<HazardState>,
    generation: u64,
}

impl Lifeline {
    pub fn is_current(&self) -> bool {
        self.state.generation() == self.generation
    }
}
