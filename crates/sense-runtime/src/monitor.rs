//! # Hazard Monitor
//!
//! The single place that decides whether to act. It watches ticks and
//! ignition signals, keeps the agent's [`HazardFlags`], and dispatches one
//! mitigation per hazard kind at a time onto its own task.

use parking_lot::RwLock;
use sense_config::{MitigationOptions, OptionsPatch};
use sense_core::{Bot, EntityId, EventBus, WorldEvent};
use sense_policy::{GravityPredictor, MovementPredictor, ignition_signal};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::confirm;
use crate::executor::Executor;
use crate::hazard::{Hazard, HazardFlags, HazardState, Lifeline, MitigationGuard};
use crate::outcome::{MitigationOutcome, NotHandledReason};
use crate::verify::{NameSimilarityVerifier, PlacementVerifier};

/// Vertical speed past which the agent counts as falling.
pub const FALLING_VELOCITY: f64 = -0.6;

struct Inner<B> {
    bot: Arc<B>,
    bus: EventBus,
    options: RwLock<MitigationOptions>,
    hazards: Arc<HazardState>,
    verifier: Box<dyn PlacementVerifier>,
    predictor: Box<dyn MovementPredictor>,
    /// An ignition is waiting for the agent to be on the ground.
    fire_pending: AtomicBool,
}

/// Reactive safety controller for one agent. Cheap to clone.
pub struct CommonSense<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for CommonSense<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builds a [`CommonSense`] with non-default collaborators.
pub struct CommonSenseBuilder<B> {
    bot: Arc<B>,
    bus: EventBus,
    options: MitigationOptions,
    verifier: Box<dyn PlacementVerifier>,
    predictor: Box<dyn MovementPredictor>,
}

impl<B: Bot + 'static> CommonSenseBuilder<B> {
    pub fn options(mut self, options: MitigationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn verifier(mut self, verifier: impl PlacementVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    pub fn predictor(mut self, predictor: impl MovementPredictor + 'static) -> Self {
        self.predictor = Box::new(predictor);
        self
    }

    pub fn build(self) -> CommonSense<B> {
        CommonSense {
            inner: Arc::new(Inner {
                bot: self.bot,
                bus: self.bus,
                options: RwLock::new(self.options),
                hazards: HazardState::new(),
                verifier: self.verifier,
                predictor: self.predictor,
                fire_pending: AtomicBool::new(false),
            }),
        }
    }
}

impl<B: Bot + 'static> CommonSense<B> {
    pub fn new(bot: Arc<B>, bus: EventBus, options: MitigationOptions) -> Self {
        Self::builder(bot, bus).options(options).build()
    }

    pub fn builder(bot: Arc<B>, bus: EventBus) -> CommonSenseBuilder<B> {
        CommonSenseBuilder {
            bot,
            bus,
            options: MitigationOptions::default(),
            verifier: Box::new(NameSimilarityVerifier::default()),
            predictor: Box::new(GravityPredictor::default()),
        }
    }

    // ── Configuration & observability ──────────────────────────

    pub fn options(&self) -> MitigationOptions {
        self.inner.options.read().clone()
    }

    /// Overlay `patch` onto the current options and return the result.
    /// Mitigations already running keep the options they started with.
    pub fn set_options(&self, patch: OptionsPatch) -> MitigationOptions {
        let mut options = self.inner.options.write();
        options.merge(patch);
        info!("mitigation options updated");
        options.clone()
    }

    pub fn replace_options(&self, options: MitigationOptions) {
        *self.inner.options.write() = options;
        info!("mitigation options replaced");
    }

    pub fn flags(&self) -> HazardFlags {
        self.inner.hazards.flags()
    }

    // ── Event handlers ─────────────────────────────────────────

    /// Once per simulation tick. Returns the dispatched fall mitigation, if any.
    pub fn on_tick(&self) -> Option<JoinHandle<MitigationOutcome>> {
        let options = self.options();
        if !options.fall_check.is_enabled() {
            return None;
        }
        let snapshot = self.inner.bot.snapshot().ok()?;
        let falling = snapshot.velocity.y < FALLING_VELOCITY && !snapshot.in_water;
        self.inner.hazards.set_falling(falling);
        if !falling || !options.auto_respond {
            return None;
        }
        let guard = self.inner.hazards.try_begin(Hazard::Fall)?;
        debug!(vy = snapshot.velocity.y, y = snapshot.position.y, "fall detected");
        let this = self.clone();
        Some(tokio::spawn(async move { this.mitigate(guard, options).await }))
    }

    /// An entity's combustion state changed. Returns the task waiting to put
    /// the agent out, if one was started.
    pub fn on_ignition(
        &self,
        entity_id: EntityId,
        ignited: bool,
    ) -> Option<JoinHandle<MitigationOutcome>> {
        let snapshot = self.inner.bot.snapshot().ok()?;
        if entity_id != snapshot.entity_id {
            return None;
        }
        self.inner.hazards.set_on_fire(ignited);
        if !ignited {
            return None;
        }

        let options = self.options();
        if !options.fire_check || !options.auto_respond {
            return None;
        }
        if options.no_extinguish_worlds.contains(&snapshot.dimension) {
            debug!(world = %snapshot.dimension, "fire allowed here, not extinguishing");
            return None;
        }
        if self.inner.hazards.flags().mitigating_fire
            || self.inner.fire_pending.swap(true, Ordering::SeqCst)
        {
            return None;
        }

        let lifeline = self.inner.hazards.lifeline();
        let this = self.clone();
        Some(tokio::spawn(async move {
            let ready = this.wait_until_grounded(&lifeline).await;
            // After a death the pending slot belongs to the next life's waiter.
            if !lifeline.is_current() {
                return MitigationOutcome::NotHandled(NotHandledReason::AgentLost);
            }
            this.inner.fire_pending.store(false, Ordering::SeqCst);
            if !ready {
                return MitigationOutcome::NotHandled(NotHandledReason::AlreadySafe);
            }
            this.put_out_fire().await
        }))
    }

    /// Clear every flag. In-flight mitigations notice on their own and stop.
    pub fn on_death(&self) {
        info!("agent died, resetting hazard state");
        self.inner.hazards.reset();
        self.inner.fire_pending.store(false, Ordering::SeqCst);
    }

    /// Route one world event. Returns any mitigation task it started.
    pub fn handle_event(&self, event: &WorldEvent) -> Option<JoinHandle<MitigationOutcome>> {
        match event {
            WorldEvent::Tick { .. } => self.on_tick(),
            WorldEvent::Death | WorldEvent::Spawn => {
                self.on_death();
                None
            }
            other => {
                let (entity_id, ignited) = ignition_signal(other)?;
                self.on_ignition(entity_id, ignited)
            }
        }
    }

    /// Consume world events until the host disconnects.
    pub async fn run(&self) {
        let mut sub = self.inner.bus.subscribe();
        info!("hazard monitor started");
        while let Some(event) = sub.recv().await {
            self.handle_event(&event);
        }
        info!("hazard monitor stopped");
    }

    pub fn spawn(&self) -> JoinHandle<()> {
        let this = self.clone();
        tokio::spawn(async move { this.run().await })
    }

    // ── Entry points ───────────────────────────────────────────

    /// Catch a fall now, unless fall checking is off or a fall mitigation is
    /// already in flight.
    pub async fn catch_fall(&self) -> MitigationOutcome {
        let options = self.options();
        if !options.fall_check.is_enabled() {
            return MitigationOutcome::NotHandled(NotHandledReason::Disabled);
        }
        let Some(guard) = self.inner.hazards.try_begin(Hazard::Fall) else {
            return MitigationOutcome::InProgress;
        };
        self.mitigate(guard, options).await
    }

    /// Put the agent out now. A call while one is in flight returns
    /// [`MitigationOutcome::InProgress`] without touching the world.
    pub async fn put_out_fire(&self) -> MitigationOutcome {
        let Some(guard) = self.inner.hazards.try_begin(Hazard::Fire) else {
            return MitigationOutcome::InProgress;
        };
        self.mitigate(guard, self.options()).await
    }

    /// Run the mitigation `guard` was issued for; the slot is released when it ends.
    async fn mitigate(&self, guard: MitigationGuard, options: MitigationOptions) -> MitigationOutcome {
        let hazard = guard.hazard();
        let span = info_span!(
            "mitigation",
            mitigation_id = %Uuid::new_v4(),
            hazard = hazard.as_str()
        );
        async move {
            let inner = &self.inner;
            let executor = Executor::new(
                inner.bot.as_ref(),
                &inner.bus,
                &options,
                inner.verifier.as_ref(),
                inner.predictor.as_ref(),
                guard.lifeline(),
            );
            info!("mitigation started");
            let outcome = match hazard {
                Hazard::Fall => executor.catch_fall().await,
                Hazard::Fire => executor.put_out_fire().await,
            };
            match &outcome {
                MitigationOutcome::Mitigated(m) => {
                    info!(method = ?m.method, item = %m.item, confirmed = m.confirmed, "mitigation finished");
                }
                other => warn!(outcome = %other, "mitigation did not succeed"),
            }
            drop(guard);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Block on ticks until the agent stands on the ground with no fall
    /// mitigation running. Gives up only if the fire goes out, the agent
    /// changes life, or it can no longer be observed.
    async fn wait_until_grounded(&self, lifeline: &Lifeline) -> bool {
        let mut sub = self.inner.bus.subscribe();
        loop {
            let flags = self.inner.hazards.flags();
            if !flags.is_on_fire || !lifeline.is_current() {
                return false;
            }
            let Ok(snapshot) = self.inner.bot.snapshot() else {
                return false;
            };
            if snapshot.on_ground && !flags.mitigating_fall {
                return true;
            }
            let tick = Duration::from_millis(self.options().timing.tick_timeout_ms);
            confirm::next_tick(&mut sub, tick).await;
        }
    }
}
