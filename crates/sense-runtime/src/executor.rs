//! # Action Executor
//!
//! Performs the world-mutating side of a mitigation and confirms its effect:
//!
//! ```text
//!   tick ─► snapshot ─► placement search ─► item policy ─► orient ─► equip
//!                                                                     │
//!        ┌──────────────── within trigger height? ◄───────────────────┘
//!        ▼
//!   activate / place block / place entity ─► confirm ─► landing ─► cleanup
//! ```
//!
//! World-call failures are logged and turned into "try again next tick";
//! confirmation timeouts downgrade the result to unconfirmed. Nothing here
//! returns an error to the caller.

use sense_config::{FallCheck, MitigationOptions};
use sense_core::{
    Aabb, AgentSnapshot, Block, BlockPos, Bot, DVec3, EventBus, Hand, IVec3, Item,
};
use sense_policy::{
    ItemCategory, ItemContext, ItemPolicy, MovementPredictor, PlacementSearch, Selection,
    spawned_entity_name,
};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::confirm::{self, SETTLE_TICKS};
use crate::hazard::Lifeline;
use crate::mount::Ride;
use crate::outcome::{Method, Mitigation, MitigationOutcome, NotHandledReason};
use crate::retry::{attempt_budget, retry};
use crate::verify::PlacementVerifier;

/// Distance from the agent's eye within which placed liquid is picked back up.
pub const PICKUP_RANGE: f64 = 3.0;

/// What one fall attempt decided.
enum FallStep {
    Done(MitigationOutcome),
    /// Nothing usable in the inventory; look for something to ride instead.
    SeekMount,
}

/// Issues world calls for one mitigation on behalf of one agent.
pub struct Executor<'a, B> {
    pub(crate) bot: &'a B,
    pub(crate) bus: &'a EventBus,
    pub(crate) options: &'a MitigationOptions,
    verifier: &'a dyn PlacementVerifier,
    predictor: &'a dyn MovementPredictor,
    lifeline: Lifeline,
}

impl<'a, B: Bot> Executor<'a, B> {
    pub fn new(
        bot: &'a B,
        bus: &'a EventBus,
        options: &'a MitigationOptions,
        verifier: &'a dyn PlacementVerifier,
        predictor: &'a dyn MovementPredictor,
        lifeline: Lifeline,
    ) -> Self {
        Self {
            bot,
            bus,
            options,
            verifier,
            predictor,
            lifeline,
        }
    }

    pub fn hand(&self) -> Hand {
        Hand::from_offhand(self.options.use_offhand)
    }

    pub(crate) fn tick_timeout(&self) -> Duration {
        Duration::from_millis(self.options.timing.tick_timeout_ms)
    }

    pub(crate) fn confirm_timeout(&self) -> Duration {
        Duration::from_millis(self.options.timing.confirm_timeout_ms)
    }

    pub(crate) fn landing_timeout(&self) -> Duration {
        Duration::from_millis(self.options.timing.landing_timeout_ms)
    }

    fn spawn_timeout(&self) -> Duration {
        Duration::from_millis(self.options.timing.entity_spawn_timeout_ms)
    }

    /// Fresh agent state, or `None` once the agent is gone or has respawned.
    pub(crate) fn snapshot(&self) -> Option<AgentSnapshot> {
        if !self.lifeline.is_current() {
            return None;
        }
        self.bot.snapshot().ok()
    }

    /// The agent has died or respawned since this mitigation started.
    pub(crate) fn agent_lost(&self) -> bool {
        !self.lifeline.is_current()
    }

    pub(crate) fn search(&self) -> PlacementSearch<'_> {
        PlacementSearch::new(self.bot)
    }

    pub(crate) async fn wait_tick(&self) -> bool {
        let mut sub = self.bus.subscribe();
        confirm::next_tick(&mut sub, self.tick_timeout()).await
    }

    pub(crate) async fn orient(&self, point: DVec3) -> bool {
        match self.bot.look_at(point, true).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "look_at failed");
                false
            }
        }
    }

    /// Put `item` in the configured hand unless it is already there.
    pub(crate) async fn ensure_held(&self, item: &Item) -> bool {
        let hand = self.hand();
        let Some(snapshot) = self.snapshot() else {
            return false;
        };
        if snapshot.held(hand).is_some_and(|held| held.slot == item.slot) {
            return true;
        }
        match self.bot.equip(item, hand).await {
            Ok(()) => true,
            Err(e) => {
                warn!(item = %item.name, %hand, error = %e, "equip failed");
                false
            }
        }
    }

    // ── Fall mitigation ────────────────────────────────────────

    /// Catch the current fall, polling once per tick for at most
    /// `timing.fall_attempts` ticks.
    pub async fn catch_fall(&self) -> MitigationOutcome {
        if self.options.fall_check == FallCheck::MountOnly {
            return self.seek_mount().await;
        }

        let policy = ItemPolicy::from_options(self.options);
        let saw_surface = AtomicBool::new(false);
        let (this, policy_ref, saw_ref) = (self, &policy, &saw_surface);
        let step = retry(
            self.options.timing.fall_attempts,
            attempt_budget(&self.options.timing),
            move |attempt| async move { this.fall_attempt(attempt, policy_ref, saw_ref).await },
        )
        .await;

        match step {
            Some(FallStep::Done(outcome)) => outcome,
            Some(FallStep::SeekMount) => match self.seek_mount().await {
                MitigationOutcome::NotHandled(NotHandledReason::NoVehicle) => {
                    MitigationOutcome::NotHandled(NotHandledReason::NoEligibleItem)
                }
                other => other,
            },
            None if saw_surface.load(Ordering::Relaxed) => {
                MitigationOutcome::NotHandled(NotHandledReason::GaveUp)
            }
            None => MitigationOutcome::NotHandled(NotHandledReason::NoLandingSurface),
        }
    }

    async fn fall_attempt(
        &self,
        attempt: u32,
        policy: &ItemPolicy<'_>,
        saw_surface: &AtomicBool,
    ) -> ControlFlow<FallStep> {
        let Some(snapshot) = self.snapshot() else {
            return ControlFlow::Break(FallStep::Done(MitigationOutcome::NotHandled(
                NotHandledReason::AgentLost,
            )));
        };
        if snapshot.in_water || snapshot.on_ground {
            debug!(attempt, "fall ended on its own");
            return ControlFlow::Break(FallStep::Done(MitigationOutcome::NotHandled(
                NotHandledReason::AlreadySafe,
            )));
        }

        let surface = match self.options.fall_check {
            FallCheck::Predictive { predict_ticks } => {
                self.search()
                    .find_predicted(&snapshot, self.predictor, predict_ticks)
            }
            _ => self.search().find(&snapshot),
        };
        let Some(surface) = surface else {
            debug!(attempt, y = snapshot.position.y, "no landing surface below");
            self.wait_tick().await;
            return ControlFlow::Continue(());
        };
        saw_surface.store(true, Ordering::Relaxed);

        let ctx = ItemContext {
            fall_distance: snapshot.fall_distance,
            landing: Some(&surface),
            world: &snapshot.dimension,
        };
        let Some(selection) = policy.select(&ctx, &snapshot.inventory) else {
            info!(surface = %surface.name, "no eligible item for this fall");
            return ControlFlow::Break(FallStep::SeekMount);
        };

        self.orient(surface.center()).await;
        if !self.ensure_held(&selection.item).await {
            self.wait_tick().await;
            return ControlFlow::Continue(());
        }

        let trigger = surface.position.y as f64 + self.options.timing.trigger_height;
        if snapshot.position.y > trigger {
            debug!(attempt, y = snapshot.position.y, trigger, item = %selection.item.name, "waiting for trigger height");
            self.wait_tick().await;
            return ControlFlow::Continue(());
        }

        // The agent may have died while we were turning and equipping.
        if self.agent_lost() {
            return ControlFlow::Break(FallStep::Done(MitigationOutcome::NotHandled(
                NotHandledReason::AgentLost,
            )));
        }

        info!(
            item = %selection.item.name,
            category = ?selection.category,
            surface = %surface.position,
            "using mitigation item"
        );
        let used = self.use_item(&selection, &surface).await;
        if self.agent_lost() {
            return ControlFlow::Break(FallStep::Done(MitigationOutcome::NotHandled(
                NotHandledReason::AgentLost,
            )));
        }
        match used {
            Some(mitigation) => {
                ControlFlow::Break(FallStep::Done(MitigationOutcome::Mitigated(mitigation)))
            }
            None => {
                self.wait_tick().await;
                ControlFlow::Continue(())
            }
        }
    }

    /// Use the held selection against `surface` according to its category.
    /// `None` means the world rejected the action.
    pub async fn use_item(&self, selection: &Selection, surface: &Block) -> Option<Mitigation> {
        match selection.category {
            ItemCategory::Activatable => self.pour(&selection.item, surface).await,
            ItemCategory::Placeable => self.place_solid(&selection.item, surface).await,
            ItemCategory::Vehicle => self.place_vehicle(&selection.item, surface).await,
        }
    }

    async fn pour(&self, item: &Item, surface: &Block) -> Option<Mitigation> {
        let expected = surface.position + IVec3::Y;
        let mut sub = self.bus.subscribe();
        if let Err(e) = self.bot.activate_item(self.hand()).await {
            warn!(item = %item.name, error = %e, "activate failed");
            return None;
        }

        let placed = confirm::liquid_placed(&mut sub, expected, self.confirm_timeout()).await;
        if placed.is_none() {
            warn!(expected = %expected, "no liquid confirmation before timeout");
        }
        let cell = placed.unwrap_or(expected);

        let landed = self.await_contact(&mut sub, cell).await;
        if !landed {
            warn!(cell = %cell, "agent never reached the liquid");
        }
        self.settle().await;
        self.pick_up_water(cell).await;

        Some(Mitigation {
            method: Method::Liquid,
            item: item.name.clone(),
            target: cell,
            confirmed: placed.is_some() && landed,
        })
    }

    async fn place_solid(&self, item: &Item, surface: &Block) -> Option<Mitigation> {
        let mut sub = self.bus.subscribe();
        let dest = match self.bot.place_block(surface, IVec3::Y, self.hand()).await {
            Ok(dest) => dest,
            Err(e) => {
                warn!(item = %item.name, surface = %surface.position, error = %e, "place_block failed");
                return None;
            }
        };

        let verified = confirm::block_placed(&mut sub, dest, self.confirm_timeout(), |block| {
            self.verifier.verify(item, block)
        })
        .await;
        if !verified {
            warn!(dest = %dest, item = %item.name, "placement not confirmed");
        }

        let landed = confirm::wait_until(&mut sub, self.landing_timeout(), || {
            self.snapshot()
                .is_some_and(|s| s.on_ground || s.in_water)
        })
        .await;

        Some(Mitigation {
            method: Method::Block,
            item: item.name.clone(),
            target: dest,
            confirmed: verified && landed,
        })
    }

    async fn place_vehicle(&self, item: &Item, surface: &Block) -> Option<Mitigation> {
        let dest = surface.position + IVec3::Y;
        let mut sub = self.bus.subscribe();
        if let Err(e) = self.bot.place_entity(surface, IVec3::Y, self.hand()).await {
            warn!(item = %item.name, error = %e, "place_entity failed");
            return None;
        }

        let name = spawned_entity_name(&item.name);
        let max_distance = if name == "boat" { 3.0 } else { 2.0 };
        let near = dest.as_dvec3() + DVec3::new(0.5, 0.0, 0.5);
        let spawned =
            confirm::entity_spawned(&mut sub, name, near, max_distance, self.spawn_timeout()).await;

        let ridden = match &spawned {
            Some(entity) => self.ride(entity).await == Ride::Confirmed,
            None => {
                warn!(entity = name, "vehicle spawn not observed");
                false
            }
        };

        Some(Mitigation {
            method: Method::Vehicle,
            item: item.name.clone(),
            target: dest,
            confirmed: ridden,
        })
    }

    // ── Shared confirmation & cleanup ──────────────────────────

    /// Wait until the agent's box overlaps `cell`.
    pub(crate) async fn await_contact(
        &self,
        sub: &mut sense_core::Subscription,
        cell: BlockPos,
    ) -> bool {
        let target = Aabb::for_block(cell);
        confirm::wait_until(sub, self.landing_timeout(), || {
            self.snapshot()
                .is_some_and(|s| s.aabb().intersects(&target))
        })
        .await
    }

    pub(crate) async fn settle(&self) {
        let mut sub = self.bus.subscribe();
        confirm::wait_ticks(&mut sub, SETTLE_TICKS, self.tick_timeout()).await;
    }

    /// Scoop up a water source (or drain a waterlogged block) near `near`
    /// with an empty bucket. Returns whether anything was attempted.
    pub async fn pick_up_water(&self, near: BlockPos) -> bool {
        let Some(snapshot) = self.snapshot() else {
            return false;
        };
        let eye = snapshot.eye_position();
        let origin = near.as_dvec3() + DVec3::splat(0.5);
        let found = self.bot.find_block(origin, self.options.reach, &|block: &Block| {
            block.holds_water() && block.aabb().distance_to(eye) < PICKUP_RANGE
        });
        let Some(water) = found else {
            debug!(near = %near, "no water to pick up");
            return false;
        };

        let hand = self.hand();
        if !snapshot.held(hand).is_some_and(|item| item.name == "bucket") {
            let Some(bucket) = snapshot.inventory.iter().find(|item| item.name == "bucket") else {
                debug!("no empty bucket to pick water up with");
                return false;
            };
            if !self.ensure_held(bucket).await {
                return false;
            }
        }

        self.orient(water.center()).await;
        match self.bot.activate_item(hand).await {
            Ok(()) => {
                debug!(at = %water.position, "picked water back up");
                true
            }
            Err(e) => {
                warn!(error = %e, "water pickup failed");
                false
            }
        }
    }
}
