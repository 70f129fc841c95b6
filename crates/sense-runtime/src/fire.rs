//! Fire extinguish sequence.

use sense_core::{AgentSnapshot, Block, BlockPos, Bot, DVec3, IVec3};
use tracing::{debug, info, warn};

use crate::confirm;
use crate::executor::Executor;
use crate::outcome::{Method, Mitigation, MitigationOutcome, NotHandledReason};

const WATER_ITEM: &str = "water_bucket";

impl<B: Bot> Executor<'_, B> {
    /// Pour water to put the agent out, then take it back.
    ///
    /// Every wait is best-effort: a missing confirmation only marks the
    /// result unconfirmed.
    pub async fn put_out_fire(&self) -> MitigationOutcome {
        let hand = self.hand();
        let Some(snapshot) = self.snapshot() else {
            return MitigationOutcome::NotHandled(NotHandledReason::AgentLost);
        };

        let holding = snapshot
            .held(hand)
            .is_some_and(|item| item.name.contains(WATER_ITEM));
        if !holding {
            let Some(water) = snapshot
                .items_except_held(hand)
                .find(|item| item.name.contains(WATER_ITEM))
            else {
                info!("on fire with no water to put it out");
                return MitigationOutcome::NotHandled(NotHandledReason::NoWaterItem);
            };
            if !self.ensure_held(water).await && !self.agent_lost() {
                return MitigationOutcome::NotHandled(NotHandledReason::NoWaterItem);
            }
        }
        let Some(equipped) = self.snapshot() else {
            return MitigationOutcome::NotHandled(NotHandledReason::AgentLost);
        };
        let item = equipped
            .held(hand)
            .map(|i| i.name.clone())
            .filter(|name| name.contains(WATER_ITEM));
        let Some(item) = item else {
            return MitigationOutcome::NotHandled(NotHandledReason::NoWaterItem);
        };

        let target = self.extinguish_target(&snapshot).await;
        self.orient(target.as_dvec3() + DVec3::splat(0.5)).await;

        // Digging and turning both suspend; the agent may have died meanwhile.
        if self.agent_lost() {
            debug!("agent lost before pouring");
            return MitigationOutcome::NotHandled(NotHandledReason::AgentLost);
        }

        let expected = target + IVec3::Y;
        let mut sub = self.bus.subscribe();
        if let Err(e) = self.bot.activate_item(hand).await {
            warn!(error = %e, "could not pour water");
            return MitigationOutcome::NotHandled(NotHandledReason::GaveUp);
        }

        let placed = confirm::liquid_placed(&mut sub, expected, self.confirm_timeout()).await;
        if placed.is_none() {
            warn!(expected = %expected, "no liquid confirmation before timeout");
        }
        let cell = placed.unwrap_or(expected);
        let touched = self.await_contact(&mut sub, cell).await;
        self.settle().await;
        self.pick_up_water(cell).await;

        MitigationOutcome::Mitigated(Mitigation {
            method: Method::Extinguish,
            item,
            target: cell,
            confirmed: placed.is_some() && touched,
        })
    }

    /// Cell to pour against: under the nearest fire or lava (digging out the
    /// fire first), else the landing surface, else straight down.
    async fn extinguish_target(&self, snapshot: &AgentSnapshot) -> BlockPos {
        if let Some(source) = self.reachable_fire_causers(snapshot).into_iter().next() {
            debug!(at = %source.position, block = %source.name, "found fire source");
            if source.diggable {
                if let Err(e) = self.bot.dig(&source, true).await {
                    warn!(error = %e, "could not dig out fire");
                }
            }
            return source.position - IVec3::Y;
        }
        if let Some(surface) = self.search().find(snapshot) {
            return surface.position;
        }
        (snapshot.position - DVec3::Y).floor().as_ivec3()
    }

    /// Fire and lava whose box lies within `timing.fire_search_radius` of the
    /// agent's eye, nearest first.
    pub fn reachable_fire_causers(&self, snapshot: &AgentSnapshot) -> Vec<Block> {
        let eye = snapshot.eye_position();
        let radius = self.options.timing.fire_search_radius;
        self.bot
            .find_blocks(
                snapshot.position,
                radius + sense_core::EYE_HEIGHT,
                &|block: &Block| block.causes_fire() && block.aabb().distance_to(eye) < radius,
            )
            .into_iter()
            .filter_map(|pos| self.bot.block_at(pos))
            .collect()
    }
}
