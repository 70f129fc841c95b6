//! Mount-seeking fallback: when nothing can be placed, ride whatever is near.

use sense_core::{AgentSnapshot, Bot, DVec3, Entity, Hand};
use std::ops::ControlFlow;
use tracing::{debug, info, warn};

use crate::confirm;
use crate::executor::Executor;
use crate::outcome::{Method, Mitigation, MitigationOutcome, NotHandledReason};
use crate::retry::{attempt_budget, retry};

/// How one mount attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Ride {
    Confirmed,
    Failed,
    /// The agent died before the mount was issued.
    AgentLost,
}

impl<B: Bot> Executor<'_, B> {
    /// Poll once per tick, for at most `timing.mount_attempts` ticks, for a
    /// rideable entity in reach; mount it, then get straight off again.
    pub async fn seek_mount(&self) -> MitigationOutcome {
        let this = self;
        let outcome = retry(
            self.options.timing.mount_attempts,
            attempt_budget(&self.options.timing),
            move |attempt| async move {
                let Some(snapshot) = this.snapshot() else {
                    return ControlFlow::Break(MitigationOutcome::NotHandled(
                        NotHandledReason::AgentLost,
                    ));
                };
                if attempt > 0 && (snapshot.on_ground || snapshot.in_water) {
                    debug!(attempt, "stopped falling before a vehicle was found");
                    return ControlFlow::Break(MitigationOutcome::NotHandled(
                        NotHandledReason::NoVehicle,
                    ));
                }

                if let Some(vehicle) = this.nearest_vehicle(&snapshot) {
                    info!(entity = %vehicle.name, id = vehicle.id, "mounting nearby vehicle");
                    match this.ride(&vehicle).await {
                        Ride::Confirmed => {
                            return ControlFlow::Break(MitigationOutcome::Mitigated(Mitigation {
                                method: Method::Mount,
                                item: vehicle.name.clone(),
                                target: vehicle.position.floor().as_ivec3(),
                                confirmed: true,
                            }));
                        }
                        Ride::AgentLost => {
                            return ControlFlow::Break(MitigationOutcome::NotHandled(
                                NotHandledReason::AgentLost,
                            ));
                        }
                        Ride::Failed => {}
                    }
                }
                this.wait_tick().await;
                ControlFlow::Continue(())
            },
        )
        .await;
        outcome.unwrap_or(MitigationOutcome::NotHandled(NotHandledReason::NoVehicle))
    }

    /// Closest entity whose name is an allowed vehicle and whose box is in reach.
    pub fn nearest_vehicle(&self, snapshot: &AgentSnapshot) -> Option<Entity> {
        let eye = snapshot.eye_position();
        let reach = self.options.reach;
        self.bot
            .entities()
            .into_iter()
            .filter(|e| e.id != snapshot.entity_id)
            .filter(|e| self.options.mount_vehicle_names.contains(&e.name))
            .map(|e| (e.aabb().distance_to(eye), e))
            .filter(|(distance, _)| *distance <= reach)
            .min_by(|(da, a), (db, b)| da.total_cmp(db).then(a.id.cmp(&b.id)))
            .map(|(_, e)| e)
    }

    /// Mount `entity`, wait for the world to confirm, then dismount.
    pub(crate) async fn ride(&self, entity: &Entity) -> Ride {
        self.orient(entity.position + DVec3::new(0.0, entity.height / 2.0, 0.0))
            .await;

        if self.options.mount_empty_hand {
            let holding = self
                .snapshot()
                .is_some_and(|s| s.held(Hand::Main).is_some());
            if holding {
                if let Err(e) = self.bot.unequip(Hand::Main).await {
                    warn!(error = %e, "unequip before mounting failed");
                }
            }
        }

        if self.agent_lost() {
            debug!(entity = %entity.name, "agent lost before mounting");
            return Ride::AgentLost;
        }
        let mut sub = self.bus.subscribe();
        if let Err(e) = self.bot.mount(entity).await {
            warn!(entity = %entity.name, error = %e, "mount failed");
            return Ride::Failed;
        }
        if !confirm::mounted(&mut sub, entity.id, self.confirm_timeout()).await {
            warn!(entity = %entity.name, "mount not confirmed");
            return Ride::Failed;
        }
        if let Err(e) = self.bot.dismount().await {
            warn!(error = %e, "dismount failed");
        }
        Ride::Confirmed
    }
}
