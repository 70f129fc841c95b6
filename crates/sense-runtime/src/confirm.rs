//! Confirmation waits.
//!
//! Every wait here is "first matching event or timeout, whichever comes
//! first" on a [`Subscription`] taken *before* the action it confirms, so an
//! event published during the world call itself is not missed.

use sense_core::{Block, BlockPos, DVec3, Entity, EntityId, Subscription, WorldEvent};
use std::time::Duration;

/// Ticks a poured liquid is given to settle before it is picked back up.
pub const SETTLE_TICKS: u32 = 3;

/// How far from the expected cell an observed liquid may appear.
const LIQUID_TOLERANCE: f64 = 1.5;

/// Wait for the next simulation tick.
pub async fn next_tick(sub: &mut Subscription, timeout: Duration) -> bool {
    sub.next_matching(timeout, |event| {
        matches!(event, WorldEvent::Tick { .. }).then_some(())
    })
    .await
    .is_some()
}

/// Wait for `ticks` ticks, each bounded by `per_tick`. Returns how many arrived.
pub async fn wait_ticks(sub: &mut Subscription, ticks: u32, per_tick: Duration) -> u32 {
    let mut seen = 0;
    for _ in 0..ticks {
        if !next_tick(sub, per_tick).await {
            break;
        }
        seen += 1;
    }
    seen
}

/// Re-check `condition` after every event until it holds or `timeout` elapses.
pub async fn wait_until<F>(sub: &mut Subscription, timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    if condition() {
        return true;
    }
    sub.next_matching(timeout, |_| condition().then_some(()))
        .await
        .is_some()
}

/// A block turned into liquid near `expected`. Returns the cell it appeared in.
pub async fn liquid_placed(
    sub: &mut Subscription,
    expected: BlockPos,
    timeout: Duration,
) -> Option<BlockPos> {
    let target = expected.as_dvec3();
    sub.next_matching(timeout, |event| match event {
        WorldEvent::BlockUpdate { new, .. }
            if (new.is_water() || new.waterlogged)
                && new.position.as_dvec3().distance(target) <= LIQUID_TOLERANCE =>
        {
            Some(new.position)
        }
        _ => None,
    })
    .await
}

/// The block at `dest` changed to something `accept` agrees with.
pub async fn block_placed<F>(
    sub: &mut Subscription,
    dest: BlockPos,
    timeout: Duration,
    mut accept: F,
) -> bool
where
    F: FnMut(&Block) -> bool,
{
    sub.next_matching(timeout, |event| match event {
        WorldEvent::BlockUpdate { new, .. } if new.position == dest && accept(new) => Some(()),
        _ => None,
    })
    .await
    .is_some()
}

/// An entity named `name` spawned within `max_distance` of `near`.
pub async fn entity_spawned(
    sub: &mut Subscription,
    name: &str,
    near: DVec3,
    max_distance: f64,
    timeout: Duration,
) -> Option<Entity> {
    sub.next_matching(timeout, |event| match event {
        WorldEvent::EntitySpawn { entity }
            if entity.name == name && entity.position.distance(near) <= max_distance =>
        {
            Some(entity.clone())
        }
        _ => None,
    })
    .await
}

/// The agent mounted `entity_id`.
pub async fn mounted(sub: &mut Subscription, entity_id: EntityId, timeout: Duration) -> bool {
    sub.next_matching(timeout, |event| match event {
        WorldEvent::Mount { entity_id: id } if *id == entity_id => Some(()),
        _ => None,
    })
    .await
    .is_some()
}
