//! Landing-surface search.
//!
//! Given the agent's (optionally predicted) horizontal footprint, scan every
//! block column under it for the first solid surface and pick the nearest one.

use sense_core::{Aabb, AgentSnapshot, Block, DVec3, WorldQuery};
use tracing::trace;

use crate::predict::MovementPredictor;

/// Footprint width used for the column scan. Narrower than a block so that
/// brushing an adjacent column does not pull it into the search.
pub const SEARCH_WIDTH: f64 = 0.599;

pub struct PlacementSearch<'w> {
    world: &'w dyn WorldQuery,
    width: f64,
}

impl<'w> PlacementSearch<'w> {
    pub fn new(world: &'w dyn WorldQuery) -> Self {
        Self {
            world,
            width: SEARCH_WIDTH,
        }
    }

    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Best surface under the agent's current position.
    pub fn find(&self, current: &AgentSnapshot) -> Option<Block> {
        self.find_from(current.position, current)
    }

    /// Best surface under where the agent will be after `ticks` predictor steps.
    /// The scan still starts at the agent's current height and candidates must
    /// lie below its current feet.
    pub fn find_predicted(
        &self,
        current: &AgentSnapshot,
        predictor: &dyn MovementPredictor,
        ticks: u32,
    ) -> Option<Block> {
        let mut predicted = current.clone();
        predictor.predict(&mut predicted, ticks);
        self.find_from(predicted.position, current)
    }

    fn find_from(&self, footprint: DVec3, current: &AgentSnapshot) -> Option<Block> {
        let aabb = Aabb::for_entity(footprint, self.width, current.height);
        let (x0, x1) = (aabb.min.x.floor() as i32, aabb.max.x.floor() as i32);
        let (z0, z1) = (aabb.min.z.floor() as i32, aabb.max.z.floor() as i32);
        let top = current.position.y.floor() as i32;
        let bottom = self.world.min_height();
        let lower_bound = current.aabb().min.y;

        let mut candidates: Vec<Block> = Vec::new();
        for x in x0..=x1 {
            for z in z0..=z1 {
                if let Some(block) = self.column_surface(x, z, top, bottom) {
                    if (block.position.y as f64) < lower_bound {
                        candidates.push(block);
                    }
                }
            }
        }

        let max_y = candidates.iter().map(|b| b.position.y).max()?;
        candidates.retain(|b| b.position.y == max_y);

        let origin = current.position;
        let best = candidates.into_iter().min_by(|a, b| {
            a.aabb()
                .distance_to(origin)
                .total_cmp(&b.aabb().distance_to(origin))
                .then(a.position.x.cmp(&b.position.x))
                .then(a.position.z.cmp(&b.position.z))
        });
        trace!(surface = ?best.as_ref().map(|b| b.position), "landing surface search");
        best
    }

    /// First landing surface in column (x, z), scanning down from `top`.
    fn column_surface(&self, x: i32, z: i32, top: i32, bottom: i32) -> Option<Block> {
        (bottom..=top)
            .rev()
            .filter_map(|y| self.world.block_at(sense_core::IVec3::new(x, y, z)))
            .find(Block::is_landing_surface)
    }
}
