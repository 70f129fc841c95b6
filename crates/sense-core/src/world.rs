use async_trait::async_trait;
use glam::{DVec3, IVec3};

use crate::types::{AgentSnapshot, Block, BlockPos, Entity, Hand, Item};

/// Spatial queries against the host's world model.
pub trait WorldQuery: Send + Sync {
    /// The block occupying `pos`, or `None` if the chunk is not loaded.
    fn block_at(&self, pos: BlockPos) -> Option<Block>;

    /// Lowest buildable height of the current dimension.
    fn min_height(&self) -> i32;

    /// Positions of blocks within `max_distance` of `origin` matching the
    /// predicate, nearest first.
    fn find_blocks(
        &self,
        origin: DVec3,
        max_distance: f64,
        matching: &dyn Fn(&Block) -> bool,
    ) -> Vec<BlockPos>;

    /// The nearest block matching the predicate.
    fn find_block(
        &self,
        origin: DVec3,
        max_distance: f64,
        matching: &dyn Fn(&Block) -> bool,
    ) -> Option<Block> {
        self.find_blocks(origin, max_distance, matching)
            .into_iter()
            .find_map(|pos| self.block_at(pos))
    }

    /// Entities currently tracked by the host.
    fn entities(&self) -> Vec<Entity>;
}

/// Access to the controlled agent's physical state.
pub trait AgentState: Send + Sync {
    /// Fails with `SenseError::Disconnected` once the agent is gone.
    fn snapshot(&self) -> crate::Result<AgentSnapshot>;
}

/// World-mutating calls the controller issues on behalf of the agent.
#[async_trait]
pub trait AgentControl: Send + Sync {
    /// Turn to face `point`. `force` skips smoothing and applies the rotation this tick.
    async fn look_at(&self, point: DVec3, force: bool) -> crate::Result<()>;

    async fn equip(&self, item: &Item, hand: Hand) -> crate::Result<()>;

    async fn unequip(&self, hand: Hand) -> crate::Result<()>;

    /// Use the item held in `hand` against whatever the agent is looking at.
    async fn activate_item(&self, hand: Hand) -> crate::Result<()>;

    /// Place the held block against `face` of `reference`. Returns the destination cell.
    async fn place_block(
        &self,
        reference: &Block,
        face: IVec3,
        hand: Hand,
    ) -> crate::Result<BlockPos>;

    /// Place the held item as an entity (boat, armor stand, ...) against `face` of
    /// `reference`. The spawn itself is observed through `WorldEvent::EntitySpawn`.
    async fn place_entity(&self, reference: &Block, face: IVec3, hand: Hand)
    -> crate::Result<()>;

    async fn mount(&self, entity: &Entity) -> crate::Result<()>;

    async fn dismount(&self) -> crate::Result<()>;

    async fn dig(&self, block: &Block, force: bool) -> crate::Result<()>;
}

/// Everything the controller needs from a host, in one object.
pub trait Bot: WorldQuery + AgentState + AgentControl {}

impl<T: WorldQuery + AgentState + AgentControl + ?Sized> Bot for T {}
