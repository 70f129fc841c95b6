use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use sense_core::{
    AGENT_HEIGHT, AGENT_WIDTH, AgentControl, AgentSnapshot, AgentState, Block, BlockPos,
    DVec3, Entity, EntityId, EventBus, Hand, HeldSlots, IVec3, Item, Result, SenseError,
    WorldEvent, WorldQuery,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::blocks::sim_block;

/// Wall-clock length of one simulated tick.
pub const TICK_PERIOD: Duration = Duration::from_millis(50);

const GRAVITY: f64 = 0.08;
const VERTICAL_DRAG: f64 = 0.98;
const HORIZONTAL_DRAG: f64 = 0.91;
const WATER_SINK: f64 = -0.05;
const INTERACT_RANGE: f64 = 6.0;
const BOAT_WIDTH: f64 = 1.375;
const BOAT_HEIGHT: f64 = 0.5625;

/// A world call the simulator received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimAction {
    LookAt(DVec3),
    Equip { item: String, hand: Hand },
    Unequip(Hand),
    Activate(Hand),
    PlaceBlock { position: BlockPos, name: String },
    PlaceEntity { name: String },
    Mount(EntityId),
    Dismount,
    Dig(BlockPos),
}

/// The agent hitting something while falling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Impact {
    pub surface: String,
    pub fall_distance: f64,
}

impl Impact {
    /// Whether vanilla rules would deal fall damage for this impact.
    pub fn is_damaging(&self) -> bool {
        match self.surface.as_str() {
            "water" | "slime_block" => false,
            "hay_block" => self.fall_distance * 0.2 > 3.0,
            _ => self.fall_distance > 3.0,
        }
    }
}

struct Agent {
    id: EntityId,
    position: DVec3,
    velocity: DVec3,
    on_ground: bool,
    in_water: bool,
    fall_distance: f64,
    dimension: String,
    inventory: Vec<Item>,
    held: HeldSlots,
    on_fire: bool,
    mounted: Option<EntityId>,
    alive: bool,
}

struct SimState {
    blocks: HashMap<BlockPos, Block>,
    min_height: i32,
    agent: Agent,
    entities: Vec<Entity>,
    next_entity_id: EntityId,
    tick: u64,
    look_target: Option<DVec3>,
    actions: Vec<SimAction>,
    impacts: Vec<Impact>,
    emit_block_updates: bool,
    disconnected: bool,
}

/// Cloneable handle to a simulated world and its agent.
#[derive(Clone)]
pub struct SimWorld {
    state: Arc<Mutex<SimState>>,
    bus: EventBus,
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SimWorld {
    /// An empty overworld with the agent floating at (0.5, 64, 0.5).
    pub fn new() -> Self {
        let state = SimState {
            blocks: HashMap::new(),
            min_height: 0,
            agent: Agent {
                id: 1,
                position: DVec3::new(0.5, 64.0, 0.5),
                velocity: DVec3::ZERO,
                on_ground: false,
                in_water: false,
                fall_distance: 0.0,
                dimension: "overworld".into(),
                inventory: Vec::new(),
                held: HeldSlots::default(),
                on_fire: false,
                mounted: None,
                alive: true,
            },
            entities: Vec::new(),
            next_entity_id: 100,
            tick: 0,
            look_target: None,
            actions: Vec::new(),
            impacts: Vec::new(),
            emit_block_updates: true,
            disconnected: false,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            bus: EventBus::default(),
        }
    }

    // ── Builders ───────────────────────────────────────────────

    pub fn with_agent_at(self, position: DVec3) -> Self {
        self.state.lock().agent.position = position;
        self
    }

    pub fn with_velocity(self, velocity: DVec3) -> Self {
        self.state.lock().agent.velocity = velocity;
        self
    }

    pub fn with_fall_distance(self, distance: f64) -> Self {
        self.state.lock().agent.fall_distance = distance;
        self
    }

    pub fn standing(self) -> Self {
        {
            let mut s = self.state.lock();
            s.agent.on_ground = true;
            s.agent.velocity = DVec3::ZERO;
        }
        self
    }

    pub fn with_dimension(self, dimension: &str) -> Self {
        self.state.lock().agent.dimension = dimension.to_string();
        self
    }

    pub fn with_min_height(self, min_height: i32) -> Self {
        self.state.lock().min_height = min_height;
        self
    }

    pub fn with_block(self, position: BlockPos, name: &str) -> Self {
        self.set_block(position, name);
        self
    }

    /// Square floor of `name` at height `y`, `radius` blocks around the origin column.
    pub fn with_floor(self, y: i32, radius: i32, name: &str) -> Self {
        for x in -radius..=radius {
            for z in -radius..=radius {
                self.set_block(IVec3::new(x, y, z), name);
            }
        }
        self
    }

    pub fn with_item(self, name: &str, count: u32, stack_size: u32) -> Self {
        {
            let mut s = self.state.lock();
            let slot = 36 + s.agent.inventory.len() as u16;
            s.agent.inventory.push(Item {
                slot,
                name: name.to_string(),
                count,
                stack_size,
            });
        }
        self
    }

    /// Hold the first stack named `name`.
    pub fn with_held(self, name: &str, hand: Hand) -> Self {
        {
            let mut s = self.state.lock();
            let slot = s
                .agent
                .inventory
                .iter()
                .find(|item| item.name == name)
                .map(|item| item.slot);
            match hand {
                Hand::Main => s.agent.held.main = slot,
                Hand::Off => s.agent.held.off = slot,
            }
        }
        self
    }

    // ── Inspection & control ───────────────────────────────────

    pub fn bus(&self) -> EventBus {
        self.bus.clone()
    }

    pub fn agent_id(&self) -> EntityId {
        self.state.lock().agent.id
    }

    pub fn set_block(&self, position: BlockPos, name: &str) {
        let mut s = self.state.lock();
        if name == "air" {
            s.blocks.remove(&position);
        } else {
            s.blocks.insert(position, sim_block(position, name));
        }
    }

    pub fn block(&self, position: BlockPos) -> Option<Block> {
        self.state.lock().block_at(position)
    }

    pub fn spawn_entity(&self, name: &str, position: DVec3) -> EntityId {
        let entity = {
            let mut s = self.state.lock();
            s.spawn(name, position)
        };
        let id = entity.id;
        self.bus.publish(WorldEvent::EntitySpawn { entity });
        id
    }

    /// Set the agent on fire and announce it with entity status 37.
    pub fn ignite(&self) {
        let id = {
            let mut s = self.state.lock();
            s.agent.on_fire = true;
            s.agent.id
        };
        self.bus.publish(WorldEvent::EntityStatus {
            entity_id: id,
            status: 37,
        });
    }

    pub fn is_on_fire(&self) -> bool {
        self.state.lock().agent.on_fire
    }

    /// When disabled, block changes still happen but are not announced.
    pub fn set_block_updates(&self, enabled: bool) {
        self.state.lock().emit_block_updates = enabled;
    }

    pub fn disconnect(&self) {
        self.state.lock().disconnected = true;
        self.bus.publish(WorldEvent::Disconnected);
    }

    pub fn kill(&self) {
        self.state.lock().agent.alive = false;
        self.bus.publish(WorldEvent::Death);
    }

    pub fn actions(&self) -> Vec<SimAction> {
        self.state.lock().actions.clone()
    }

    pub fn impacts(&self) -> Vec<Impact> {
        self.state.lock().impacts.clone()
    }

    pub fn mounted(&self) -> Option<EntityId> {
        self.state.lock().agent.mounted
    }

    pub fn held_item_name(&self, hand: Hand) -> Option<String> {
        let s = self.state.lock();
        s.held_item(hand).map(|item| item.name.clone())
    }

    pub fn position(&self) -> DVec3 {
        self.state.lock().agent.position
    }

    pub fn tick(&self) -> u64 {
        self.state.lock().tick
    }

    /// Advance one tick and publish its events. Returns false once disconnected.
    pub fn step(&self) -> bool {
        let events = {
            let mut s = self.state.lock();
            if s.disconnected {
                return false;
            }
            s.tick += 1;
            let mut events = Vec::new();
            if s.agent.alive {
                let was_on_fire = s.agent.on_fire;
                s.step_agent();
                if was_on_fire && !s.agent.on_fire {
                    events.push(WorldEvent::EntityFlags {
                        entity_id: s.agent.id,
                        flags: 0,
                    });
                }
                events.push(WorldEvent::Move {
                    position: s.agent.position,
                });
            }
            events.push(WorldEvent::Tick { tick: s.tick });
            events
        };
        for event in events {
            self.bus.publish(event);
        }
        true
    }

    /// Step the world every [`TICK_PERIOD`] until disconnected.
    pub fn spawn_ticker(&self) -> JoinHandle<()> {
        let world = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(TICK_PERIOD).await;
                if !world.step() {
                    break;
                }
            }
        })
    }

    /// Run a world call against the locked state and publish what it produced.
    fn call<T>(&self, f: impl FnOnce(&mut SimState) -> Result<(T, Vec<WorldEvent>)>) -> Result<T> {
        let (value, events) = {
            let mut s = self.state.lock();
            if s.disconnected {
                return Err(SenseError::Disconnected);
            }
            let (value, mut events) = f(&mut *s)?;
            if !s.emit_block_updates {
                events.retain(|e| !matches!(e, WorldEvent::BlockUpdate { .. }));
            }
            (value, events)
        };
        for event in events {
            self.bus.publish(event);
        }
        Ok(value)
    }
}

impl SimState {
    fn block_at(&self, position: BlockPos) -> Option<Block> {
        if position.y < self.min_height {
            return None;
        }
        Some(
            self.blocks
                .get(&position)
                .cloned()
                .unwrap_or_else(|| sim_block(position, "air")),
        )
    }

    fn held_item(&self, hand: Hand) -> Option<&Item> {
        let slot = match hand {
            Hand::Main => self.agent.held.main,
            Hand::Off => self.agent.held.off,
        }?;
        self.agent.inventory.iter().find(|item| item.slot == slot)
    }

    fn held_item_mut(&mut self, hand: Hand) -> Option<&mut Item> {
        let slot = match hand {
            Hand::Main => self.agent.held.main,
            Hand::Off => self.agent.held.off,
        }?;
        self.agent.inventory.iter_mut().find(|item| item.slot == slot)
    }

    fn spawn(&mut self, name: &str, position: DVec3) -> Entity {
        let (width, height) = if name == "boat" {
            (BOAT_WIDTH, BOAT_HEIGHT)
        } else {
            (0.9, 0.9)
        };
        let entity = Entity {
            id: self.next_entity_id,
            name: name.to_string(),
            position,
            width,
            height,
        };
        self.next_entity_id += 1;
        self.entities.push(entity.clone());
        entity
    }

    fn set(&mut self, position: BlockPos, name: &str) -> WorldEvent {
        let old = self.block_at(position);
        let new = sim_block(position, name);
        if name == "air" {
            self.blocks.remove(&position);
        } else {
            self.blocks.insert(position, new.clone());
        }
        WorldEvent::BlockUpdate { old, new }
    }

    fn has_water(&self, position: BlockPos) -> bool {
        self.block_at(position)
            .map(|b| b.is_water() || b.waterlogged)
            .unwrap_or(false)
    }

    fn eye(&self) -> DVec3 {
        self.agent.position + DVec3::new(0.0, sense_core::EYE_HEIGHT, 0.0)
    }

    fn step_agent(&mut self) {
        if let Some(id) = self.agent.mounted {
            if let Some(vehicle) = self.entities.iter().find(|e| e.id == id) {
                self.agent.position = vehicle.position;
            }
            self.agent.velocity = DVec3::ZERO;
            self.agent.fall_distance = 0.0;
            self.agent.on_ground = true;
            return;
        }

        if self.agent.on_ground {
            let below = (self.agent.position - DVec3::new(0.0, 0.01, 0.0))
                .floor()
                .as_ivec3();
            let supported = self
                .block_at(below)
                .map(|b| b.is_landing_surface())
                .unwrap_or(false);
            if supported {
                self.agent.velocity.y = 0.0;
                self.finish_step();
                return;
            }
            self.agent.on_ground = false;
        }

        let old = self.agent.position;
        let vy = self.agent.velocity.y;
        let mut new = old + self.agent.velocity;
        let (cx, cz) = (new.x.floor() as i32, new.z.floor() as i32);

        let mut landed: Option<String> = None;
        let mut entered_water = false;
        if vy < 0.0 {
            let from = old.y.floor() as i32;
            let to = new.y.floor() as i32;
            for cy in (to..=from).rev() {
                let Some(block) = self.block_at(IVec3::new(cx, cy, cz)) else {
                    continue;
                };
                if block.is_water() || block.waterlogged {
                    entered_water = !self.agent.in_water;
                    new.y = new.y.max(cy as f64);
                    break;
                }
                if block.is_landing_surface() && (cy + 1) as f64 > new.y {
                    new.y = (cy + 1) as f64;
                    landed = Some(block.name.clone());
                    break;
                }
            }
        }

        let fallen = (old.y - new.y).max(0.0);
        self.agent.position = new;

        if let Some(surface) = landed {
            let fall_distance = self.agent.fall_distance + fallen;
            trace!(%surface, fall_distance, "agent landed");
            self.impacts.push(Impact {
                surface,
                fall_distance,
            });
            self.agent.fall_distance = 0.0;
            self.agent.velocity = DVec3::ZERO;
            self.agent.on_ground = true;
        } else if entered_water {
            self.impacts.push(Impact {
                surface: "water".into(),
                fall_distance: self.agent.fall_distance + fallen,
            });
            self.agent.fall_distance = 0.0;
            self.agent.velocity.y = WATER_SINK;
        } else if self.agent.in_water {
            self.agent.fall_distance = 0.0;
            self.agent.velocity.y = WATER_SINK;
        } else {
            self.agent.fall_distance += fallen;
            self.agent.velocity.y = (vy - GRAVITY) * VERTICAL_DRAG;
            self.agent.velocity.x *= HORIZONTAL_DRAG;
            self.agent.velocity.z *= HORIZONTAL_DRAG;
        }
        self.finish_step();
    }

    fn finish_step(&mut self) {
        let feet = self.agent.position.floor().as_ivec3();
        self.agent.in_water = self.has_water(feet);
        if self.agent.in_water {
            self.agent.on_fire = false;
        }
    }

    fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot {
            entity_id: self.agent.id,
            position: self.agent.position,
            velocity: self.agent.velocity,
            width: AGENT_WIDTH,
            height: AGENT_HEIGHT,
            on_ground: self.agent.on_ground,
            in_water: self.agent.in_water,
            fall_distance: self.agent.fall_distance,
            dimension: self.agent.dimension.clone(),
            inventory: self.agent.inventory.clone(),
            held: self.agent.held,
        }
    }

    fn look_cell(&self, action: &str) -> Result<BlockPos> {
        let target = self
            .look_target
            .ok_or_else(|| SenseError::world_call(action, "not looking at anything"))?;
        if target.distance(self.eye()) > INTERACT_RANGE {
            return Err(SenseError::world_call(action, "target out of reach"));
        }
        Ok(target.floor().as_ivec3())
    }

    fn activate(&mut self, hand: Hand) -> Result<((), Vec<WorldEvent>)> {
        let held = self.held_item(hand).map(|item| item.name.clone());
        match held.as_deref() {
            Some("water_bucket") => {
                let cell = self.look_cell("activate_item")?;
                let solid = self
                    .block_at(cell)
                    .map(|b| b.is_landing_surface())
                    .unwrap_or(false);
                let dest = if solid { cell + IVec3::Y } else { cell };
                let replaceable = self
                    .block_at(dest)
                    .map(|b| b.is_air() || b.name == "fire")
                    .unwrap_or(false);
                if !replaceable {
                    return Err(SenseError::world_call("activate_item", "cannot pour here"));
                }
                let mut events = Vec::new();
                if self.agent.dimension != "the_nether" {
                    events.push(self.set(dest, "water"));
                }
                if let Some(item) = self.held_item_mut(hand) {
                    item.name = "bucket".into();
                }
                Ok(((), events))
            }
            Some("bucket") => {
                let cell = self.look_cell("activate_item")?;
                let source = [cell, cell + IVec3::Y].into_iter().find(|pos| {
                    self.block_at(*pos)
                        .map(|b| b.holds_water())
                        .unwrap_or(false)
                });
                let Some(source) = source else {
                    return Ok(((), Vec::new()));
                };
                let event = self.set(source, "air");
                if let Some(item) = self.held_item_mut(hand) {
                    item.name = "water_bucket".into();
                }
                Ok(((), vec![event]))
            }
            _ => Ok(((), Vec::new())),
        }
    }

    fn place_block(
        &mut self,
        reference: &Block,
        face: IVec3,
        hand: Hand,
    ) -> Result<(BlockPos, Vec<WorldEvent>)> {
        let item = self
            .held_item(hand)
            .cloned()
            .ok_or_else(|| SenseError::NotHolding("a block".into()))?;
        if item.stack_size <= 1 {
            return Err(SenseError::world_call("place_block", format!("{} is not a block", item.name)));
        }
        if reference.center().distance(self.eye()) > INTERACT_RANGE {
            return Err(SenseError::world_call("place_block", "reference out of reach"));
        }
        let dest = reference.position + face;
        let free = self
            .block_at(dest)
            .map(|b| b.is_air() || b.is_water() || b.name == "fire")
            .unwrap_or(false);
        if !free {
            return Err(SenseError::world_call("place_block", "destination occupied"));
        }
        let event = self.set(dest, &item.name);
        self.consume_held(hand);
        Ok((dest, vec![event]))
    }

    fn place_entity(
        &mut self,
        reference: &Block,
        face: IVec3,
        hand: Hand,
    ) -> Result<((), Vec<WorldEvent>)> {
        let item = self
            .held_item(hand)
            .cloned()
            .ok_or_else(|| SenseError::NotHolding("a vehicle".into()))?;
        if !item.name.ends_with("boat") {
            return Err(SenseError::world_call("place_entity", format!("{} spawns nothing", item.name)));
        }
        let dest = reference.position + face;
        let at = dest.as_dvec3() + DVec3::new(0.5, 0.0, 0.5);
        let entity = self.spawn("boat", at);
        self.consume_held(hand);
        Ok(((), vec![WorldEvent::EntitySpawn { entity }]))
    }

    fn consume_held(&mut self, hand: Hand) {
        let Some(item) = self.held_item_mut(hand) else {
            return;
        };
        item.count = item.count.saturating_sub(1);
        if item.count == 0 {
            let slot = item.slot;
            self.agent.inventory.retain(|i| i.slot != slot);
            match hand {
                Hand::Main => self.agent.held.main = None,
                Hand::Off => self.agent.held.off = None,
            }
        }
    }

    fn mount(&mut self, entity: &Entity) -> Result<((), Vec<WorldEvent>)> {
        let vehicle = self
            .entities
            .iter()
            .find(|e| e.id == entity.id)
            .cloned()
            .ok_or_else(|| SenseError::world_call("mount", "no such entity"))?;
        if vehicle.aabb().distance_to(self.eye()) > INTERACT_RANGE {
            return Err(SenseError::world_call("mount", "vehicle out of reach"));
        }
        if self.held_item(Hand::Main).is_some() && vehicle.name != "boat" {
            return Err(SenseError::world_call("mount", "hand must be empty"));
        }
        self.agent.mounted = Some(vehicle.id);
        self.agent.position = vehicle.position;
        self.agent.velocity = DVec3::ZERO;
        self.agent.fall_distance = 0.0;
        self.agent.on_ground = true;
        Ok((
            (),
            vec![WorldEvent::Mount {
                entity_id: vehicle.id,
            }],
        ))
    }

    fn dismount(&mut self) -> Result<((), Vec<WorldEvent>)> {
        let Some(id) = self.agent.mounted.take() else {
            return Err(SenseError::world_call("dismount", "not mounted"));
        };
        if let Some(vehicle) = self.entities.iter().find(|e| e.id == id) {
            self.agent.position = vehicle.position + DVec3::new(0.0, vehicle.height, 0.0);
        }
        self.agent.on_ground = false;
        Ok(((), vec![WorldEvent::Dismount]))
    }
}

// ── World traits ───────────────────────────────────────────────

impl WorldQuery for SimWorld {
    fn block_at(&self, pos: BlockPos) -> Option<Block> {
        self.state.lock().block_at(pos)
    }

    fn min_height(&self) -> i32 {
        self.state.lock().min_height
    }

    fn find_blocks(
        &self,
        origin: DVec3,
        max_distance: f64,
        matching: &dyn Fn(&Block) -> bool,
    ) -> Vec<BlockPos> {
        let s = self.state.lock();
        let mut found: Vec<(f64, BlockPos)> = s
            .blocks
            .values()
            .filter(|b| matching(*b))
            .map(|b| (b.center().distance(origin), b.position))
            .filter(|(d, _)| *d <= max_distance)
            .collect();
        found.sort_by(|a, b| {
            a.0.total_cmp(&b.0)
                .then(a.1.x.cmp(&b.1.x))
                .then(a.1.y.cmp(&b.1.y))
                .then(a.1.z.cmp(&b.1.z))
        });
        found.into_iter().map(|(_, pos)| pos).collect()
    }

    fn entities(&self) -> Vec<Entity> {
        self.state.lock().entities.clone()
    }
}

impl AgentState for SimWorld {
    fn snapshot(&self) -> Result<AgentSnapshot> {
        let s = self.state.lock();
        if s.disconnected || !s.agent.alive {
            return Err(SenseError::Disconnected);
        }
        Ok(s.snapshot())
    }
}

#[async_trait]
impl AgentControl for SimWorld {
    async fn look_at(&self, point: DVec3, _force: bool) -> Result<()> {
        self.call(|s| {
            s.look_target = Some(point);
            s.actions.push(SimAction::LookAt(point));
            Ok(((), Vec::new()))
        })
    }

    async fn equip(&self, item: &Item, hand: Hand) -> Result<()> {
        self.call(|s| {
            if !s.agent.inventory.iter().any(|i| i.slot == item.slot) {
                return Err(SenseError::ItemNotFound(item.name.clone()));
            }
            match hand {
                Hand::Main => {
                    s.agent.held.main = Some(item.slot);
                    if s.agent.held.off == Some(item.slot) {
                        s.agent.held.off = None;
                    }
                }
                Hand::Off => {
                    s.agent.held.off = Some(item.slot);
                    if s.agent.held.main == Some(item.slot) {
                        s.agent.held.main = None;
                    }
                }
            }
            s.actions.push(SimAction::Equip {
                item: item.name.clone(),
                hand,
            });
            Ok(((), Vec::new()))
        })
    }

    async fn unequip(&self, hand: Hand) -> Result<()> {
        self.call(|s| {
            match hand {
                Hand::Main => s.agent.held.main = None,
                Hand::Off => s.agent.held.off = None,
            }
            s.actions.push(SimAction::Unequip(hand));
            Ok(((), Vec::new()))
        })
    }

    async fn activate_item(&self, hand: Hand) -> Result<()> {
        self.call(|s| {
            s.actions.push(SimAction::Activate(hand));
            s.activate(hand)
        })
    }

    async fn place_block(&self, reference: &Block, face: IVec3, hand: Hand) -> Result<BlockPos> {
        self.call(|s| {
            let (dest, events) = s.place_block(reference, face, hand)?;
            let name = s
                .block_at(dest)
                .map(|b| b.name)
                .unwrap_or_default();
            s.actions.push(SimAction::PlaceBlock {
                position: dest,
                name,
            });
            Ok((dest, events))
        })
    }

    async fn place_entity(&self, reference: &Block, face: IVec3, hand: Hand) -> Result<()> {
        self.call(|s| {
            let name = s.held_item(hand).map(|i| i.name.clone()).unwrap_or_default();
            let out = s.place_entity(reference, face, hand)?;
            s.actions.push(SimAction::PlaceEntity { name });
            Ok(out)
        })
    }

    async fn mount(&self, entity: &Entity) -> Result<()> {
        self.call(|s| {
            let out = s.mount(entity)?;
            s.actions.push(SimAction::Mount(entity.id));
            Ok(out)
        })
    }

    async fn dismount(&self) -> Result<()> {
        self.call(|s| {
            let out = s.dismount()?;
            s.actions.push(SimAction::Dismount);
            Ok(out)
        })
    }

    async fn dig(&self, block: &Block, _force: bool) -> Result<()> {
        self.call(|s| {
            let current = s
                .block_at(block.position)
                .ok_or_else(|| SenseError::NoBlock(format!("{}", block.position)))?;
            if !current.diggable {
                return Err(SenseError::world_call("dig", format!("{} is not diggable", current.name)));
            }
            let event = s.set(block.position, "air");
            s.actions.push(SimAction::Dig(block.position));
            Ok(((), vec![event]))
        })
    }
}
