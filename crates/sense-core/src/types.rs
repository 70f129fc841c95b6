use glam::{DVec3, IVec3};
use serde::{Deserialize, Serialize};

/// Integer lattice position of a block.
pub type BlockPos = IVec3;

/// Identifier of an entity in the world.
pub type EntityId = i32;

/// Distance from the agent's feet to its eyes.
pub const EYE_HEIGHT: f64 = 1.62;

/// Default agent collision box.
pub const AGENT_WIDTH: f64 = 0.6;
pub const AGENT_HEIGHT: f64 = 1.8;

/// Which hand an item is held in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hand {
    #[default]
    Main,
    Off,
}

impl Hand {
    pub fn from_offhand(use_offhand: bool) -> Self {
        if use_offhand { Hand::Off } else { Hand::Main }
    }
}

impl std::fmt::Display for Hand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Hand::Main => write!(f, "main hand"),
            Hand::Off => write!(f, "off hand"),
        }
    }
}

// ── Geometry ───────────────────────────────────────────────────

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: DVec3,
    pub max: DVec3,
}

impl Aabb {
    pub fn new(min: DVec3, max: DVec3) -> Self {
        Self { min, max }
    }

    /// Box of an entity standing with its feet centred on `position`.
    pub fn for_entity(position: DVec3, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self {
            min: DVec3::new(position.x - half, position.y, position.z - half),
            max: DVec3::new(position.x + half, position.y + height, position.z + half),
        }
    }

    /// Full unit cube occupied by the block at `pos`.
    pub fn for_block(pos: BlockPos) -> Self {
        let min = pos.as_dvec3();
        Self {
            min,
            max: min + DVec3::ONE,
        }
    }

    /// Strict overlap test; boxes that only touch do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Euclidean distance from `point` to the nearest point of the box (0 inside).
    pub fn distance_to(&self, point: DVec3) -> f64 {
        point.clamp(self.min, self.max).distance(point)
    }

    pub fn offset(&self, by: DVec3) -> Self {
        Self {
            min: self.min + by,
            max: self.max + by,
        }
    }
}

// ── Blocks ─────────────────────────────────────────────────────

/// Read-only snapshot of a block at query time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub position: BlockPos,
    pub type_id: u32,
    /// Registry name, e.g. "stone", "water", "slime_block".
    pub name: String,
    /// Block state metadata. For liquids, 0 is a source block.
    #[serde(default)]
    pub metadata: u8,
    #[serde(default)]
    pub transparent: bool,
    #[serde(default = "default_true")]
    pub diggable: bool,
    #[serde(default)]
    pub waterlogged: bool,
}

impl Block {
    pub fn is_air(&self) -> bool {
        matches!(self.name.as_str(), "air" | "cave_air" | "void_air")
    }

    pub fn is_water(&self) -> bool {
        self.name == "water"
    }

    pub fn is_water_source(&self) -> bool {
        self.is_water() && self.metadata == 0
    }

    /// Water that a bucket can pick back up.
    pub fn holds_water(&self) -> bool {
        self.is_water_source() || self.waterlogged
    }

    pub fn causes_fire(&self) -> bool {
        matches!(self.name.as_str(), "fire" | "soul_fire" | "lava")
    }

    /// Whether a falling agent would come to rest on this block.
    pub fn is_landing_surface(&self) -> bool {
        !self.is_air() && !self.is_water() && !self.transparent
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::for_block(self.position)
    }

    pub fn center(&self) -> DVec3 {
        self.position.as_dvec3() + DVec3::splat(0.5)
    }
}

fn default_true() -> bool {
    true
}

// ── Items & entities ───────────────────────────────────────────

/// An inventory stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub slot: u16,
    pub name: String,
    pub count: u32,
    /// Maximum stack size; 1 for tools, buckets, and boats.
    pub stack_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub position: DVec3,
    pub width: f64,
    pub height: f64,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        Aabb::for_entity(self.position, self.width, self.height)
    }
}

// ── Agent ──────────────────────────────────────────────────────

/// Slots of the items currently in each hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldSlots {
    pub main: Option<u16>,
    pub off: Option<u16>,
}

/// The agent's physical state at the instant of query. Never cached past one
/// decision cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    pub entity_id: EntityId,
    /// Feet position.
    pub position: DVec3,
    pub velocity: DVec3,
    pub width: f64,
    pub height: f64,
    pub on_ground: bool,
    pub in_water: bool,
    /// Distance fallen since last on ground.
    pub fall_distance: f64,
    /// World / dimension identifier, e.g. "overworld", "the_nether".
    pub dimension: String,
    /// Every stack the agent carries, including the held ones.
    pub inventory: Vec<Item>,
    pub held: HeldSlots,
}

impl AgentSnapshot {
    pub fn eye_position(&self) -> DVec3 {
        self.position + DVec3::new(0.0, EYE_HEIGHT, 0.0)
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::for_entity(self.position, self.width, self.height)
    }

    pub fn held(&self, hand: Hand) -> Option<&Item> {
        let slot = match hand {
            Hand::Main => self.held.main,
            Hand::Off => self.held.off,
        }?;
        self.inventory.iter().find(|item| item.slot == slot)
    }

    /// Inventory stacks other than the one held in `hand`.
    pub fn items_except_held(&self, hand: Hand) -> impl Iterator<Item = &Item> {
        let held = self.held(hand).map(|item| item.slot);
        self.inventory
            .iter()
            .filter(move |item| Some(item.slot) != held)
    }
}
