use sense_core::{Block, BlockPos};

/// (name, type id, transparent, diggable)
const REGISTRY: &[(&str, u32, bool, bool)] = &[
    ("air", 0, true, false),
    ("stone", 1, false, true),
    ("grass_block", 2, false, true),
    ("dirt", 3, false, true),
    ("bedrock", 7, false, false),
    ("water", 8, true, false),
    ("lava", 10, true, false),
    ("glass", 20, true, true),
    ("cobweb", 30, true, true),
    ("fire", 51, true, true),
    ("netherrack", 87, false, true),
    ("slime_block", 165, false, true),
    ("hay_block", 170, false, true),
];

/// Build a block snapshot for `name` using the simulator's registry.
/// Unknown names are treated as opaque, diggable solids.
pub fn sim_block(position: BlockPos, name: &str) -> Block {
    let (type_id, transparent, diggable) = REGISTRY
        .iter()
        .find(|(n, ..)| *n == name)
        .map(|(_, id, t, d)| (*id, *t, *d))
        .unwrap_or((1000, false, true));
    Block {
        position,
        type_id,
        name: name.to_string(),
        metadata: 0,
        transparent,
        diggable,
        waterlogged: false,
    }
}
