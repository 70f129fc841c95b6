use sense_core::{EntityId, WorldEvent};

/// Entity status code sent when an entity is set on fire.
pub const STATUS_ON_FIRE: i8 = 37;

/// Bit of the metadata flags byte (index 0) marking an entity as burning.
pub const FLAG_ON_FIRE: u8 = 0x01;

/// Decode an ignition signal from a world event: `(entity, ignited)`.
/// Returns `None` for events that say nothing about combustion.
pub fn ignition_signal(event: &WorldEvent) -> Option<(EntityId, bool)> {
    match event {
        WorldEvent::EntityStatus { entity_id, status } => {
            Some((*entity_id, *status == STATUS_ON_FIRE))
        }
        WorldEvent::EntityFlags { entity_id, flags } => {
            Some((*entity_id, flags & FLAG_ON_FIRE != 0))
        }
        _ => None,
    }
}
