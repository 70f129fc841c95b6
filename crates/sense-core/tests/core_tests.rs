#[cfg(test)]
mod tests {
    use sense_core::*;
    use std::time::Duration;

    fn block(x: i32, y: i32, z: i32, name: &str) -> Block {
        Block {
            position: IVec3::new(x, y, z),
            type_id: 1,
            name: name.to_string(),
            metadata: 0,
            transparent: false,
            diggable: true,
            waterlogged: false,
        }
    }

    // ── Geometry tests ─────────────────────────────────────────

    #[test]
    fn test_entity_aabb_is_feet_centred() {
        let aabb = Aabb::for_entity(DVec3::new(0.5, 64.0, 0.5), 0.6, 1.8);
        assert!((aabb.min.x - 0.2).abs() < 1e-9);
        assert!((aabb.max.x - 0.8).abs() < 1e-9);
        assert_eq!(aabb.min.y, 64.0);
        assert!((aabb.max.y - 65.8).abs() < 1e-9);
    }

    #[test]
    fn test_touching_boxes_do_not_intersect() {
        let below = Aabb::for_block(IVec3::new(0, 63, 0));
        let agent = Aabb::for_entity(DVec3::new(0.5, 64.0, 0.5), 0.6, 1.8);
        assert!(!agent.intersects(&below));
        let inside = Aabb::for_block(IVec3::new(0, 64, 0));
        assert!(agent.intersects(&inside));
    }

    #[test]
    fn test_distance_to_point() {
        let aabb = Aabb::for_block(IVec3::new(0, 0, 0));
        assert_eq!(aabb.distance_to(DVec3::new(0.5, 0.5, 0.5)), 0.0);
        assert!((aabb.distance_to(DVec3::new(0.5, 3.0, 0.5)) - 2.0).abs() < 1e-9);
    }

    // ── Block tests ────────────────────────────────────────────

    #[test]
    fn test_block_classification() {
        assert!(block(0, 0, 0, "air").is_air());
        assert!(block(0, 0, 0, "cave_air").is_air());
        assert!(block(0, 0, 0, "lava").causes_fire());
        assert!(block(0, 0, 0, "fire").causes_fire());
        assert!(!block(0, 0, 0, "stone").causes_fire());
        assert!(block(0, 0, 0, "stone").is_landing_surface());
        assert!(!block(0, 0, 0, "water").is_landing_surface());

        let mut glass = block(0, 0, 0, "glass");
        glass.transparent = true;
        assert!(!glass.is_landing_surface());
    }

    #[test]
    fn test_water_source_and_waterlogged() {
        let mut flowing = block(0, 0, 0, "water");
        flowing.metadata = 3;
        assert!(flowing.is_water());
        assert!(!flowing.holds_water());

        assert!(block(0, 0, 0, "water").holds_water());

        let mut slab = block(0, 0, 0, "oak_slab");
        slab.waterlogged = true;
        assert!(slab.holds_water());
    }

    // ── Snapshot tests ─────────────────────────────────────────

    #[test]
    fn test_snapshot_held_items() {
        let snapshot = AgentSnapshot {
            entity_id: 1,
            position: DVec3::new(0.5, 64.0, 0.5),
            velocity: DVec3::ZERO,
            width: AGENT_WIDTH,
            height: AGENT_HEIGHT,
            on_ground: true,
            in_water: false,
            fall_distance: 0.0,
            dimension: "overworld".into(),
            inventory: vec![
                Item { slot: 36, name: "water_bucket".into(), count: 1, stack_size: 1 },
                Item { slot: 37, name: "slime_block".into(), count: 8, stack_size: 64 },
            ],
            held: HeldSlots { main: Some(36), off: None },
        };
        assert_eq!(snapshot.held(Hand::Main).unwrap().name, "water_bucket");
        assert!(snapshot.held(Hand::Off).is_none());
        let others: Vec<_> = snapshot.items_except_held(Hand::Main).collect();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].name, "slime_block");
        assert!((snapshot.eye_position().y - 65.62).abs() < 1e-9);
    }

    #[test]
    fn test_hand_from_offhand() {
        assert_eq!(Hand::from_offhand(true), Hand::Off);
        assert_eq!(Hand::from_offhand(false), Hand::Main);
    }

    // ── Error tests ────────────────────────────────────────────

    #[test]
    fn test_error_display() {
        let err = SenseError::world_call("place_block", "cell occupied");
        assert!(err.to_string().contains("place_block"));
        assert!(err.to_string().contains("cell occupied"));
        assert_eq!(SenseError::Disconnected.to_string(), "agent disconnected");
    }

    // ── Event tests ────────────────────────────────────────────

    #[test]
    fn test_event_serde_tagging() {
        let event = WorldEvent::EntityStatus { entity_id: 7, status: 37 };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "entity_status");
        assert_eq!(json["status"], 37);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_matching_filters_events() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe();
        bus.publish(WorldEvent::Tick { tick: 1 });
        bus.publish(WorldEvent::Mount { entity_id: 9 });
        let found = sub
            .next_matching(Duration::from_secs(1), |event| match event {
                WorldEvent::Mount { entity_id } => Some(*entity_id),
                _ => None,
            })
            .await;
        assert_eq!(found, Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_matching_times_out() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe();
        bus.publish(WorldEvent::Tick { tick: 1 });
        let found = sub
            .next_matching(Duration::from_millis(500), |event| match event {
                WorldEvent::Death => Some(()),
                _ => None,
            })
            .await;
        assert!(found.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_ends_subscription() {
        let bus = EventBus::default();
        let mut sub = bus.subscribe();
        bus.publish(WorldEvent::Disconnected);
        assert!(sub.recv().await.is_none());
    }

    #[test]
    fn test_unsubscribe_drops_receiver() {
        let bus = EventBus::default();
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        sub.unsubscribe();
        assert_eq!(bus.subscriber_count(), 0);
    }
}
