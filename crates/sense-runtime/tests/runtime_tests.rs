#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use sense_config::{FallCheck, ItemRule, MitigationOptions, OptionsPatch};
    use sense_core::{
        AgentControl, AgentSnapshot, AgentState, Block, BlockPos, DVec3, Entity, Hand, IVec3,
        Item, WorldEvent, WorldQuery,
    };
    use sense_runtime::*;
    use sense_sim::{SimAction, SimWorld, TICK_PERIOD};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, OnceLock};
    use std::time::Duration;

    fn responsive(items: &[&str]) -> MitigationOptions {
        let mut options = MitigationOptions::default();
        options.auto_respond = true;
        options.fire_check = true;
        options.fall_check = FallCheck::Simple;
        options.mlg_items = items.iter().map(|name| ItemRule::new(*name)).collect();
        options
    }

    fn falling_from(y: f64) -> SimWorld {
        SimWorld::new()
            .with_agent_at(DVec3::new(0.5, y, 0.5))
            .with_velocity(DVec3::new(0.0, -1.0, 0.0))
            .with_floor(64, 3, "stone")
    }

    fn standing_on_stone() -> SimWorld {
        SimWorld::new()
            .with_agent_at(DVec3::new(0.5, 65.0, 0.5))
            .with_floor(64, 3, "stone")
            .standing()
    }

    fn controller(world: &SimWorld, options: MitigationOptions) -> CommonSense<SimWorld> {
        CommonSense::new(Arc::new(world.clone()), world.bus(), options)
    }

    /// Pump events into the monitor until it dispatches something, then wait for it.
    async fn first_dispatch(world: &SimWorld, sense: &CommonSense<SimWorld>) -> MitigationOutcome {
        let mut sub = world.bus().subscribe();
        let ticker = world.spawn_ticker();
        let handle = loop {
            let event = sub.recv().await.expect("world still connected");
            if let Some(handle) = sense.handle_event(&event) {
                break handle;
            }
        };
        let outcome = handle.await.expect("mitigation task");
        ticker.abort();
        outcome
    }

    fn no_damage(world: &SimWorld) -> bool {
        world.impacts().iter().all(|impact| !impact.is_damaging())
    }

    /// A `SimWorld` whose agent dies right after the first turn or equip it is asked for.
    struct DiesOnFirstMove {
        world: SimWorld,
        on_death: OnceLock<Box<dyn Fn() + Send + Sync>>,
        died: AtomicBool,
    }

    impl DiesOnFirstMove {
        fn die_once(&self) {
            if !self.died.swap(true, Ordering::SeqCst) {
                if let Some(on_death) = self.on_death.get() {
                    on_death();
                }
            }
        }
    }

    impl WorldQuery for DiesOnFirstMove {
        fn block_at(&self, pos: BlockPos) -> Option<Block> {
            self.world.block_at(pos)
        }

        fn min_height(&self) -> i32 {
            self.world.min_height()
        }

        fn find_blocks(
            &self,
            origin: DVec3,
            max_distance: f64,
            matching: &dyn Fn(&Block) -> bool,
        ) -> Vec<BlockPos> {
            self.world.find_blocks(origin, max_distance, matching)
        }

        fn entities(&self) -> Vec<Entity> {
            self.world.entities()
        }
    }

    impl AgentState for DiesOnFirstMove {
        fn snapshot(&self) -> sense_core::Result<AgentSnapshot> {
            self.world.snapshot()
        }
    }

    #[async_trait]
    impl AgentControl for DiesOnFirstMove {
        async fn look_at(&self, point: DVec3, force: bool) -> sense_core::Result<()> {
            let result = self.world.look_at(point, force).await;
            self.die_once();
            result
        }

        async fn equip(&self, item: &Item, hand: Hand) -> sense_core::Result<()> {
            let result = self.world.equip(item, hand).await;
            self.die_once();
            result
        }

        async fn unequip(&self, hand: Hand) -> sense_core::Result<()> {
            self.world.unequip(hand).await
        }

        async fn activate_item(&self, hand: Hand) -> sense_core::Result<()> {
            self.world.activate_item(hand).await
        }

        async fn place_block(
            &self,
            reference: &Block,
            face: IVec3,
            hand: Hand,
        ) -> sense_core::Result<BlockPos> {
            self.world.place_block(reference, face, hand).await
        }

        async fn place_entity(
            &self,
            reference: &Block,
            face: IVec3,
            hand: Hand,
        ) -> sense_core::Result<()> {
            self.world.place_entity(reference, face, hand).await
        }

        async fn mount(&self, entity: &Entity) -> sense_core::Result<()> {
            self.world.mount(entity).await
        }

        async fn dismount(&self) -> sense_core::Result<()> {
            self.world.dismount().await
        }

        async fn dig(&self, block: &Block, force: bool) -> sense_core::Result<()> {
            self.world.dig(block, force).await
        }
    }

    /// A controller whose host reports a death as soon as the agent first moves.
    fn dies_mid_sequence(
        world: &SimWorld,
        options: MitigationOptions,
    ) -> CommonSense<DiesOnFirstMove> {
        let bot = Arc::new(DiesOnFirstMove {
            world: world.clone(),
            on_death: OnceLock::new(),
            died: AtomicBool::new(false),
        });
        let sense = CommonSense::new(Arc::clone(&bot), world.bus(), options);
        let host = sense.clone();
        let _ = bot.on_death.set(Box::new(move || host.on_death()));
        sense
    }

    fn poured(world: &SimWorld) -> bool {
        world
            .actions()
            .iter()
            .any(|a| matches!(a, SimAction::Activate(_)))
    }

    // ── Fall mitigation ────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_slime_block_catches_fall() {
        let world = falling_from(80.0).with_item("slime_block", 16, 64);
        let sense = controller(&world, responsive(&["slime_block"]));

        let outcome = first_dispatch(&world, &sense).await;
        let mitigation = outcome.mitigation().expect("mitigated");
        assert_eq!(mitigation.method, Method::Block);
        assert_eq!(mitigation.item, "slime_block");
        assert_eq!(mitigation.target, IVec3::new(0, 65, 0));
        assert!(mitigation.confirmed);

        assert_eq!(world.block(IVec3::new(0, 65, 0)).unwrap().name, "slime_block");
        assert_eq!(world.impacts()[0].surface, "slime_block");
        assert!(no_damage(&world));
        assert!(!sense.flags().mitigating_fall);
    }

    #[tokio::test(start_paused = true)]
    async fn test_water_bucket_catches_fall_and_is_refilled() {
        let world = falling_from(80.0).with_item("water_bucket", 1, 1);
        let sense = controller(&world, responsive(&["water_bucket"]));
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        let mitigation = outcome.mitigation().expect("mitigated");
        assert_eq!(mitigation.method, Method::Liquid);
        assert!(mitigation.confirmed);

        assert_eq!(world.impacts()[0].surface, "water");
        assert!(no_damage(&world));
        assert!(world.block(IVec3::new(0, 65, 0)).unwrap().is_air());
        assert_eq!(world.held_item_name(Hand::Main).as_deref(), Some("water_bucket"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_boat_is_placed_and_ridden() {
        let world = falling_from(80.0).with_item("oak_boat", 1, 1);
        let sense = controller(&world, responsive(&["oak_boat"]));
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        let mitigation = outcome.mitigation().expect("mitigated");
        assert_eq!(mitigation.method, Method::Vehicle);
        assert!(mitigation.confirmed);

        let actions = world.actions();
        assert!(actions.iter().any(|a| matches!(a, SimAction::PlaceEntity { name } if name == "oak_boat")));
        assert!(actions.iter().any(|a| matches!(a, SimAction::Mount(_))));
        assert!(actions.contains(&SimAction::Dismount));
    }

    #[tokio::test(start_paused = true)]
    async fn test_void_fall_is_not_handled_and_issues_nothing() {
        let world = SimWorld::new()
            .with_agent_at(DVec3::new(0.5, 10.0, 0.5))
            .with_velocity(DVec3::new(0.0, -1.0, 0.0))
            .with_item("slime_block", 16, 64);
        let sense = controller(&world, responsive(&["slime_block"]));
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        assert_eq!(
            outcome,
            MitigationOutcome::NotHandled(NotHandledReason::NoLandingSurface)
        );
        assert!(world.actions().is_empty());
        assert!(!sense.flags().mitigating_fall);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_item_and_no_vehicle() {
        let world = falling_from(70.0);
        let sense = controller(&world, responsive(&["slime_block"]));
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        assert_eq!(
            outcome,
            MitigationOutcome::NotHandled(NotHandledReason::NoEligibleItem)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_predictive_mode_catches_fall() {
        let world = falling_from(80.0).with_item("slime_block", 16, 64);
        let mut options = responsive(&["slime_block"]);
        options.fall_check = FallCheck::Predictive { predict_ticks: 1 };
        let sense = controller(&world, options);
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        let mitigation = outcome.mitigation().expect("mitigated");
        assert_eq!(mitigation.method, Method::Block);
        assert_eq!(mitigation.target, IVec3::new(0, 65, 0));
        assert!(mitigation.confirmed);
        assert_eq!(world.impacts()[0].surface, "slime_block");
        assert!(no_damage(&world));
    }

    #[tokio::test(start_paused = true)]
    async fn test_item_choice_is_reevaluated_as_the_fall_grows() {
        let world = falling_from(80.0)
            .with_item("hay_block", 16, 64)
            .with_item("slime_block", 16, 64);
        let mut options = responsive(&[]);
        options.mlg_items = vec![
            ItemRule::new("hay_block").with_max_fall_distance(5.0),
            ItemRule::new("slime_block"),
        ];
        let sense = controller(&world, options);
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        assert_eq!(outcome.mitigation().expect("mitigated").item, "slime_block");

        let actions = world.actions();
        let equipped = |name: &str| {
            actions
                .iter()
                .position(|a| matches!(a, SimAction::Equip { item, .. } if item == name))
        };
        let hay = equipped("hay_block").expect("hay chosen while the fall was short");
        let slime = equipped("slime_block").expect("slime chosen once it was not");
        assert!(hay < slime);
        assert!(!actions
            .iter()
            .any(|a| matches!(a, SimAction::PlaceBlock { name, .. } if name == "hay_block")));
        assert_eq!(world.block(IVec3::new(0, 65, 0)).unwrap().name, "slime_block");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_only_rides_nearby_pig() {
        let world = falling_from(70.0)
            .with_item("cobblestone", 32, 64)
            .with_held("cobblestone", Hand::Main);
        let pig = world.spawn_entity("pig", DVec3::new(2.5, 65.0, 0.5));
        let mut options = responsive(&[]);
        options.fall_check = FallCheck::MountOnly;
        let sense = controller(&world, options);
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        let mitigation = outcome.mitigation().expect("mitigated");
        assert_eq!(mitigation.method, Method::Mount);
        assert_eq!(mitigation.item, "pig");

        let actions = world.actions();
        let unequip = actions.iter().position(|a| *a == SimAction::Unequip(Hand::Main));
        let mount = actions.iter().position(|a| *a == SimAction::Mount(pig));
        assert!(unequip.unwrap() < mount.unwrap());
        assert!(world.mounted().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_fall_check() {
        let world = falling_from(80.0).with_item("slime_block", 16, 64);
        let mut options = responsive(&["slime_block"]);
        options.fall_check = FallCheck::Off;
        let sense = controller(&world, options);
        assert!(sense.on_tick().is_none());
        assert_eq!(
            sense.catch_fall().await,
            MitigationOutcome::NotHandled(NotHandledReason::Disabled)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracking_only_without_auto_respond() {
        let world = falling_from(80.0).with_item("slime_block", 16, 64);
        let mut options = responsive(&["slime_block"]);
        options.auto_respond = false;
        let sense = controller(&world, options);
        assert!(sense.on_tick().is_none());
        assert!(sense.flags().is_falling);
        assert!(!sense.flags().mitigating_fall);
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnected_agent_is_lost() {
        let world = falling_from(80.0).with_item("slime_block", 16, 64);
        let sense = controller(&world, responsive(&["slime_block"]));
        world.disconnect();
        assert_eq!(
            sense.catch_fall().await,
            MitigationOutcome::NotHandled(NotHandledReason::AgentLost)
        );
        assert!(!sense.flags().mitigating_fall);
    }

    // ── Flags & re-entrancy ────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_one_fall_mitigation_at_a_time() {
        let world = falling_from(80.0).with_item("slime_block", 16, 64);
        let sense = controller(&world, responsive(&["slime_block"]));

        let first = sense.on_tick().expect("dispatched");
        assert!(sense.on_tick().is_none());
        assert_eq!(sense.catch_fall().await, MitigationOutcome::InProgress);
        assert!(sense.flags().mitigating_fall);
        first.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_death_resets_flags_and_stops_in_flight_work() {
        let world = falling_from(80.0).with_item("slime_block", 16, 64);
        let sense = controller(&world, responsive(&["slime_block"]));

        let handle = sense.on_tick().expect("dispatched");
        sense.handle_event(&WorldEvent::Death);
        assert_eq!(sense.flags(), HazardFlags::default());

        let outcome = handle.await.unwrap();
        assert_eq!(outcome, MitigationOutcome::NotHandled(NotHandledReason::AgentLost));
        assert!(world.actions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_out_fire_is_idempotent() {
        let world = standing_on_stone()
            .with_item("water_bucket", 1, 1)
            .with_held("water_bucket", Hand::Main);
        let sense = controller(&world, responsive(&[]));

        let first = {
            let sense = sense.clone();
            tokio::spawn(async move { sense.put_out_fire().await })
        };
        while !sense.flags().mitigating_fire {
            tokio::task::yield_now().await;
        }

        let before = world.actions().len();
        assert_eq!(sense.put_out_fire().await, MitigationOutcome::InProgress);
        assert_eq!(world.actions().len(), before);
        first.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ignition_waiter_leaves_new_life_pending() {
        let world = falling_from(80.0)
            .with_item("water_bucket", 1, 1)
            .with_held("water_bucket", Hand::Main);
        let sense = controller(&world, responsive(&[]));
        let agent = world.agent_id();

        let old_life = sense.on_ignition(agent, true).expect("waiting to land");
        sense.on_death();
        let new_life = sense.on_ignition(agent, true).expect("new life waits too");

        assert_eq!(
            old_life.await.unwrap(),
            MitigationOutcome::NotHandled(NotHandledReason::AgentLost)
        );
        assert!(sense.on_ignition(agent, true).is_none());
        assert!(!new_life.is_finished());
        new_life.abort();
    }

    // ── Death mid-sequence ─────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_no_water_poured_after_death_while_turning() {
        let world = standing_on_stone()
            .with_item("water_bucket", 1, 1)
            .with_held("water_bucket", Hand::Main);
        let sense = dies_mid_sequence(&world, responsive(&[]));

        assert_eq!(
            sense.put_out_fire().await,
            MitigationOutcome::NotHandled(NotHandledReason::AgentLost)
        );
        assert!(matches!(world.actions().as_slice(), [SimAction::LookAt(_)]));
        assert!(!poured(&world));
        assert_eq!(sense.flags(), HazardFlags::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_death_while_equipping_water_is_agent_lost() {
        let world = standing_on_stone().with_item("water_bucket", 1, 1);
        let sense = dies_mid_sequence(&world, responsive(&[]));

        assert_eq!(
            sense.put_out_fire().await,
            MitigationOutcome::NotHandled(NotHandledReason::AgentLost)
        );
        assert!(matches!(world.actions().as_slice(), [SimAction::Equip { .. }]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_mount_after_death_while_turning() {
        let world = falling_from(70.0);
        world.spawn_entity("pig", DVec3::new(2.5, 65.0, 0.5));
        let mut options = responsive(&[]);
        options.fall_check = FallCheck::MountOnly;
        let sense = dies_mid_sequence(&world, options);
        let ticker = world.spawn_ticker();

        let outcome = sense.catch_fall().await;
        ticker.abort();
        assert_eq!(outcome, MitigationOutcome::NotHandled(NotHandledReason::AgentLost));
        let actions = world.actions();
        assert!(matches!(actions.as_slice(), [SimAction::LookAt(_)]));
        assert!(world.mounted().is_none());
    }

    // ── Fire ───────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_ignition_is_extinguished() {
        let world = standing_on_stone()
            .with_item("water_bucket", 1, 1)
            .with_held("water_bucket", Hand::Main);
        let sense = controller(&world, responsive(&[]));

        let mut sub = world.bus().subscribe();
        world.ignite();
        let event = sub.recv().await.unwrap();
        let ticker = world.spawn_ticker();
        let handle = sense.handle_event(&event).expect("dispatched");
        assert!(sense.flags().is_on_fire);

        let outcome = handle.await.unwrap();
        ticker.abort();
        let mitigation = outcome.mitigation().expect("mitigated");
        assert_eq!(mitigation.method, Method::Extinguish);
        assert_eq!(mitigation.target, IVec3::new(0, 65, 0));
        assert!(mitigation.confirmed);
        assert!(!world.is_on_fire());
        assert!(!sense.flags().mitigating_fire);
        assert_eq!(world.held_item_name(Hand::Main).as_deref(), Some("water_bucket"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_airborne_ignition_waits_for_landing() {
        let world = falling_from(80.0)
            .with_item("slime_block", 16, 64)
            .with_item("water_bucket", 1, 1);
        let sense = controller(&world, responsive(&["slime_block"]));
        let monitor = sense.spawn();
        let ticker = world.spawn_ticker();

        tokio::time::sleep(TICK_PERIOD).await;
        world.ignite();
        let mut poured_in_air = false;
        for _ in 0..200 {
            tokio::time::sleep(TICK_PERIOD).await;
            poured_in_air |= poured(&world) && world.impacts().is_empty();
            if !world.is_on_fire() {
                break;
            }
        }

        assert!(!poured_in_air);
        assert!(!world.is_on_fire());
        assert_eq!(world.impacts()[0].surface, "slime_block");
        world.disconnect();
        monitor.await.unwrap();
        ticker.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_permissive_world_is_left_alone() {
        let world = SimWorld::new()
            .with_dimension("the_nether")
            .with_agent_at(DVec3::new(0.5, 65.0, 0.5))
            .with_floor(64, 3, "netherrack")
            .standing()
            .with_item("water_bucket", 1, 1);
        let sense = controller(&world, responsive(&[]));

        assert!(sense.on_ignition(world.agent_id(), true).is_none());
        assert!(sense.flags().is_on_fire);
        assert!(!sense.flags().mitigating_fire);
        assert!(world.actions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_entities_burning_is_ignored() {
        let world = standing_on_stone().with_item("water_bucket", 1, 1);
        let sense = controller(&world, responsive(&[]));
        assert!(sense.on_ignition(world.agent_id() + 50, true).is_none());
        assert!(!sense.flags().is_on_fire);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_confirmation_still_clears_flag() {
        let world = standing_on_stone()
            .with_item("water_bucket", 1, 1)
            .with_held("water_bucket", Hand::Main);
        world.set_block_updates(false);
        world.ignite();
        let sense = controller(&world, responsive(&[]));
        let ticker = world.spawn_ticker();

        let outcome = sense.put_out_fire().await;
        ticker.abort();
        let mitigation = outcome.mitigation().expect("acted");
        assert!(!mitigation.confirmed);
        assert!(!sense.flags().mitigating_fire);
        assert!(!world.is_on_fire());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_without_water() {
        let world = standing_on_stone();
        let sense = controller(&world, responsive(&[]));
        assert_eq!(
            sense.put_out_fire().await,
            MitigationOutcome::NotHandled(NotHandledReason::NoWaterItem)
        );
        assert!(!sense.flags().mitigating_fire);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_block_is_dug_out_first() {
        let world = standing_on_stone()
            .with_block(IVec3::new(1, 65, 0), "fire")
            .with_item("water_bucket", 1, 1);
        let sense = controller(&world, responsive(&[]));
        let ticker = world.spawn_ticker();

        let outcome = sense.put_out_fire().await;
        ticker.abort();
        assert_eq!(outcome.mitigation().unwrap().target, IVec3::new(1, 65, 0));

        let actions = world.actions();
        let dig = actions
            .iter()
            .position(|a| *a == SimAction::Dig(IVec3::new(1, 65, 0)))
            .expect("fire dug");
        let pour = actions
            .iter()
            .position(|a| *a == SimAction::Activate(Hand::Main))
            .expect("water poured");
        assert!(actions[..dig]
            .iter()
            .any(|a| matches!(a, SimAction::Equip { item, .. } if item == "water_bucket")));
        assert!(dig < pour);
        assert!(world.block(IVec3::new(1, 65, 0)).unwrap().is_air());
    }

    // ── Options ────────────────────────────────────────────────

    #[test]
    fn test_options_patch_touches_only_supplied_fields() {
        let world = SimWorld::new();
        let before = responsive(&["slime_block"]);
        let sense = controller(&world, before.clone());

        let patch = OptionsPatch {
            use_offhand: Some(true),
            ..OptionsPatch::default()
        };
        let after = sense.set_options(patch);
        assert!(after.use_offhand);
        assert_eq!(MitigationOptions { use_offhand: false, ..after.clone() }, before);
        assert_eq!(sense.options(), after);
    }

    #[test]
    fn test_outcome_wire_format() {
        let outcome = MitigationOutcome::Mitigated(Mitigation {
            method: Method::Liquid,
            item: "water_bucket".into(),
            target: IVec3::new(0, 65, 0),
            confirmed: true,
        });
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "mitigated");
        assert_eq!(value["detail"]["method"], "liquid");
        assert_eq!(value["detail"]["item"], "water_bucket");

        let value = serde_json::to_value(MitigationOutcome::NotHandled(
            NotHandledReason::NoLandingSurface,
        ))
        .unwrap();
        assert_eq!(value["status"], "not_handled");
        assert_eq!(value["detail"], "no_landing_surface");

        let value = serde_json::to_value(MitigationOutcome::InProgress).unwrap();
        assert_eq!(value["status"], "in_progress");
    }

    // ── Event loop ─────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn test_event_loop_catches_fall() {
        let world = falling_from(80.0).with_item("hay_block", 8, 64);
        let sense = controller(&world, responsive(&["hay_block"]));
        let monitor = sense.spawn();
        let ticker = world.spawn_ticker();

        for _ in 0..100 {
            tokio::time::sleep(Duration::from_millis(50)).await;
            if !world.impacts().is_empty() {
                break;
            }
        }
        assert_eq!(world.impacts()[0].surface, "hay_block");
        world.disconnect();
        monitor.await.unwrap();
        ticker.abort();
    }
}
