use clap::ValueEnum;
use std::sync::Arc;
use tracing::{debug, info, warn};

use sense_config::{ConfigLoader, FallCheck, MitigationOptions, SenseConfig};
use sense_core::{DVec3, Hand, IVec3, SenseError, WorldEvent};
use sense_runtime::{CommonSense, MitigationOutcome};
use sense_sim::{SimWorld, TICK_PERIOD};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Fall onto stone carrying a water bucket and slime blocks
    Fall,
    /// Fall with nothing below
    Void,
    /// Catch fire next to a fire block while standing
    Fire,
    /// Catch fire in the nether, where it is left to burn
    NetherFire,
    /// Fall carrying only a boat
    Boat,
}

impl Scenario {
    pub fn world(self, height: f64) -> SimWorld {
        let falling = |world: SimWorld| {
            world
                .with_agent_at(DVec3::new(0.5, height, 0.5))
                .with_velocity(DVec3::new(0.0, -1.0, 0.0))
        };
        match self {
            Scenario::Fall => falling(SimWorld::new())
                .with_floor(64, 3, "stone")
                .with_item("water_bucket", 1, 1)
                .with_item("slime_block", 16, 64),
            Scenario::Void => falling(SimWorld::new())
                .with_item("water_bucket", 1, 1)
                .with_item("slime_block", 16, 64),
            Scenario::Boat => falling(SimWorld::new())
                .with_floor(64, 3, "stone")
                .with_item("oak_boat", 1, 1),
            Scenario::Fire => SimWorld::new()
                .with_agent_at(DVec3::new(0.5, 65.0, 0.5))
                .with_floor(64, 3, "stone")
                .standing()
                .with_block(IVec3::new(1, 65, 0), "fire")
                .with_item("water_bucket", 1, 1)
                .with_held("water_bucket", Hand::Main),
            Scenario::NetherFire => SimWorld::new()
                .with_dimension("the_nether")
                .with_agent_at(DVec3::new(0.5, 65.0, 0.5))
                .with_floor(64, 3, "netherrack")
                .standing()
                .with_item("water_bucket", 1, 1),
        }
    }

    fn ignites(self) -> bool {
        matches!(self, Scenario::Fire | Scenario::NetherFire)
    }
}

/// Options for a run: the configured ones, with every hazard check switched on.
fn simulation_options(mut options: MitigationOptions) -> MitigationOptions {
    options.auto_respond = true;
    options.fire_check = true;
    if !options.fall_check.is_enabled() {
        options.fall_check = FallCheck::Simple;
    }
    options
}

pub(super) async fn cmd_simulate(
    config: SenseConfig,
    config_loader: &ConfigLoader,
    scenario: Scenario,
    height: f64,
    ticks: u64,
    json: bool,
) -> sense_core::Result<()> {
    let world = scenario.world(height);
    let sense = CommonSense::new(
        Arc::new(world.clone()),
        world.bus(),
        simulation_options(config.options),
    );

    // Edits to sense.toml apply to the next mitigation of this run
    let _watcher = {
        let sense = sense.clone();
        match config_loader.watch_with(move |c| sense.replace_options(simulation_options(c.options.clone()))) {
            Ok(w) => Some(w),
            Err(e) => {
                debug!(error = %e, "config hot-reload disabled");
                None
            }
        }
    };

    info!(?scenario, height, "starting simulation");
    let mut sub = world.bus().subscribe();
    let ticker = world.spawn_ticker();
    if scenario.ignites() {
        world.ignite();
    }

    let deadline = tokio::time::Instant::now() + TICK_PERIOD * ticks as u32;
    let mut outcome = None;
    while outcome.is_none() {
        let event = match tokio::time::timeout_at(deadline, sub.recv()).await {
            Ok(Some(event)) => event,
            Ok(None) | Err(_) => break,
        };
        match sense.handle_event(&event) {
            Some(handle) => {
                let finished = handle.await.map_err(|e| SenseError::Other(e.into()))?;
                outcome = Some(finished);
            }
            None if matches!(event, WorldEvent::EntityStatus { .. }) => {
                info!("ignition noticed, nothing to do");
                break;
            }
            None => {}
        }
    }
    // Let the agent come to rest so the landing shows up in the impacts
    tokio::time::sleep(TICK_PERIOD * 10).await;
    ticker.abort();
    if outcome.is_none() {
        warn!(ticks, "no mitigation was dispatched");
    }

    if json {
        let report = serde_json::json!({
            "scenario": format!("{scenario:?}"),
            "outcome": outcome,
            "flags": sense.flags(),
            "actions": world.actions(),
            "impacts": world.impacts(),
            "final_position": world.position().to_array(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(scenario, outcome.as_ref(), &sense, &world);
    Ok(())
}

fn print_report(
    scenario: Scenario,
    outcome: Option<&MitigationOutcome>,
    sense: &CommonSense<SimWorld>,
    world: &SimWorld,
) {
    println!("🧪 Scenario: {scenario:?}");
    match outcome {
        Some(outcome) => println!("   Outcome: {outcome}"),
        None => println!("   Outcome: nothing dispatched"),
    }
    let flags = sense.flags();
    println!(
        "   Flags: falling={} on_fire={} (agent actually on fire: {})",
        flags.is_falling,
        flags.is_on_fire,
        world.is_on_fire()
    );

    let actions = world.actions();
    println!();
    println!("\x1b[1mWorld actions\x1b[0m ({})", actions.len());
    for action in &actions {
        println!("   {action:?}");
    }

    let impacts = world.impacts();
    println!();
    println!("\x1b[1mImpacts\x1b[0m ({})", impacts.len());
    for impact in &impacts {
        let mark = if impact.is_damaging() { "💥" } else { "✅" };
        println!(
            "   {mark} {} after {:.1} blocks",
            impact.surface, impact.fall_distance
        );
    }
    let p = world.position();
    println!();
    println!("   Final position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
}

#[cfg(test)]
mod tests {
    use super::*;
    use sense_core::AgentState;

    #[test]
    fn test_simulation_turns_checks_on() {
        let options = simulation_options(MitigationOptions::default());
        assert!(options.auto_respond);
        assert!(options.fire_check);
        assert_eq!(options.fall_check, FallCheck::Simple);

        let mut predictive = MitigationOptions::default();
        predictive.fall_check = FallCheck::Predictive { predict_ticks: 2 };
        assert_eq!(
            simulation_options(predictive).fall_check,
            FallCheck::Predictive { predict_ticks: 2 }
        );
    }

    #[test]
    fn test_scenario_worlds() {
        let fall = Scenario::Fall.world(90.0).snapshot().unwrap();
        assert_eq!(fall.position.y, 90.0);
        assert!(fall.velocity.y < 0.0);
        assert_eq!(fall.inventory.len(), 2);

        let nether = Scenario::NetherFire.world(90.0).snapshot().unwrap();
        assert_eq!(nether.dimension, "the_nether");
        assert!(nether.on_ground);

        let fire = Scenario::Fire.world(90.0);
        assert_eq!(fire.block(IVec3::new(1, 65, 0)).unwrap().name, "fire");
        assert_eq!(fire.held_item_name(Hand::Main).as_deref(), Some("water_bucket"));
    }
}
