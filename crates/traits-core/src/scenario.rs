//! Scenario Runner
//!
//! Builds the demo world — the trait colony, the map, the raid schedule —
//! wires the per-tick system pipeline, and runs the loop. Shared between
//! the binary and the end-to-end tests so both exercise the same code.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info};
use traits_events::{Event, EventKind, Snapshot};

use crate::behaviors::Behaviors;
use crate::caravan::{self, Caravan};
use crate::components::pawn::{FactionKind, Health, Pawn, PawnId, PawnKind};
use crate::config::Config;
use crate::engine::PawnIndex;
use crate::events::{push_event, EventLog, TickEvents};
use crate::output;
use crate::setup;
use crate::systems;
use crate::{SimRng, SimulationState};

/// Parameters for one scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioParams {
    pub seed: u64,
    pub ticks: u64,
    pub snapshot_interval: u64,
    pub config: Config,
    /// Where to write the event log and snapshots; None keeps everything
    /// in memory.
    pub output_dir: Option<PathBuf>,
    /// Suppress stdout progress (tests).
    pub quiet: bool,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        let config = Config::default();
        Self {
            seed: 42,
            ticks: config.simulation.default_ticks,
            snapshot_interval: config.simulation.snapshot_interval,
            config,
            output_dir: None,
            quiet: true,
        }
    }
}

/// What a finished run produced.
pub struct ScenarioOutcome {
    pub events: Vec<Event>,
    pub final_snapshot: Snapshot,
    pub snapshot_count: u64,
    pub caravan_ticks_per_move: u32,
}

/// Builds the world with every resource and the demo population.
pub fn build_world(params: &ScenarioParams) -> io::Result<World> {
    let mut world = World::new();
    world.insert_resource(Behaviors::from_config(&params.config));
    world.insert_resource(SimulationState::default());
    world.insert_resource(SimRng(SmallRng::seed_from_u64(params.seed)));
    world.insert_resource(PawnIndex::new());
    world.insert_resource(TickEvents::new());
    world.insert_resource(systems::DamageQueue::new());
    world.insert_resource(setup::demo_map(params.config.extensions.doormats));

    let log = match &params.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            EventLog::new(dir.join("events.jsonl"))?
        }
        None => EventLog::null(),
    };
    world.insert_resource(log);
    world.insert_resource(params.config.clone());

    setup::spawn_colony(&mut world);
    Ok(world)
}

/// The per-tick system pipeline, in a fixed order.
pub fn build_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            systems::social_tick,
            systems::assign_jobs,
            systems::run_jobs,
            systems::apply_damage,
            systems::tick_hediffs,
            systems::tick_mental_states,
            systems::tick_doors,
        )
            .chain(),
    );
    schedule
}

/// Runs the full scenario and returns everything it produced.
pub fn run(params: &ScenarioParams) -> io::Result<ScenarioOutcome> {
    let mut world = build_world(params)?;
    let mut schedule = build_schedule();
    let raid_tick = params.config.simulation.raid_tick;
    let mut all_events: Vec<Event> = Vec::new();
    let mut snapshot_count = 0;

    for tick in 0..params.ticks {
        world.resource_mut::<SimulationState>().current_tick = tick;

        if tick == raid_tick {
            raid_arrival(&mut world);
        }

        schedule.run(&mut world);

        let events = world.resource_mut::<TickEvents>().drain();
        for event in &events {
            world.resource_mut::<EventLog>().log(event)?;
            if !params.quiet && event.kind.is_notable() {
                println!(
                    "[Tick {:>5}] {} {} ({})",
                    tick,
                    event.actor.name,
                    event.kind.label(),
                    event.detail.as_deref().unwrap_or("-")
                );
            }
        }
        all_events.extend(events);

        if params.snapshot_interval > 0 && tick > 0 && tick % params.snapshot_interval == 0 {
            let snapshot = output::generate_snapshot(&world, "periodic");
            if let Some(dir) = &params.output_dir {
                if let Err(e) = output::write_snapshot(dir, &snapshot) {
                    eprintln!("Warning: could not write snapshot at tick {}: {}", tick, e);
                }
                if let Err(e) = output::write_current_state(dir, &snapshot) {
                    eprintln!("Warning: could not write current state: {}", e);
                }
            }
            snapshot_count += 1;
        }
    }

    // Survivors pack up and go trading.
    let caravan_ticks_per_move = form_caravan(&mut world);
    let events = world.resource_mut::<TickEvents>().drain();
    for event in &events {
        world.resource_mut::<EventLog>().log(event)?;
    }
    all_events.extend(events);
    world.resource_mut::<EventLog>().flush()?;

    let final_snapshot = output::generate_snapshot(&world, "simulation_end");
    if let Some(dir) = &params.output_dir {
        output::write_snapshot(dir, &final_snapshot)?;
        output::write_current_state(dir, &final_snapshot)?;
    }

    Ok(ScenarioOutcome {
        events: all_events,
        final_snapshot,
        snapshot_count,
        caravan_ticks_per_move,
    })
}

/// The raid lands: hostiles spawn and the colony scrambles.
fn raid_arrival(world: &mut World) {
    let raiders = setup::spawn_raid(world);
    setup::draft_colony(world);
    info!(raiders = raiders.len(), "raid arrived");
    if let Some(leader) = raiders.first().copied() {
        let count = raiders.len();
        push_event(
            world,
            EventKind::RaidArrived,
            leader,
            None,
            None,
            Some(format!("{} attackers", count)),
        );
    }
}

/// Forms the caravan of standing colony humans and reports its pace.
fn form_caravan(world: &mut World) -> u32 {
    let mut members: Vec<(Entity, PawnId)> = world
        .iter_entities()
        .filter(|e| e.contains::<Pawn>())
        .filter(|e| {
            e.get::<FactionKind>() == Some(&FactionKind::Colony)
                && e.get::<PawnKind>().is_some_and(|k| !k.is_animal())
                && e.get::<Health>().is_some_and(|h| h.is_standing())
        })
        .filter_map(|e| Some((e.id(), *e.get::<PawnId>()?)))
        .collect();
    members.sort_by_key(|(_, id)| *id);

    let caravan = Caravan::new(members.iter().map(|(_, id)| *id).collect());
    let ticks = caravan::ticks_per_move(world, &caravan);
    debug!(members = members.len(), ticks_per_move = ticks, "caravan formed");

    if let Some((leader, _)) = members.first().copied() {
        let detail = format!("{} members", members.len());
        push_event(
            world,
            EventKind::CaravanFormed,
            leader,
            None,
            Some(ticks as f32),
            Some(detail),
        );
    }
    ticks
}
