use std::fmt;

use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::agent::Agent;
use crate::components::{despawn_tree, Hazard, Mover, Segment};
use crate::config::RunnerConfig;
use crate::engine::{DeferredQueue, DeferredTask, SimClock};
use crate::error::ConfigError;
use crate::scene::{spawn_mover, SegmentSpawner};
use crate::score::{Leaderboard, RunResult, RunResultSink, Scoreboard};
use crate::systems::{
    agent_system, award_points, mover_system, overlap_system, resolve_hazard_contact,
    resolve_pickup_contact, ContactOutcome, OverlapEvent,
};

/// Headless game loop: owns the world and every piece of run state, and
/// advances them one fixed step at a time.
pub struct GameApp {
    world: World,
    config: RunnerConfig,
    rng: SmallRng,
    spawner: SegmentSpawner,
    deferred: DeferredQueue,
    clock: SimClock,
    scoreboard: Scoreboard,
    leaderboard: Leaderboard,
    mover: Entity,
    run: u32,
}

impl GameApp {
    pub fn new(config: RunnerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.rng_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut world = World::new();
        let mover = spawn_mover(&mut world, &config.mover);
        let mut app = Self {
            world,
            spawner: SegmentSpawner::new(Vec3::ZERO, mover),
            deferred: DeferredQueue::new(),
            clock: SimClock::new(config.fixed_dt),
            scoreboard: Scoreboard::new(config.score.distance_interval),
            leaderboard: Leaderboard::from_results(
                config.score.leaderboard_slots,
                config.history.clone(),
            ),
            mover,
            run: 1,
            rng,
            config,
        };
        app.spawner
            .prespawn(&mut app.world, &mut app.rng, &app.config);
        info!(run = app.run, seed = ?app.config.rng_seed, "run started");
        Ok(app)
    }

    /// Advance the simulation by one fixed step.
    pub fn step(&mut self) {
        let dt = self.config.fixed_dt;
        self.clock.tick();

        let alive = self.mover_alive();
        self.scoreboard.tick(dt, alive);

        mover_system(&mut self.world, dt);

        let fallen = agent_system(&mut self.world, dt, self.config.score.fallen_depth);
        for agent in fallen {
            despawn_tree(&mut self.world, agent);
            award_points(
                &mut self.world,
                &mut self.scoreboard,
                self.mover,
                self.config.score.fallen_agent_bonus,
            );
            debug!(?agent, "agent fell off the track");
        }

        for event in overlap_system(&mut self.world) {
            self.handle_overlap(event);
        }

        self.run_due_tasks();
    }

    /// Run `ticks` fixed steps.
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    fn handle_overlap(&mut self, event: OverlapEvent) {
        match event {
            OverlapEvent::RegionExit { segment } => {
                let next = self
                    .spawner
                    .recycle(&mut self.world, &mut self.rng, &self.config);
                self.deferred.schedule(
                    self.clock.now(),
                    self.config.track.despawn_delay,
                    DeferredTask::DespawnSegment(segment),
                );
                debug!(left = ?segment, ?next, "segment recycled");
            }
            OverlapEvent::PickupTouched { pickup, by } => {
                resolve_pickup_contact(&mut self.world, &mut self.scoreboard, pickup, by);
            }
            OverlapEvent::HazardTouched { hazard, mover } => {
                match resolve_hazard_contact(&mut self.world, mover, hazard) {
                    ContactOutcome::HazardDestroyed => {
                        debug!(?hazard, "boost spent on hazard");
                    }
                    ContactOutcome::MoverKilled => {
                        info!(
                            run = self.run,
                            score = self.scoreboard.score(),
                            distance = self.scoreboard.distance(),
                            "mover died"
                        );
                        self.deferred.schedule(
                            self.clock.now(),
                            self.config.mover.restart_delay,
                            DeferredTask::RestartRun,
                        );
                    }
                    ContactOutcome::Ignored => {}
                }
            }
        }
    }

    fn run_due_tasks(&mut self) {
        for task in self.deferred.drain_due(self.clock.now()) {
            match task {
                DeferredTask::DespawnSegment(segment) => {
                    let removed = despawn_tree(&mut self.world, segment);
                    debug!(?segment, removed, "segment despawned");
                }
                DeferredTask::RestartRun => {
                    self.restart();
                    // Anything else due belonged to the old world.
                    break;
                }
            }
        }
    }

    fn restart(&mut self) {
        self.leaderboard.record(RunResult {
            run: self.run,
            distance: self.scoreboard.distance(),
        });
        self.deferred.clear();

        self.world = World::new();
        self.mover = spawn_mover(&mut self.world, &self.config.mover);
        self.spawner = SegmentSpawner::new(Vec3::ZERO, self.mover);
        self.spawner
            .prespawn(&mut self.world, &mut self.rng, &self.config);
        self.scoreboard = Scoreboard::new(self.config.score.distance_interval);
        self.run += 1;
        info!(run = self.run, "run restarted");
    }

    fn mover_alive(&self) -> bool {
        self.world
            .get::<&Mover>(self.mover)
            .is_ok_and(|m| m.alive)
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The tracked mover of the current run.
    pub fn mover(&self) -> Entity {
        self.mover
    }

    pub fn spawner(&self) -> &SegmentSpawner {
        &self.spawner
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn deferred(&self) -> &DeferredQueue {
        &self.deferred
    }

    /// Simulated seconds since the app started.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// 1 for the first run, incremented on every restart.
    pub fn run_number(&self) -> u32 {
        self.run
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            run: self.run,
            ticks: self.clock.ticks(),
            elapsed: self.clock.now(),
            score: self.scoreboard.score(),
            distance: self.scoreboard.distance(),
            alive: self.mover_alive(),
            segments: self.world.query::<&Segment>().iter().count(),
            hazards: self.world.query::<&Hazard>().iter().count(),
            agents: self.world.query::<&Agent>().iter().count(),
            leaderboard: self.leaderboard.entries().to_vec(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run: u32,
    pub ticks: u64,
    pub elapsed: f64,
    pub score: u32,
    pub distance: u32,
    pub alive: bool,
    pub segments: usize,
    pub hazards: usize,
    pub agents: usize,
    pub leaderboard: Vec<RunResult>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "run {} after {} ticks ({:.1}s): score {}, distance {}, {}",
            self.run,
            self.ticks,
            self.elapsed,
            self.score,
            self.distance,
            if self.alive { "alive" } else { "dead" }
        )?;
        writeln!(
            f,
            "live segments {}, hazards {}, agents {}",
            self.segments, self.hazards, self.agents
        )?;
        write!(f, "leaderboard:")?;
        if self.leaderboard.is_empty() {
            write!(f, " empty")?;
        }
        for (place, result) in self.leaderboard.iter().enumerate() {
            write!(f, "\n  {}. run {} distance {}", place + 1, result.run, result.distance)?;
        }
        Ok(())
    }
}
