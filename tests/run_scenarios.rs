use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use lane_runner::agent::Agent;
use lane_runner::components::{
    despawn_tree, Children, Hazard, HazardKind, Lane, Mover, Pickup, PickupKind, Position, Segment,
};
use lane_runner::engine::DeferredTask;
use lane_runner::score::RunResult;
use lane_runner::scene::{spawn_agent, spawn_hazard, spawn_pickup};
use lane_runner::{GameApp, RunnerConfig};

fn app_with(seed: u64, tweak: impl FnOnce(&mut RunnerConfig)) -> GameApp {
    let mut config = RunnerConfig::default();
    config.rng_seed = Some(seed);
    tweak(&mut config);
    GameApp::new(config).unwrap()
}

fn app(seed: u64) -> GameApp {
    app_with(seed, |_| {})
}

fn segments_by_index(world: &World) -> Vec<(Entity, Segment)> {
    let mut segments: Vec<(Entity, Segment)> = world
        .query::<&Segment>()
        .iter()
        .map(|(e, s)| (e, s.clone()))
        .collect();
    segments.sort_by_key(|(_, s)| s.index);
    segments
}

#[derive(Default, Debug)]
struct Content {
    hazards: usize,
    agents: Vec<Entity>,
    coins: usize,
    boosts: usize,
}

fn content_of(world: &World, segment: Entity) -> Content {
    let mut content = Content::default();
    let children = world
        .get::<&Children>(segment)
        .map(|c| c.0.clone())
        .unwrap_or_default();
    for child in children {
        if world.get::<&Agent>(child).is_ok() {
            content.agents.push(child);
        } else if world.get::<&Hazard>(child).is_ok() {
            content.hazards += 1;
        }
        match world.get::<&Pickup>(child).map(|p| p.0) {
            Ok(PickupKind::Coin) => content.coins += 1,
            Ok(PickupKind::Boost) => content.boosts += 1,
            Err(_) => {}
        }
    }
    content
}

/// Remove every pickup so a test controls exactly what the mover can touch.
fn clear_pickups(app: &mut GameApp) {
    let world = app.world_mut();
    let pickups: Vec<Entity> = world.query::<&Pickup>().iter().map(|(e, _)| e).collect();
    for pickup in pickups {
        despawn_tree(world, pickup);
    }
}

fn mover_position(app: &GameApp) -> Vec3 {
    app.world().get::<&Position>(app.mover()).unwrap().0
}

fn spawn_dog_ahead(app: &mut GameApp) -> Entity {
    let at = mover_position(app) + Vec3::Z * 0.5;
    let prefab = app.config().prefabs.dog.clone().unwrap();
    spawn_hazard(app.world_mut(), &prefab, HazardKind::Dog, at)
}

#[test]
fn startup_prespawns_thirty_segments_with_a_safe_start() {
    let mut boosts = 0;
    let mut total = 0;
    for seed in 0..40 {
        let app = app(seed);
        let world = app.world();
        let segments = segments_by_index(world);
        assert_eq!(segments.len(), 30);

        for (i, (entity, segment)) in segments.iter().enumerate() {
            assert_eq!(segment.origin, Vec3::new(0.0, 0.0, 10.0 * i as f32));
            let content = content_of(world, *entity);
            assert_eq!(content.coins, 2, "segment {i} coins");
            assert!(content.boosts <= 1);
            boosts += content.boosts;
            total += 1;

            let carried = content.hazards + content.agents.len();
            if i < 3 {
                assert_eq!(segment.content_code, 0);
                assert_eq!(carried, 0, "segment {i} must start hazard free");
            } else {
                assert_eq!(carried, 1, "segment {i} carries exactly one piece");
            }
        }

        // Index 3 is the first coded segment and 3 % 4 selects an enemy.
        let (seg3, segment3) = &segments[3];
        let content = content_of(world, *seg3);
        assert_eq!(content.agents.len(), 1);
        let enemy = content.agents[0];
        let lane = world.get::<&Agent>(enemy).unwrap().controller.lane();
        let position = world.get::<&Position>(enemy).unwrap().0;
        let offsets = app.config().agent.lane_offsets;
        assert_eq!(position.x, offsets[lane.index()]);
        assert_eq!(position.z, segment3.origin.z + app.config().track.slot_depth);
    }
    let ratio = boosts as f64 / total as f64;
    assert!((0.06..0.14).contains(&ratio), "boost ratio {ratio}");
}

#[test]
fn boosted_mover_destroys_hazard_and_loses_boost() {
    let mut app = app(7);
    clear_pickups(&mut app);
    let mover = app.mover();
    app.world_mut().get::<&mut Mover>(mover).unwrap().boost();
    let dog = spawn_dog_ahead(&mut app);

    app.step();

    assert!(!app.world().contains(dog));
    let (alive, boosted) = {
        let state = app.world().get::<&Mover>(mover).unwrap();
        (state.alive, state.is_boosted())
    };
    assert!(alive);
    assert!(!boosted);
    assert!(app
        .deferred()
        .iter()
        .all(|(_, task)| task != DeferredTask::RestartRun));
}

#[test]
fn unboosted_mover_dies_and_the_run_restarts_after_a_second() {
    let mut app = app(8);
    clear_pickups(&mut app);
    let mover = app.mover();
    let dog = spawn_dog_ahead(&mut app);

    app.step();
    let died_at = app.now();
    assert!(app.world().contains(dog));
    assert!(!app.world().get::<&Mover>(mover).unwrap().alive);
    let restarts: Vec<f64> = app
        .deferred()
        .iter()
        .filter(|(_, task)| *task == DeferredTask::RestartRun)
        .map(|(due, _)| due)
        .collect();
    assert_eq!(restarts.len(), 1);
    assert!((restarts[0] - (died_at + 1.0)).abs() < 1e-6);

    // A dead mover neither moves nor dies twice.
    let frozen = mover_position(&app);
    app.run(58);
    assert_eq!(app.run_number(), 1);
    assert_eq!(mover_position(&app), frozen);
    assert!(app.leaderboard().entries().is_empty());

    app.run(4);
    assert_eq!(app.run_number(), 2);
    assert_eq!(app.leaderboard().entries().len(), 1);
    assert_eq!(app.leaderboard().entries()[0].run, 1);

    let fresh = app.mover();
    assert!(app.world().get::<&Mover>(fresh).unwrap().alive);
    assert_eq!(segments_by_index(app.world()).len(), 30);
}

#[test]
fn mover_passes_through_enemy_agents() {
    let mut app = app(13);
    clear_pickups(&mut app);
    let mover = app.mover();
    let prefab = app.config().prefabs.enemy.clone().unwrap();
    let tuning = app.config().agent;
    let at = mover_position(&app) + Vec3::Z * 0.5 - Vec3::Y * prefab.lift;
    let enemy = spawn_agent(
        app.world_mut(),
        &prefab,
        at,
        Lane::Center,
        tuning,
        SmallRng::seed_from_u64(3),
    );
    assert!(app.world().get::<&Hazard>(enemy).is_err());

    for _ in 0..3 {
        app.step();
    }

    assert!(app.world().contains(enemy));
    let state = app.world().get::<&Mover>(mover).unwrap();
    assert!(state.alive);
    assert!(!state.is_boosted());
    drop(state);
    assert!(app
        .deferred()
        .iter()
        .all(|(_, task)| task != DeferredTask::RestartRun));
}

#[test]
fn coins_score_for_the_mover_but_not_for_hazards() {
    let mut app = app(9);
    clear_pickups(&mut app);
    let coin_prefab = app.config().prefabs.coin.clone().unwrap();
    let flower_prefab = app.config().prefabs.flowers[0].clone();

    let at_mover = mover_position(&app) + Vec3::Z * 0.4;
    let taken = spawn_pickup(app.world_mut(), &coin_prefab, PickupKind::Coin, at_mover);

    let in_flower = Vec3::new(3.3, 1.0, 25.0);
    spawn_hazard(app.world_mut(), &flower_prefab, HazardKind::Flower, in_flower);
    let crushed = spawn_pickup(app.world_mut(), &coin_prefab, PickupKind::Coin, in_flower);

    app.step();

    assert!(!app.world().contains(taken));
    assert!(!app.world().contains(crushed));
    assert_eq!(app.scoreboard().score(), 1);
}

#[test]
fn leaving_a_segment_recycles_it_after_a_delay() {
    // Hazard-free track so nothing interrupts the run.
    let mut app = app_with(10, |config| config.track.safe_segments = 30);
    let (first, _) = segments_by_index(app.world())[0].clone();
    let first_children = app
        .world()
        .get::<&Children>(first)
        .map(|c| c.0.clone())
        .unwrap_or_default();

    let mut ticks = 0;
    while app.spawner().spawned() == 30 {
        app.step();
        ticks += 1;
        assert!(ticks < 120, "mover never left the first segment");
    }
    let exited_at = app.now();
    let segments = segments_by_index(app.world());
    let (_, newest) = segments.last().unwrap();
    assert_eq!(newest.index, 30);
    assert_eq!(newest.origin.z, 300.0);
    assert!(app.world().contains(first));

    while app.world().contains(first) {
        app.step();
        assert!(app.now() - exited_at < 2.1, "segment outlived its delay");
    }
    assert!(app.now() - exited_at >= 2.0 - 1e-6);
    for child in first_children {
        assert!(!app.world().contains(child));
    }
    assert!(app.scoreboard().distance() >= 25);
}

#[test]
fn fallen_agents_award_a_bonus() {
    let mut app = app_with(11, |config| config.track.safe_segments = 30);
    clear_pickups(&mut app);
    let prefab = app.config().prefabs.enemy.clone().unwrap();
    let tuning = app.config().agent;
    // Past the far end of the chain: nothing holds it up.
    let agent = spawn_agent(
        app.world_mut(),
        &prefab,
        Vec3::new(0.0, 1.0, 400.0),
        Lane::Center,
        tuning,
        SmallRng::seed_from_u64(1),
    );

    for _ in 0..120 {
        app.step();
        if !app.world().contains(agent) {
            break;
        }
    }
    assert!(!app.world().contains(agent));
    assert_eq!(app.scoreboard().score(), 5);
}

#[test]
fn stored_history_seeds_the_leaderboard() {
    let mut app = app_with(14, |config| {
        config.history = (1..=5)
            .map(|run| RunResult {
                run,
                distance: run * 10,
            })
            .collect();
    });
    let kept: Vec<u32> = app.leaderboard().entries().iter().map(|r| r.run).collect();
    assert_eq!(kept, vec![5, 4, 3]);

    // A fresh death that falls short of the stored results does not place.
    clear_pickups(&mut app);
    spawn_dog_ahead(&mut app);
    app.run(65);
    assert_eq!(app.run_number(), 2);
    let kept: Vec<u32> = app.leaderboard().entries().iter().map(|r| r.run).collect();
    assert_eq!(kept, vec![5, 4, 3]);
}

#[test]
fn same_seed_same_run() {
    let mut a = app(12);
    let mut b = app(12);
    a.run(600);
    b.run(600);
    let (a, b) = (a.summary(), b.summary());
    assert_eq!(
        (a.run, a.score, a.distance, a.alive, a.segments, a.hazards, a.agents),
        (b.run, b.score, b.distance, b.alive, b.segments, b.hazards, b.agents)
    );
}
