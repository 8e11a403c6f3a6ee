use hecs::{Entity, World};
use tracing::info;

use crate::components::{despawn_tree, Mover, Pickup, PickupKind, Position};
use crate::score::Scoreboard;
use crate::systems::Toucher;

/// Advance every living mover along +Z at its current speed.
pub fn mover_system(world: &mut World, dt: f32) {
    for (_entity, (position, mover)) in world.query_mut::<(&mut Position, &Mover)>() {
        if mover.alive {
            position.0.z += mover.speed * dt;
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactOutcome {
    /// The mover spent its boost and the hazard was destroyed.
    HazardDestroyed,
    /// The mover was alive and unboosted; it is now dead.
    MoverKilled,
    /// Nothing happened: mover already dead, or either entity is gone.
    Ignored,
}

/// Resolve a hazard touching the mover. A boost absorbs exactly one hit.
pub fn resolve_hazard_contact(world: &mut World, mover: Entity, hazard: Entity) -> ContactOutcome {
    if !world.contains(hazard) {
        return ContactOutcome::Ignored;
    }
    let outcome = match world.get::<&mut Mover>(mover) {
        Ok(mut m) => {
            if m.alive && m.is_boosted() {
                m.deboost();
                ContactOutcome::HazardDestroyed
            } else if m.die() {
                ContactOutcome::MoverKilled
            } else {
                ContactOutcome::Ignored
            }
        }
        Err(_) => ContactOutcome::Ignored,
    };
    if outcome == ContactOutcome::HazardDestroyed {
        despawn_tree(world, hazard);
    }
    outcome
}

/// Add points to the score and speed the mover up accordingly.
pub fn award_points(world: &mut World, scoreboard: &mut Scoreboard, mover: Entity, points: u32) {
    scoreboard.increment_score(points);
    if let Ok(mut m) = world.get::<&mut Mover>(mover) {
        m.increase_speed(points);
    }
}

/// Apply a pickup's effect if the mover touched it, then remove it either way.
/// Returns the kind of pickup that was consumed.
pub fn resolve_pickup_contact(
    world: &mut World,
    scoreboard: &mut Scoreboard,
    pickup: Entity,
    by: Toucher,
) -> Option<PickupKind> {
    let kind = world.get::<&Pickup>(pickup).map(|p| p.0).ok()?;
    if let Toucher::Mover(mover) = by {
        match kind {
            PickupKind::Coin => award_points(world, scoreboard, mover, 1),
            PickupKind::Boost => {
                if let Ok(mut m) = world.get::<&mut Mover>(mover) {
                    m.boost();
                    info!(score = scoreboard.score(), "mover boosted");
                }
            }
        }
    }
    despawn_tree(world, pickup);
    Some(kind)
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::components::{Hazard, HazardKind};

    fn mover(world: &mut World) -> Entity {
        world.spawn((Position(Vec3::new(0.0, 1.0, 0.0)), Mover::new(9.0, 20.0, 0.1)))
    }

    #[test]
    fn dead_movers_stay_put() {
        let mut world = World::new();
        let runner = mover(&mut world);
        mover_system(&mut world, 0.5);
        assert_eq!(world.get::<&Position>(runner).unwrap().0.z, 4.5);
        world.get::<&mut Mover>(runner).unwrap().die();
        mover_system(&mut world, 0.5);
        assert_eq!(world.get::<&Position>(runner).unwrap().0.z, 4.5);
    }

    #[test]
    fn boost_absorbs_one_hazard() {
        let mut world = World::new();
        let runner = mover(&mut world);
        let first = world.spawn((Hazard(HazardKind::Dog),));
        let second = world.spawn((Hazard(HazardKind::Bird),));
        world.get::<&mut Mover>(runner).unwrap().boost();

        assert_eq!(
            resolve_hazard_contact(&mut world, runner, first),
            ContactOutcome::HazardDestroyed
        );
        assert!(!world.contains(first));
        assert_eq!(
            resolve_hazard_contact(&mut world, runner, second),
            ContactOutcome::MoverKilled
        );
        assert!(world.contains(second));
        assert_eq!(
            resolve_hazard_contact(&mut world, runner, second),
            ContactOutcome::Ignored
        );
    }

    #[test]
    fn coin_scores_only_for_the_mover() {
        let mut world = World::new();
        let runner = mover(&mut world);
        let mut scoreboard = Scoreboard::new(0.1);
        let hazard = world.spawn((Hazard(HazardKind::Flower),));
        let coin_a = world.spawn((Pickup(PickupKind::Coin),));
        let coin_b = world.spawn((Pickup(PickupKind::Coin),));

        resolve_pickup_contact(&mut world, &mut scoreboard, coin_a, Toucher::Mover(runner));
        resolve_pickup_contact(&mut world, &mut scoreboard, coin_b, Toucher::Hazard(hazard));

        assert_eq!(scoreboard.score(), 1);
        assert!(!world.contains(coin_a));
        assert!(!world.contains(coin_b));
        assert!((world.get::<&Mover>(runner).unwrap().speed - 9.1).abs() < 1e-5);
    }
}
