use std::sync::Arc;

use hecs::{Entity, World};

use crate::agent::Agent;
use crate::components::{Aabb, Collider, Position, Segment};
use crate::systems::{ObstacleField, SpatialQuery};

const GRAVITY: f32 = 9.81;

/// Tick every agent's behaviour machine against a snapshot of this tick's
/// solid colliders, then drop agents that have run off the track.
///
/// Returns the agents that sank below `fallen_depth`; the caller decides what
/// to award and despawns them.
pub fn agent_system(world: &mut World, dt: f32, fallen_depth: f32) -> Vec<Entity> {
    let field: Arc<dyn SpatialQuery> = Arc::new(ObstacleField::gather(world));

    // Collect first: the agent query below borrows the world mutably.
    let footprints: Vec<Aabb> = world
        .query::<(&Position, &Collider)>()
        .with::<&Segment>()
        .iter()
        .map(|(_, (position, collider))| collider.aabb(position.0))
        .collect();

    let mut fallen = Vec::new();
    for (entity, (agent, position)) in world.query_mut::<(&mut Agent, &mut Position)>() {
        agent.controller.prepare(position.0, dt, Arc::clone(&field));
        agent.tick();
        position.0 = agent.controller.position();

        let supported = footprints.iter().any(|f| f.contains_xz(position.0));
        if supported {
            agent.fall_speed = 0.0;
        } else {
            agent.fall_speed += GRAVITY * dt;
            position.0.y -= agent.fall_speed * dt;
        }

        if position.0.y < fallen_depth {
            fallen.push(entity);
        }
    }
    fallen
}
