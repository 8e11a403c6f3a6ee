use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Collider, Position, Solid, Tag};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RaycastHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec3,
    pub tag: Tag,
}

/// Spatial queries an agent needs from the world around it.
pub trait SpatialQuery: Send + Sync {
    /// Nearest blocking hit along `direction` within `max_distance`,
    /// ignoring `exclude` (usually the caster itself).
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<Entity>,
    ) -> Option<RaycastHit>;
}

struct ColliderEntry {
    entity: Entity,
    center: Vec3,
    collider: Collider,
    tag: Tag,
}

/// Snapshot of every [`Solid`] collider, taken once per tick so agents can
/// probe the world while their own components are mutably borrowed.
#[derive(Default)]
pub struct ObstacleField {
    entries: Vec<ColliderEntry>,
}

impl ObstacleField {
    pub fn gather(world: &World) -> Self {
        let entries = world
            .query::<(&Position, &Collider, Option<&Tag>)>()
            .with::<&Solid>()
            .iter()
            .map(|(entity, (position, collider, tag))| ColliderEntry {
                entity,
                center: position.0,
                collider: *collider,
                tag: tag.copied().unwrap_or(Tag::Untagged),
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SpatialQuery for ObstacleField {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<Entity>,
    ) -> Option<RaycastHit> {
        let dir = direction.normalize();
        let mut best: Option<RaycastHit> = None;

        for entry in &self.entries {
            if Some(entry.entity) == exclude {
                continue;
            }
            let t = match entry.collider {
                Collider::Box { half_extents } => {
                    ray_box_distance(origin, dir, entry.center, half_extents)
                }
                Collider::Sphere { radius } => ray_sphere_distance(origin, dir, entry.center, radius),
            };

            if let Some(t) = t {
                if t > 0.0 && t <= max_distance {
                    let is_closer = best.as_ref().map_or(true, |b| t < b.distance);
                    if is_closer {
                        best = Some(RaycastHit {
                            entity: entry.entity,
                            distance: t,
                            point: origin + dir * t,
                            tag: entry.tag,
                        });
                    }
                }
            }
        }

        best
    }
}

/// Distance to the first crossing of a sphere's surface in front of
/// `origin`. `dir` must be normalized.
fn ray_sphere_distance(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(dir);
    let miss_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if miss_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - miss_sq).sqrt();
    [along - half_chord, along + half_chord]
        .into_iter()
        .find(|&t| t > 0.0)
}

/// Slab test against an axis-aligned box. A ray starting inside reports
/// where it leaves.
fn ray_box_distance(origin: Vec3, dir: Vec3, center: Vec3, half_extents: Vec3) -> Option<f32> {
    let inv = dir.recip();
    let near = (center - half_extents - origin) * inv;
    let far = (center + half_extents - origin) * inv;
    let enter = near.min(far).max_element();
    let leave = near.max(far).min_element();
    if leave < 0.0 || enter > leave {
        None
    } else if enter < 0.0 {
        Some(leave)
    } else {
        Some(enter)
    }
}
