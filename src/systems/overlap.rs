use hecs::{Entity, World};

use crate::components::{Aabb, Collider, Hazard, Mover, Pickup, Position, Segment};

/// Who touched a pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Toucher {
    Mover(Entity),
    Hazard(Entity),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlapEvent {
    /// The tracked mover stopped overlapping a segment it overlapped last tick.
    RegionExit { segment: Entity },
    PickupTouched { pickup: Entity, by: Toucher },
    HazardTouched { hazard: Entity, mover: Entity },
}

struct BoundsEntry {
    entity: Entity,
    bounds: Aabb,
}

/// Detect trigger overlaps between the mover, segment regions, pickups and
/// hazards. Segment occupancy flags are updated in place; everything else is
/// reported as events, in detection order, for the caller to resolve.
pub fn overlap_system(world: &mut World) -> Vec<OverlapEvent> {
    let mut movers: Vec<(BoundsEntry, bool)> = Vec::new();
    let mut hazards: Vec<BoundsEntry> = Vec::new();
    let mut pickups: Vec<BoundsEntry> = Vec::new();

    for (entity, (position, collider, mover, hazard, pickup)) in world
        .query::<(
            &Position,
            &Collider,
            Option<&Mover>,
            Option<&Hazard>,
            Option<&Pickup>,
        )>()
        .iter()
    {
        let bounds = collider.aabb(position.0);
        if let Some(mover) = mover {
            movers.push((BoundsEntry { entity, bounds }, mover.alive));
        }
        if hazard.is_some() {
            hazards.push(BoundsEntry { entity, bounds });
        }
        if pickup.is_some() {
            pickups.push(BoundsEntry { entity, bounds });
        }
    }
    let alive: Vec<&BoundsEntry> = movers
        .iter()
        .filter(|(_, alive)| *alive)
        .map(|(m, _)| m)
        .collect();

    let mut events = Vec::new();

    for (entity, (segment, position, collider)) in
        world.query_mut::<(&mut Segment, &Position, &Collider)>()
    {
        let region = collider.aabb(position.0);
        let inside = movers
            .iter()
            .any(|(m, _)| m.entity == segment.tracked && m.bounds.overlaps(&region));
        if segment.occupied && !inside && !segment.exited {
            segment.exited = true;
            events.push(OverlapEvent::RegionExit { segment: entity });
        }
        segment.occupied = inside;
    }

    for pickup in &pickups {
        let by_mover = alive.iter().find(|m| m.bounds.overlaps(&pickup.bounds));
        let by = match by_mover {
            Some(mover) => Some(Toucher::Mover(mover.entity)),
            None => hazards
                .iter()
                .find(|h| h.bounds.overlaps(&pickup.bounds))
                .map(|h| Toucher::Hazard(h.entity)),
        };
        if let Some(by) = by {
            events.push(OverlapEvent::PickupTouched {
                pickup: pickup.entity,
                by,
            });
        }
    }

    for mover in &alive {
        for hazard in &hazards {
            if hazard.bounds.overlaps(&mover.bounds) {
                events.push(OverlapEvent::HazardTouched {
                    hazard: hazard.entity,
                    mover: mover.entity,
                });
            }
        }
    }

    events
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::components::{HazardKind, PickupKind, SegmentAnchors, Solid, Tag, Trigger};

    fn boxed(half: f32) -> Collider {
        Collider::Box {
            half_extents: Vec3::splat(half),
        }
    }

    fn mover_at(world: &mut World, z: f32) -> Entity {
        world.spawn((
            Position(Vec3::new(0.0, 1.0, z)),
            boxed(0.4),
            Mover::new(9.0, 20.0, 0.1),
        ))
    }

    fn segment(world: &mut World, tracked: Entity) -> Entity {
        let origin = Vec3::ZERO;
        world.spawn((
            Segment {
                index: 0,
                content_code: 0,
                origin,
                anchors: SegmentAnchors::layout(origin, 10.0, 1.0, 5.0, [-3.3, 0.0, 3.3]),
                tracked,
                occupied: false,
                exited: false,
            },
            Position(Vec3::new(0.0, 1.0, 5.0)),
            Collider::Box {
                half_extents: Vec3::new(5.0, 1.0, 5.0),
            },
            Trigger,
        ))
    }

    fn set_z(world: &mut World, entity: Entity, z: f32) {
        world.get::<&mut Position>(entity).unwrap().0.z = z;
    }

    #[test]
    fn region_exit_fires_once_after_leaving() {
        let mut world = World::new();
        let mover = mover_at(&mut world, 2.0);
        let seg = segment(&mut world, mover);

        assert!(overlap_system(&mut world).is_empty());
        set_z(&mut world, mover, 9.0);
        assert!(overlap_system(&mut world).is_empty());
        set_z(&mut world, mover, 11.0);
        assert_eq!(
            overlap_system(&mut world),
            vec![OverlapEvent::RegionExit { segment: seg }]
        );
        set_z(&mut world, mover, 2.0);
        overlap_system(&mut world);
        set_z(&mut world, mover, 12.0);
        assert!(overlap_system(&mut world).is_empty());
    }

    #[test]
    fn segment_never_entered_never_exits() {
        let mut world = World::new();
        let mover = mover_at(&mut world, 30.0);
        segment(&mut world, mover);
        assert!(overlap_system(&mut world).is_empty());
    }

    #[test]
    fn pickup_reports_mover_before_hazard() {
        let mut world = World::new();
        let mover = mover_at(&mut world, 0.0);
        let coin = world.spawn((
            Position(Vec3::new(0.0, 1.0, 0.5)),
            boxed(0.3),
            Trigger,
            Pickup(PickupKind::Coin),
        ));
        let flower = world.spawn((
            Position(Vec3::new(0.0, 1.0, 0.8)),
            boxed(0.5),
            Hazard(HazardKind::Flower),
        ));

        let events = overlap_system(&mut world);
        assert_eq!(
            events,
            vec![
                OverlapEvent::PickupTouched {
                    pickup: coin,
                    by: Toucher::Mover(mover)
                },
                OverlapEvent::HazardTouched {
                    hazard: flower,
                    mover
                },
            ]
        );
    }

    #[test]
    fn colliders_without_hazard_leave_pickups_and_mover_alone() {
        let mut world = World::new();
        let mover = mover_at(&mut world, 5.0);
        world.spawn((
            Position(Vec3::new(3.3, 1.0, 5.0)),
            boxed(0.3),
            Trigger,
            Pickup(PickupKind::Boost),
        ));
        // Roaming agents are solid tagged boxes with no `Hazard`.
        world.spawn((
            Position(Vec3::new(3.3, 1.0, 5.2)),
            boxed(0.5),
            Solid,
            Tag::Agent,
        ));
        world.spawn((
            Position(Vec3::new(0.0, 1.0, 5.3)),
            boxed(0.5),
            Solid,
            Tag::Agent,
        ));
        assert!(overlap_system(&mut world).is_empty());
        assert!(world.get::<&Mover>(mover).unwrap().alive);
    }

    #[test]
    fn dead_mover_touches_nothing() {
        let mut world = World::new();
        let mover = mover_at(&mut world, 0.0);
        world.get::<&mut Mover>(mover).unwrap().die();
        world.spawn((
            Position(Vec3::new(0.0, 1.0, 0.5)),
            boxed(0.5),
            Hazard(HazardKind::Dog),
        ));
        assert!(overlap_system(&mut world).is_empty());
    }
}
