use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::SmallRng;

use crate::agent::{Agent, DirectionController, ProbeVolume};
use crate::components::*;
use crate::config::{AgentTuning, MoverTuning, Prefab, TrackLayout};

// ---------------------------------------------------------------------------
// Public prefab factories
// ---------------------------------------------------------------------------

/// The tracked mover: a solid untagged box that runs down the center lane.
pub fn spawn_mover(world: &mut World, tuning: &MoverTuning) -> Entity {
    world.spawn((
        Position(tuning.start_position),
        Collider::Box {
            half_extents: tuning.half_extents,
        },
        Solid,
        Tag::Untagged,
        Mover::new(tuning.start_speed, tuning.max_speed, tuning.speed_gain_per_point),
    ))
}

/// A segment entity: its trigger region covers the full length of track
/// starting at `origin`, from the ground up to `region_height`.
pub fn spawn_segment_region(
    world: &mut World,
    layout: &TrackLayout,
    lane_offsets: [f32; 3],
    index: u64,
    content_code: u32,
    origin: Vec3,
    tracked: Entity,
) -> Entity {
    let half_extents = Vec3::new(
        layout.segment_half_width,
        layout.region_height / 2.0,
        layout.segment_length / 2.0,
    );
    let anchors = SegmentAnchors::layout(
        origin,
        layout.segment_length,
        layout.anchor_height,
        layout.slot_depth,
        lane_offsets,
    );
    world.spawn((
        Position(origin + Vec3::new(0.0, half_extents.y, half_extents.z)),
        Collider::Box { half_extents },
        Trigger,
        Segment {
            index,
            content_code,
            origin,
            anchors,
            tracked,
            occupied: false,
            exited: false,
        },
    ))
}

/// A static hazard sitting at `anchor`, raised by the prefab's lift.
pub fn spawn_hazard(world: &mut World, prefab: &Prefab, kind: HazardKind, anchor: Vec3) -> Entity {
    let tag = if prefab.blocks_agents {
        Tag::Obstacle
    } else {
        Tag::Untagged
    };
    world.spawn((
        Position(anchor + Vec3::Y * prefab.lift),
        Collider::Box {
            half_extents: prefab.half_extents,
        },
        Solid,
        tag,
        Hazard(kind),
    ))
}

pub fn spawn_pickup(world: &mut World, prefab: &Prefab, kind: PickupKind, at: Vec3) -> Entity {
    world.spawn((
        Position(at),
        Collider::Box {
            half_extents: prefab.half_extents,
        },
        Trigger,
        Pickup(kind),
    ))
}

/// A lane-dodging enemy placed in `lane`. It is not a `Hazard`: the mover
/// runs through it and pickups ignore it. Its controller is initialized
/// before the entity is returned, so the first tick already probes from the
/// right lane.
pub fn spawn_agent(
    world: &mut World,
    prefab: &Prefab,
    anchor: Vec3,
    lane: Lane,
    tuning: AgentTuning,
    rng: SmallRng,
) -> Entity {
    let entity = world.spawn((
        Collider::Box {
            half_extents: prefab.half_extents,
        },
        Solid,
        Tag::Agent,
    ));

    let mut controller = DirectionController::new(tuning, rng);
    controller.initialize_position(
        anchor + Vec3::Y * prefab.lift,
        lane,
        ProbeVolume {
            owner: entity,
            center_height: 0.0,
        },
    );
    let start = controller.position();
    // The entity was spawned just above and nothing else touches it yet.
    let _ = world.insert(entity, (Position(start), Agent::new(controller)));

    entity
}
