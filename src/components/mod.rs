mod character;
mod physics;
mod track;

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};

pub use character::Mover;
pub use physics::{Aabb, Collider, Solid, Tag, Trigger};
pub use track::{
    AnchorRole, ContentSlot, Hazard, HazardKind, Lane, Pickup, PickupKind, Segment,
    SegmentAnchors,
};

/// World-space position of an entity. For collider-bearing entities this is
/// also the collider center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position(pub Vec3);

/// Points to the entity whose lifetime this entity is bound to.
pub struct Parent(pub Entity);

/// Entities despawned together with this one.
pub struct Children(pub Vec<Entity>);

/// Attach `child` under `parent` so it is removed along with it.
pub fn add_child(world: &mut World, parent: Entity, child: Entity) {
    let has_children = world.get::<&Children>(parent).is_ok();
    if has_children {
        if let Ok(mut children) = world.get::<&mut Children>(parent) {
            if !children.0.contains(&child) {
                children.0.push(child);
            }
        }
    } else {
        let _ = world.insert_one(parent, Children(vec![child]));
    }

    let _ = world.insert_one(child, Parent(parent));
}

/// Detach `child` from `parent` in the hierarchy.
pub fn remove_child(world: &mut World, parent: Entity, child: Entity) {
    if let Ok(mut children) = world.get::<&mut Children>(parent) {
        children.0.retain(|&e| e != child);
    }
    let _ = world.remove_one::<Parent>(child);
}

/// Despawn `root` and everything below it. Detaches `root` from its own
/// parent first so no stale handle is left behind.
/// Returns the number of entities removed.
pub fn despawn_tree(world: &mut World, root: Entity) -> usize {
    let parent = world.get::<&Parent>(root).map(|p| p.0).ok();
    if let Some(parent) = parent {
        remove_child(world, parent, root);
    }

    let mut queue = VecDeque::from([root]);
    let mut doomed = Vec::new();
    while let Some(entity) = queue.pop_front() {
        if let Ok(children) = world.get::<&Children>(entity) {
            queue.extend(children.0.iter().copied());
        }
        doomed.push(entity);
    }

    doomed
        .into_iter()
        .filter(|&entity| world.despawn(entity).is_ok())
        .count()
}
