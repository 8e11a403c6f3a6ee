mod agents;
mod mover;
mod overlap;
mod raycast;

pub use agents::agent_system;
pub use mover::{
    award_points, mover_system, resolve_hazard_contact, resolve_pickup_contact, ContactOutcome,
};
pub use overlap::{overlap_system, OverlapEvent, Toucher};
pub use raycast::{ObstacleField, RaycastHit, SpatialQuery};
