mod placement;
mod prefabs;
mod segment;
mod spawner;

pub use placement::sample_valid_point;
pub use prefabs::{spawn_agent, spawn_hazard, spawn_mover, spawn_pickup, spawn_segment_region};
pub use segment::ContentKind;
pub use spawner::SegmentSpawner;
