use glam::Vec3;
use rand::Rng;
use tracing::warn;

use crate::components::Collider;
use crate::error::SpawnError;

/// Draw a point uniformly inside `region` (centered at `center`) by sampling
/// its bounding box and rejecting points that fall outside the actual shape.
/// The accepted point is returned with its Y replaced by `height`.
pub fn sample_valid_point<R: Rng + ?Sized>(
    rng: &mut R,
    region: &Collider,
    center: Vec3,
    height: f32,
    max_attempts: u32,
) -> Result<Vec3, SpawnError> {
    let bounds = region.aabb(center);
    for _ in 0..max_attempts {
        let candidate = Vec3::new(
            rng.random_range(bounds.min.x..=bounds.max.x),
            rng.random_range(bounds.min.y..=bounds.max.y),
            rng.random_range(bounds.min.z..=bounds.max.z),
        );
        if region.contains(center, candidate) {
            return Ok(Vec3::new(candidate.x, height, candidate.z));
        }
    }
    warn!(attempts = max_attempts, "placement sampling gave up");
    Err(SpawnError::PlacementExhausted {
        attempts: max_attempts,
    })
}
