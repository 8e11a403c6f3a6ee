use glam::Vec3;

/// Collision shape attached to an entity, centered on its [`super::Position`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Collider {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Collider {
    /// World-space axis-aligned bounds of this shape placed at `center`.
    pub fn aabb(&self, center: Vec3) -> Aabb {
        let half = match *self {
            Collider::Box { half_extents } => half_extents,
            Collider::Sphere { radius } => Vec3::splat(radius),
        };
        Aabb::from_center(center, half)
    }

    /// Nearest point on or inside the shape to `point`.
    /// Points already inside the shape are returned unchanged.
    pub fn closest_point(&self, center: Vec3, point: Vec3) -> Vec3 {
        match *self {
            Collider::Box { half_extents } => {
                point.clamp(center - half_extents, center + half_extents)
            }
            Collider::Sphere { radius } => clamp_to_ball(center, radius, point),
        }
    }

    pub fn contains(&self, center: Vec3, point: Vec3) -> bool {
        self.closest_point(center, point) == point
    }
}

fn clamp_to_ball(center: Vec3, radius: f32, point: Vec3) -> Vec3 {
    let offset = point - center;
    if offset.length_squared() <= radius * radius {
        point
    } else {
        center + offset.normalize_or_zero() * radius
    }
}

/// Axis-aligned box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Touching boxes count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    pub fn contains_xz(&self, point: Vec3) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.z..=self.max.z).contains(&point.z)
    }
}

/// Marker: entity blocks forward probes.
pub struct Solid;

/// Marker: entity only reports overlaps and never blocks probes.
pub struct Trigger;

/// Label consulted by probes to decide what a hit means.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    Obstacle,
    Agent,
    Untagged,
}
