use glam::Vec3;
use hecs::Entity;

/// One of the three running lanes, left to right along +X.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    Left,
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; 3] = [Lane::Left, Lane::Center, Lane::Right];

    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }
}

/// Named anchor points of a segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorRole {
    /// Origin of the segment that follows this one.
    NextOrigin,
    SlotLow,
    SlotMid,
    SlotHigh,
}

impl AnchorRole {
    fn index(self) -> usize {
        match self {
            AnchorRole::NextOrigin => 0,
            AnchorRole::SlotLow => 1,
            AnchorRole::SlotMid => 2,
            AnchorRole::SlotHigh => 3,
        }
    }
}

/// The three content anchors, one per lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentSlot {
    Low,
    Mid,
    High,
}

impl ContentSlot {
    pub const ALL: [ContentSlot; 3] = [ContentSlot::Low, ContentSlot::Mid, ContentSlot::High];

    pub fn role(self) -> AnchorRole {
        match self {
            ContentSlot::Low => AnchorRole::SlotLow,
            ContentSlot::Mid => AnchorRole::SlotMid,
            ContentSlot::High => AnchorRole::SlotHigh,
        }
    }

    /// Lane an agent spawned on this slot starts in.
    pub fn lane(self) -> Lane {
        match self {
            ContentSlot::Low => Lane::Left,
            ContentSlot::Mid => Lane::Center,
            ContentSlot::High => Lane::Right,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentAnchors {
    points: [Vec3; 4],
}

impl SegmentAnchors {
    /// Anchors for a segment whose near edge is centered on `origin`.
    /// Content slots sit `slot_depth` into the segment, one per lane offset.
    pub fn layout(
        origin: Vec3,
        length: f32,
        anchor_height: f32,
        slot_depth: f32,
        lane_offsets: [f32; 3],
    ) -> Self {
        let slot = |x: f32| origin + Vec3::new(x, anchor_height, slot_depth);
        Self {
            points: [
                origin + Vec3::Z * length,
                slot(lane_offsets[0]),
                slot(lane_offsets[1]),
                slot(lane_offsets[2]),
            ],
        }
    }

    pub fn get(&self, role: AnchorRole) -> Vec3 {
        self.points[role.index()]
    }

    pub fn next_origin(&self) -> Vec3 {
        self.get(AnchorRole::NextOrigin)
    }

    pub fn slot(&self, slot: ContentSlot) -> Vec3 {
        self.get(slot.role())
    }
}

/// A fixed-length piece of track. The entity also carries a box
/// [`super::Collider`] and [`super::Trigger`] marking its region.
#[derive(Clone, Debug)]
pub struct Segment {
    /// Creation order within the current run.
    pub index: u64,
    pub content_code: u32,
    pub origin: Vec3,
    pub anchors: SegmentAnchors,
    /// Entity whose exit from the region recycles this segment.
    pub tracked: Entity,
    /// Whether the tracked entity overlapped the region last tick.
    pub occupied: bool,
    pub exited: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HazardKind {
    Flower,
    Dog,
    Bird,
}

/// Kills the mover on contact unless it is boosted, and removes any pickup
/// caught inside it. Roaming agents never carry one.
#[derive(Clone, Copy, Debug)]
pub struct Hazard(pub HazardKind);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickupKind {
    Coin,
    Boost,
}

#[derive(Clone, Copy, Debug)]
pub struct Pickup(pub PickupKind);
