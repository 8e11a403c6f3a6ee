use std::sync::Arc;

use glam::Vec3;
use hecs::Entity;
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::{Lane, Tag};
use crate::config::AgentTuning;
use crate::systems::{ObstacleField, SpatialQuery};

/// Body data the forward probe is cast from.
#[derive(Clone, Copy, Debug)]
pub struct ProbeVolume {
    /// Entity owning the collider; never reported as its own obstacle.
    pub owner: Entity,
    /// Height of the collider's center above the agent position.
    pub center_height: f32,
}

/// Per-agent lane state and forward motion.
///
/// Also serves as the context of the agent's behaviour state machine: guards
/// and states only ever talk to the controller. The agent system copies the
/// entity position in before a tick and back out after it.
pub struct DirectionController {
    lane: Lane,
    position: Vec3,
    volume: Option<ProbeVolume>,
    surroundings: Arc<dyn SpatialQuery>,
    dt: f32,
    tuning: AgentTuning,
    rng: SmallRng,
}

impl DirectionController {
    pub fn new(tuning: AgentTuning, rng: SmallRng) -> Self {
        Self {
            lane: Lane::Center,
            position: Vec3::ZERO,
            volume: None,
            surroundings: Arc::new(ObstacleField::default()),
            dt: 0.0,
            tuning,
            rng,
        }
    }

    /// Place the agent in `lane`, snapping its X to the lane offset, and
    /// remember the collider probes are cast from.
    pub fn initialize_position(&mut self, position: Vec3, lane: Lane, volume: ProbeVolume) {
        self.lane = lane;
        self.position = Vec3::new(self.lane_x(), position.y, position.z);
        self.volume = Some(volume);
    }

    /// Load the per-tick inputs: where the entity is, how long the tick is,
    /// and what the world looks like this tick.
    pub fn prepare(&mut self, position: Vec3, dt: f32, surroundings: Arc<dyn SpatialQuery>) {
        self.position = position;
        self.dt = dt;
        self.surroundings = surroundings;
    }

    pub fn lane(&self) -> Lane {
        self.lane
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Advance along +Z at a speed drawn afresh on every call.
    pub fn move_forward(&mut self) {
        let speed = self
            .rng
            .random_range(self.tuning.min_speed..self.tuning.max_speed);
        self.position.z += speed * self.dt;
    }

    /// Side lanes dodge into the center; the center dodges to either side
    /// with equal odds.
    pub fn change_lane(&mut self) {
        self.lane = match self.lane {
            Lane::Left | Lane::Right => Lane::Center,
            Lane::Center => {
                if self.rng.random_bool(0.5) {
                    Lane::Left
                } else {
                    Lane::Right
                }
            }
        };
        self.position.x = self.lane_x();
    }

    /// Whether the nearest solid collider within probe range straight ahead
    /// is tagged as an obstacle.
    ///
    /// # Panics
    /// If called before [`Self::initialize_position`].
    pub fn is_obstacle_ahead(&self) -> bool {
        let Some(volume) = self.volume else {
            panic!("DirectionController probed before initialize_position");
        };
        let origin = self.position + Vec3::Y * volume.center_height;
        self.surroundings
            .raycast(origin, Vec3::Z, self.tuning.probe_length, Some(volume.owner))
            .is_some_and(|hit| hit.tag == Tag::Obstacle)
    }

    fn lane_x(&self) -> f32 {
        self.tuning.lane_offsets[self.lane.index()]
    }
}
