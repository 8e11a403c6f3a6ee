use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::score::RunResult;

/// Content template for one kind of spawned entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub name: String,
    /// Half-size of the box collider attached to the spawned entity.
    pub half_extents: Vec3,
    /// Fixed vertical offset applied to the anchor position.
    pub lift: f32,
    /// Whether agents treat this entity as an obstacle worth dodging.
    #[serde(default)]
    pub blocks_agents: bool,
}

impl Prefab {
    pub fn new(name: &str, half_extents: Vec3, lift: f32, blocks_agents: bool) -> Self {
        Self {
            name: name.to_owned(),
            half_extents,
            lift,
            blocks_agents,
        }
    }
}

/// Every template a segment may instantiate. Missing entries are tolerated
/// at load time and reported when a segment first needs them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrefabRegistry {
    pub bird: Option<Prefab>,
    pub dog: Option<Prefab>,
    pub enemy: Option<Prefab>,
    pub boost: Option<Prefab>,
    pub coin: Option<Prefab>,
    pub flowers: Vec<Prefab>,
}

impl Default for PrefabRegistry {
    fn default() -> Self {
        let flower = |name| Prefab::new(name, Vec3::splat(0.5), 0.0, true);
        Self {
            bird: Some(Prefab::new("bird", Vec3::splat(0.5), 1.3, false)),
            dog: Some(Prefab::new("dog", Vec3::new(0.5, 0.6, 0.9), -0.5, false)),
            enemy: Some(Prefab::new("enemy", Vec3::new(0.5, 0.75, 0.5), 0.0, false)),
            boost: Some(Prefab::new("boost", Vec3::splat(0.4), 0.0, false)),
            coin: Some(Prefab::new("coin", Vec3::splat(0.3), 0.0, false)),
            flowers: vec![flower("daisy"), flower("tulip"), flower("sunflower")],
        }
    }
}

/// Geometry of a track segment and the spawner's pacing rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackLayout {
    /// Length of one segment along +Z.
    pub segment_length: f32,
    pub segment_half_width: f32,
    /// Height of the segment's trigger region above the ground plane.
    pub region_height: f32,
    /// Height of the content anchors above the segment origin.
    pub anchor_height: f32,
    /// Distance of the content anchors from the segment's near edge.
    pub slot_depth: f32,
    /// Segments created eagerly when a run starts.
    pub run_ahead: u32,
    /// Leading segments forced to carry no hazards.
    pub safe_segments: u32,
    /// Exclusive upper bound of the content code drawn when recycling.
    pub recycle_code_range: u32,
    /// Delay between the mover leaving a segment and its removal.
    pub despawn_delay: f32,
}

impl Default for TrackLayout {
    fn default() -> Self {
        Self {
            segment_length: 10.0,
            segment_half_width: 5.0,
            region_height: 2.0,
            anchor_height: 1.0,
            slot_depth: 5.0,
            run_ahead: 30,
            safe_segments: 3,
            recycle_code_range: 5,
            despawn_delay: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupRules {
    pub coins_per_segment: u32,
    /// A boost spawns when a roll of `boost_roll_sides` lands on `boost_winning_face`.
    pub boost_roll_sides: u32,
    pub boost_winning_face: u32,
    /// Every sampled pickup point is snapped to this height.
    pub pickup_height: f32,
    pub max_placement_attempts: u32,
}

impl Default for PickupRules {
    fn default() -> Self {
        Self {
            coins_per_segment: 2,
            boost_roll_sides: 10,
            boost_winning_face: 4,
            pickup_height: 1.0,
            max_placement_attempts: 256,
        }
    }
}

/// Movement and sensing parameters shared by every lane-dodging agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentTuning {
    pub min_speed: f32,
    pub max_speed: f32,
    pub probe_length: f32,
    /// Lateral X offset of lanes 0, 1 and 2.
    pub lane_offsets: [f32; 3],
}

impl Default for AgentTuning {
    fn default() -> Self {
        Self {
            min_speed: 2.0,
            max_speed: 7.0,
            probe_length: 5.0,
            lane_offsets: [-3.3, 0.0, 3.3],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MoverTuning {
    pub start_position: Vec3,
    pub half_extents: Vec3,
    pub start_speed: f32,
    pub max_speed: f32,
    pub speed_gain_per_point: f32,
    /// Delay between the mover dying and the run restarting.
    pub restart_delay: f32,
}

impl Default for MoverTuning {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 1.0, 2.0),
            half_extents: Vec3::new(0.4, 1.0, 0.4),
            start_speed: 9.0,
            max_speed: 20.0,
            speed_gain_per_point: 0.1,
            restart_delay: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    /// Seconds between distance increments while the mover is alive.
    pub distance_interval: f32,
    /// Agents dropping below this height are counted as fallen.
    pub fallen_depth: f32,
    pub fallen_agent_bonus: u32,
    pub leaderboard_slots: usize,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            distance_interval: 0.1,
            fallen_depth: -2.0,
            fallen_agent_bonus: 5,
            leaderboard_slots: 3,
        }
    }
}

/// Static configuration for a run. Defaults reproduce the stock game tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Fixed simulation step in seconds.
    pub fixed_dt: f32,
    /// Optional RNG seed for reproducible runs.
    pub rng_seed: Option<u64>,
    pub track: TrackLayout,
    pub pickups: PickupRules,
    pub agent: AgentTuning,
    pub mover: MoverTuning,
    pub score: ScoreRules,
    pub prefabs: PrefabRegistry,
    /// Results from earlier sessions, loaded into the leaderboard at startup.
    pub history: Vec<RunResult>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            rng_seed: None,
            track: TrackLayout::default(),
            pickups: PickupRules::default(),
            agent: AgentTuning::default(),
            mover: MoverTuning::default(),
            score: ScoreRules::default(),
            prefabs: PrefabRegistry::default(),
            history: Vec::new(),
        }
    }
}

impl RunnerConfig {
    /// Read a JSON config file. Absent fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_dt > 0.0) {
            return Err(ConfigError::Invalid("fixed_dt must be positive"));
        }
        let track = &self.track;
        if !(track.segment_length > 0.0) || !(track.segment_half_width > 0.0) {
            return Err(ConfigError::Invalid("segment dimensions must be positive"));
        }
        if !(track.region_height > 0.0) {
            return Err(ConfigError::Invalid("region_height must be positive"));
        }
        if !(0.0..=track.segment_length).contains(&track.slot_depth) {
            return Err(ConfigError::Invalid("slot_depth must lie within the segment"));
        }
        if track.run_ahead == 0 {
            return Err(ConfigError::Invalid("run_ahead must be at least 1"));
        }
        if track.recycle_code_range == 0 {
            return Err(ConfigError::Invalid("recycle_code_range must be at least 1"));
        }
        if track.despawn_delay < 0.0 {
            return Err(ConfigError::Invalid("despawn_delay must not be negative"));
        }
        let pickups = &self.pickups;
        if pickups.boost_roll_sides == 0 || pickups.boost_winning_face >= pickups.boost_roll_sides
        {
            return Err(ConfigError::Invalid(
                "boost_winning_face must be a face of the boost roll",
            ));
        }
        let agent = &self.agent;
        if !(agent.min_speed >= 0.0) || !(agent.max_speed > agent.min_speed) {
            return Err(ConfigError::Invalid("agent speed range is empty"));
        }
        if !(agent.probe_length > 0.0) {
            return Err(ConfigError::Invalid("probe_length must be positive"));
        }
        if agent
            .lane_offsets
            .iter()
            .any(|x| x.abs() > track.segment_half_width)
        {
            return Err(ConfigError::Invalid("lane offsets must lie within the segment"));
        }
        if self.mover.restart_delay < 0.0 || !(self.score.distance_interval > 0.0) {
            return Err(ConfigError::Invalid("timer durations must be positive"));
        }
        if self.score.leaderboard_slots == 0 {
            return Err(ConfigError::Invalid("leaderboard needs at least one slot"));
        }
        Ok(())
    }
}
