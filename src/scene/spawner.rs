use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::Rng;
use tracing::debug;

use crate::components::Segment;
use crate::config::RunnerConfig;
use crate::scene::prefabs::spawn_segment_region;
use crate::scene::segment::SegmentBuilder;

/// Chains segments end to end. The only state carried between segments is
/// the origin the next one will be placed at.
pub struct SegmentSpawner {
    next_origin: Vec3,
    spawned: u64,
    tracked: Entity,
}

impl SegmentSpawner {
    pub fn new(origin: Vec3, tracked: Entity) -> Self {
        Self {
            next_origin: origin,
            spawned: 0,
            tracked,
        }
    }

    pub fn next_origin(&self) -> Vec3 {
        self.next_origin
    }

    /// Segments created so far in this run.
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Create a segment at the next origin, advance the origin to the new
    /// segment's far end, then fill it according to `content_code`.
    pub fn spawn_segment(
        &mut self,
        world: &mut World,
        rng: &mut SmallRng,
        config: &RunnerConfig,
        content_code: u32,
    ) -> Entity {
        let index = self.spawned;
        let segment = spawn_segment_region(
            world,
            &config.track,
            config.agent.lane_offsets,
            index,
            content_code,
            self.next_origin,
            self.tracked,
        );
        if let Ok(seg) = world.get::<&Segment>(segment) {
            self.next_origin = seg.anchors.next_origin();
        }
        self.spawned += 1;
        debug!(?segment, index, code = content_code, "segment spawned");

        SegmentBuilder::new(world, rng, config, segment).populate(content_code);
        segment
    }

    /// Eagerly build the run-ahead. The leading safe segments carry no
    /// hazards; the rest use their index as the content code.
    pub fn prespawn(
        &mut self,
        world: &mut World,
        rng: &mut SmallRng,
        config: &RunnerConfig,
    ) -> Vec<Entity> {
        let track = &config.track;
        (0..track.run_ahead)
            .map(|i| {
                let code = if i < track.safe_segments { 0 } else { i };
                self.spawn_segment(world, rng, config, code)
            })
            .collect()
    }

    /// Replace a segment the mover has left with one at the far end of the
    /// chain, using a fresh random content code.
    pub fn recycle(&mut self, world: &mut World, rng: &mut SmallRng, config: &RunnerConfig) -> Entity {
        let code = rng.random_range(0..config.track.recycle_code_range);
        self.spawn_segment(world, rng, config, code)
    }
}
