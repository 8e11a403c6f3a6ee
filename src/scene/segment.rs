use glam::Vec3;
use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, warn};

use crate::components::{
    add_child, Collider, ContentSlot, HazardKind, PickupKind, Position, Segment, SegmentAnchors,
};
use crate::config::{Prefab, RunnerConfig};
use crate::error::SpawnError;
use crate::scene::placement::sample_valid_point;
use crate::scene::prefabs::{spawn_agent, spawn_hazard, spawn_pickup};

/// Hazard or agent content a segment can carry besides pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Flowers,
    Dogs,
    Birds,
    Enemy,
}

impl ContentKind {
    /// `0` means no content; anything else is picked by `code % 4`.
    pub fn for_code(code: u32) -> Option<ContentKind> {
        if code == 0 {
            return None;
        }
        Some(match code % 4 {
            0 => ContentKind::Flowers,
            1 => ContentKind::Dogs,
            2 => ContentKind::Birds,
            _ => ContentKind::Enemy,
        })
    }
}

/// Populates one freshly created segment. Everything spawned here is attached
/// under the segment so it is removed along with it.
pub(crate) struct SegmentBuilder<'a> {
    world: &'a mut World,
    rng: &'a mut SmallRng,
    config: &'a RunnerConfig,
    segment: Entity,
}

impl<'a> SegmentBuilder<'a> {
    pub(crate) fn new(
        world: &'a mut World,
        rng: &'a mut SmallRng,
        config: &'a RunnerConfig,
        segment: Entity,
    ) -> Self {
        Self {
            world,
            rng,
            config,
            segment,
        }
    }

    /// Spawn the content selected by `code`, then the pickups. A piece that
    /// fails to spawn is logged and skipped; the rest still goes ahead.
    pub(crate) fn populate(&mut self, code: u32) {
        if let Some(kind) = ContentKind::for_code(code) {
            let spawned = match kind {
                ContentKind::Flowers => self.spawn_flowers(),
                ContentKind::Dogs => self.spawn_dogs(),
                ContentKind::Birds => self.spawn_birds(),
                ContentKind::Enemy => self.spawn_enemies(),
            };
            match spawned {
                Ok(entity) => debug!(segment = ?self.segment, ?kind, content = ?entity, "content spawned"),
                Err(err) => self.report(&err),
            }
        }
        if let Err(err) = self.spawn_coins() {
            self.report(&err);
        }
        if let Err(err) = self.spawn_boost() {
            self.report(&err);
        }
    }

    pub(crate) fn spawn_flowers(&mut self) -> Result<Entity, SpawnError> {
        let config = self.config;
        let flowers = &config.prefabs.flowers;
        if flowers.is_empty() {
            return Err(SpawnError::NoFlowerVariants);
        }
        let prefab = &flowers[self.rng.random_range(0..flowers.len())];
        self.spawn_static(prefab, HazardKind::Flower)
    }

    pub(crate) fn spawn_dogs(&mut self) -> Result<Entity, SpawnError> {
        let config = self.config;
        let prefab = required(&config.prefabs.dog, "dog")?;
        self.spawn_static(prefab, HazardKind::Dog)
    }

    pub(crate) fn spawn_birds(&mut self) -> Result<Entity, SpawnError> {
        let config = self.config;
        let prefab = required(&config.prefabs.bird, "bird")?;
        self.spawn_static(prefab, HazardKind::Bird)
    }

    /// The enemy's lane is the lane of the slot it was spawned in.
    pub(crate) fn spawn_enemies(&mut self) -> Result<Entity, SpawnError> {
        let config = self.config;
        let prefab = required(&config.prefabs.enemy, "enemy")?;
        let anchors = self.anchors()?;
        let slot = self.pick_slot();
        let rng = SmallRng::seed_from_u64(self.rng.random());
        let enemy = spawn_agent(
            self.world,
            prefab,
            anchors.slot(slot),
            slot.lane(),
            config.agent,
            rng,
        );
        add_child(self.world, self.segment, enemy);
        Ok(enemy)
    }

    /// Exactly `coins_per_segment` coins at sampled points inside the region.
    pub(crate) fn spawn_coins(&mut self) -> Result<Vec<Entity>, SpawnError> {
        let config = self.config;
        let prefab = required(&config.prefabs.coin, "coin")?;
        let mut coins = Vec::with_capacity(config.pickups.coins_per_segment as usize);
        for _ in 0..config.pickups.coins_per_segment {
            let at = self.sample_point()?;
            let coin = spawn_pickup(self.world, prefab, PickupKind::Coin, at);
            add_child(self.world, self.segment, coin);
            coins.push(coin);
        }
        Ok(coins)
    }

    /// At most one boost, on a single winning face of the roll.
    pub(crate) fn spawn_boost(&mut self) -> Result<Option<Entity>, SpawnError> {
        let config = self.config;
        let rules = &config.pickups;
        if self.rng.random_range(0..rules.boost_roll_sides) != rules.boost_winning_face {
            return Ok(None);
        }
        let prefab = required(&config.prefabs.boost, "boost")?;
        let at = self.sample_point()?;
        let boost = spawn_pickup(self.world, prefab, PickupKind::Boost, at);
        add_child(self.world, self.segment, boost);
        Ok(Some(boost))
    }

    fn spawn_static(&mut self, prefab: &Prefab, kind: HazardKind) -> Result<Entity, SpawnError> {
        let anchors = self.anchors()?;
        let slot = self.pick_slot();
        let hazard = spawn_hazard(self.world, prefab, kind, anchors.slot(slot));
        add_child(self.world, self.segment, hazard);
        Ok(hazard)
    }

    fn pick_slot(&mut self) -> ContentSlot {
        ContentSlot::ALL[self.rng.random_range(0..ContentSlot::ALL.len())]
    }

    fn anchors(&self) -> Result<SegmentAnchors, SpawnError> {
        self.world
            .get::<&Segment>(self.segment)
            .map(|s| s.anchors)
            .map_err(|_| SpawnError::MissingSegment(self.segment))
    }

    fn sample_point(&mut self) -> Result<Vec3, SpawnError> {
        let segment = self.segment;
        let missing = move |_| SpawnError::MissingSegment(segment);
        let center = self.world.get::<&Position>(segment).map(|p| p.0).map_err(missing)?;
        let region = self.world.get::<&Collider>(segment).map(|c| *c).map_err(missing)?;
        let rules = &self.config.pickups;
        sample_valid_point(
            &mut *self.rng,
            &region,
            center,
            rules.pickup_height,
            rules.max_placement_attempts,
        )
    }

    fn report(&self, err: &SpawnError) {
        match err {
            SpawnError::PlacementExhausted { .. } => {
                warn!(segment = ?self.segment, %err, "content skipped")
            }
            _ => error!(segment = ?self.segment, %err, "content skipped"),
        }
    }
}

fn required<'p>(prefab: &'p Option<Prefab>, name: &'static str) -> Result<&'p Prefab, SpawnError> {
    prefab.as_ref().ok_or(SpawnError::MissingPrefab(name))
}
