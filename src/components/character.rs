/// The tracked mover: the player-controlled runner whose position drives
/// segment recycling and whose state hazards and pickups act upon.
#[derive(Clone, Debug)]
pub struct Mover {
    pub alive: bool,
    boosted: bool,
    /// Forward speed in world units per second.
    pub speed: f32,
    pub max_speed: f32,
    pub speed_gain_per_point: f32,
}

impl Mover {
    pub fn new(speed: f32, max_speed: f32, speed_gain_per_point: f32) -> Self {
        Self {
            alive: true,
            boosted: false,
            speed,
            max_speed,
            speed_gain_per_point,
        }
    }

    pub fn is_boosted(&self) -> bool {
        self.boosted
    }

    pub fn boost(&mut self) {
        self.boosted = true;
    }

    pub fn deboost(&mut self) {
        self.boosted = false;
    }

    /// Mark the mover dead. Returns `true` only for the call that actually
    /// killed it, so the caller schedules exactly one restart.
    pub fn die(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        self.alive = false;
        true
    }

    /// Speed up by one gain step per scored point, stopping once the cap is
    /// reached (the last step may overshoot it).
    pub fn increase_speed(&mut self, points: u32) {
        if self.speed < self.max_speed {
            self.speed += self.speed_gain_per_point * points as f32;
        }
    }
}
