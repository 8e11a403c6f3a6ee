/// Fixed-step simulation clock. Time only advances when [`SimClock::tick`]
/// is called, so runs are reproducible regardless of wall time.
pub struct SimClock {
    pub dt: f32,
    elapsed: f64,
    ticks: u64,
}

impl SimClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            elapsed: 0.0,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) {
        self.elapsed += f64::from(self.dt);
        self.ticks += 1;
    }

    /// Simulated seconds since the clock was created.
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
