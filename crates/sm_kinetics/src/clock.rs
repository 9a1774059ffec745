/// Elapsed simulated time. Never decreases.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    elapsed: f64,
}

impl Clock {
    /// A clock resuming from `elapsed`, e.g. the time stored with a restart dump.
    pub fn starting_at(elapsed: f64) -> Self {
        debug_assert!(elapsed >= 0., "negative start time");
        Self { elapsed }
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn advance(&mut self, dt: f64) {
        debug_assert!(dt >= 0. && dt.is_finite(), "invalid time increment {dt}");
        self.elapsed += dt;
    }
}
