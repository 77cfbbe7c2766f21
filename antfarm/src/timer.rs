// Accumulates frame time and releases it in fixed tick-sized slices.
// Counts up from 0 towards max_value

#[derive(Debug, Clone)]
pub struct Timer {
    pub max_value: f32,
    pub value: f32,
}

impl Timer {
    /// Create a new timer with a max value and an initial value
    pub fn new(max_value: f32, initial_value: f32) -> Self {
        Self {
            max_value,
            value: initial_value,
        }
    }

    /// A timer that fires `rate` times per second.
    pub fn per_second(rate: f32) -> Self {
        Self::new(1.0 / rate, 0.0)
    }

    /// Returns true if the timer has gone past the max value
    pub fn is_ready(&self) -> bool {
        self.value >= self.max_value
    }

    /// Update the timer by dt (delta time)
    pub fn update(&mut self, dt: f32) {
        self.value += dt;
    }

    /// Takes one period off the accumulated value.
    pub fn consume(&mut self) {
        self.value -= self.max_value;
    }

    /// Drops whatever is left over, e.g. after falling too far behind.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }
}
