const ROTATION_SPEED: f64 = 0.01;
const GRADIENT_SPEED: f64 = 0.01;
const COLOR_SPEED: f64 = 0.003;

/// Per-frame animation counters. Advanced once per tick, never reset.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationClock {
    pub rotation: f64,
    pub gradient: f64,
    pub color_time: f64,
}

impl AnimationClock {
    pub fn advance(&mut self) {
        self.rotation += ROTATION_SPEED;
        self.gradient += GRADIENT_SPEED;
        self.color_time += COLOR_SPEED;
    }
}
