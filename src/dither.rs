const RAMP_STEP: f64 = 0.1;
const FALLOFF: f64 = 3.0;

/// Pointer-driven brightness shimmer.
#[derive(Clone, Copy, Debug, Default)]
pub struct HoverDither {
    pointer_x: f64,
    pointer_y: f64,
    hovering: bool,
    intensity: f64,
}

impl HoverDither {
    pub fn pointer_moved(&mut self, nx: f64, ny: f64) {
        self.pointer_x = nx;
        self.pointer_y = ny;
    }

    pub fn pointer_entered(&mut self) {
        self.hovering = true;
    }

    pub fn pointer_left(&mut self) {
        self.hovering = false;
        self.intensity = 0.0;
    }

    pub fn hovering(&self) -> bool {
        self.hovering
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Once per frame: ramp toward full strength while hovered, back to zero
    /// otherwise.
    pub fn ramp(&mut self) {
        self.intensity = if self.hovering {
            (self.intensity + RAMP_STEP).min(1.0)
        } else {
            (self.intensity - RAMP_STEP).max(0.0)
        };
    }

    /// Brightness offset for a cell at normalized `(x, y)`.
    pub fn offset(&self, x: f64, y: f64, time: f64) -> f64 {
        if !self.hovering {
            return 0.0;
        }
        let dx = x - self.pointer_x;
        let dy = y - self.pointer_y;
        let d = (dx * dx + dy * dy).sqrt();
        let wave = (time * 10.0 + d * 20.0).sin()
            * (time * 8.0 + d * 15.0).cos()
            * (time * 6.0 + d * 10.0).sin();
        let falloff = (1.0 - d * FALLOFF).max(0.0);
        wave * falloff * self.intensity
    }
}
