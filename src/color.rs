//! Procedural surface coloring.
//!
//! Colors are a deterministic function of the inputs plus six phase
//! accumulators that advance on every call. The rasterizer calls
//! [`ColorSynthesizer::color`] once per depth-test winner, so the phases move
//! thousands of times per frame; that churn is what animates the texture.

use crate::surface::Rgb8;
use crate::theme::{Artwork, Rgb, Style};

const WAVE_AMPLITUDE: f64 = 0.15;
const MIN_BRIGHTNESS: f64 = 0.3;
const BACKGROUND_BRIGHTNESS: f64 = 0.1;
const MIN_CONTRAST: f64 = 0.2;
const FLOOR: f64 = 0.1;
const CEIL: f64 = 0.9;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PatternPhases {
    pub time1: f64,
    pub time2: f64,
    pub time3: f64,
    pub pattern1: f64,
    pub pattern2: f64,
    pub pattern3: f64,
}

impl PatternPhases {
    fn advance(&mut self) {
        self.time1 += 0.002;
        self.time2 += 0.0015;
        self.time3 += 0.0025;
        self.pattern1 += 0.0008;
        self.pattern2 += 0.0012;
        self.pattern3 += 0.001;
    }

    /// Advances, then evaluates the three cross-multiplied fields at
    /// `(x, y, z)`.
    fn sample(&mut self, x: f64, y: f64, z: f64) -> f64 {
        self.advance();
        let p1 = (x * 1.5 + self.time1).sin()
            * (y * 2.0 + self.pattern1).cos()
            * (z * 2.5 + self.time2).sin();
        let p2 = (x * 2.0 + self.time2).cos()
            * (y * 2.5 + self.pattern2).sin()
            * (z * 1.5 + self.time3).cos();
        let p3 = (x * 2.5 + self.time3).sin()
            * (y * 1.5 + self.pattern3).cos()
            * (z * 2.0 + self.time1).sin();
        (p1 * 0.35 + p2 * 0.35 + p3 * 0.3) * WAVE_AMPLITUDE
    }
}

/// Everything a color needs that is fixed for the whole frame.
#[derive(Clone, Copy, Debug)]
pub struct Palette<'a> {
    pub artwork: &'a Artwork,
    pub style: &'a Style,
    pub color_time: f64,
    pub major_radius: f64,
    pub camera_distance: f64,
}

#[derive(Clone, Debug, Default)]
pub struct ColorSynthesizer {
    phases: PatternPhases,
}

impl ColorSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_phases(phases: PatternPhases) -> Self {
        Self { phases }
    }

    pub fn phases(&self) -> PatternPhases {
        self.phases
    }

    pub fn color(&mut self, angle: f64, depth: f64, pal: &Palette<'_>) -> Rgb8 {
        let style = pal.style;
        let ct = pal.color_time;

        let brush = style.brush_stroke * 1.5;
        let wave1 = (ct + angle * 1.5).sin() * brush;
        let wave2 = (ct * 1.2 + angle * 2.0).cos() * brush;
        let wave3 = (ct * 0.9 + angle * 2.5).sin() * brush;

        let x = angle.cos() * pal.major_radius;
        let y = angle.sin() * pal.major_radius;
        let complex = self.phases.sample(x, y, depth) * 1.5;

        let depth_factor = (depth + pal.camera_distance) / (2.0 * pal.camera_distance);
        let combined = (wave1 + wave2 + wave3 + complex) * (0.6 + depth_factor * 0.6);

        let mix = ((angle * 2.0 + ct).sin() + 1.0) / 2.0;
        let gain = 1.0 + combined * style.contrast;
        let base = pal.artwork.colors.mix(pal.artwork.accent, mix);
        let mut c = Rgb {
            r: (base.r * gain).clamp(FLOOR, CEIL),
            g: (base.g * gain).clamp(FLOOR, CEIL),
            b: (base.b * gain).clamp(FLOOR, CEIL),
        };

        c.r += (ct * 0.4).sin() * 0.08 * style.saturation + complex * 0.25;
        c.g += (ct * 0.3).cos() * 0.07 * style.saturation + complex * 0.22;
        c.b += (ct * 0.5).sin() * 0.09 * style.saturation + complex * 0.28;

        let bleed = 0.12 * style.saturation;
        c = Rgb {
            r: c.r + (c.g + c.b) * bleed,
            g: c.g + (c.r + c.b) * bleed,
            b: c.b + (c.r + c.g) * bleed,
        };

        let pull = 0.3 * style.contrast;
        let avg = c.avg();
        c = Rgb {
            r: avg + (c.r - avg) * pull,
            g: avg + (c.g - avg) * pull,
            b: avg + (c.b - avg) * pull,
        };

        // the contrast check below uses this pre-lift average
        let brightness = c.avg();
        if brightness <= 0.0 {
            c = Rgb::new(MIN_BRIGHTNESS, MIN_BRIGHTNESS, MIN_BRIGHTNESS);
        } else if brightness < MIN_BRIGHTNESS {
            let k = MIN_BRIGHTNESS / brightness;
            c = Rgb {
                r: (c.r * k).min(CEIL),
                g: (c.g * k).min(CEIL),
                b: (c.b * k).min(CEIL),
            };
        }

        let gap = (brightness - BACKGROUND_BRIGHTNESS).abs();
        if gap < MIN_CONTRAST {
            let dir = if brightness > BACKGROUND_BRIGHTNESS { 1.0 } else { -1.0 };
            let adj = (MIN_CONTRAST - gap) * dir;
            c = Rgb {
                r: (c.r + adj).clamp(FLOOR, CEIL),
                g: (c.g + adj).clamp(FLOOR, CEIL),
                b: (c.b + adj).clamp(FLOOR, CEIL),
            };
        }

        Rgb8::new(to_u8(c.r), to_u8(c.g), to_u8(c.b))
    }
}

fn to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
