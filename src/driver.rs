//! Per-frame orchestration: advance state, rasterize the torus, draw the
//! overlay.

use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use rand::{rngs::StdRng, SeedableRng};

use crate::clock::AnimationClock;
use crate::color::{ColorSynthesizer, Palette};
use crate::dither::HoverDither;
use crate::geometry::Layout;
use crate::overlay::{self, OverlayText};
use crate::raster::{self, RasterParams};
use crate::surface::{Raster, Surface};
use crate::temporal::{self, PainterRotation};
use crate::theme::{painters, Painter, TimeKey};
use crate::transition::TextTransition;
use crate::weather::WeatherSnapshot;

#[derive(Clone, Debug)]
pub struct DriverOptions {
    pub location: String,
    pub painter_interval: Duration,
    pub weather_interval: Duration,
    pub seed: u64,
}

impl Default for DriverOptions {
    fn default() -> Self {
        Self {
            location: "New York, NY".to_string(),
            painter_interval: Duration::from_millis(5000),
            weather_interval: Duration::from_secs(300),
            seed: 0xC0FFEE_u64,
        }
    }
}

pub struct FrameDriver {
    opts: DriverOptions,
    layout: Layout,
    clock: AnimationClock,
    colors: ColorSynthesizer,
    dither: HoverDither,
    rotation: PainterRotation,
    text: TextTransition,
    rng: StdRng,
    weather: Option<WeatherSnapshot>,
    weather_at: Option<Instant>,
}

impl FrameDriver {
    pub fn new(opts: DriverOptions, layout: Layout, wall: &NaiveDateTime, now: Instant) -> Self {
        let rotation = PainterRotation::new(painters(), opts.painter_interval, now);
        let mut text = TextTransition::default();
        let key = temporal::bucket(temporal::time_of_day(wall));
        text.start(&rotation.current().label(key), now);
        Self {
            rng: StdRng::seed_from_u64(opts.seed),
            opts,
            layout,
            clock: AnimationClock::default(),
            colors: ColorSynthesizer::new(),
            dither: HoverDither::default(),
            rotation,
            text,
            weather: None,
            weather_at: None,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn painter(&self) -> &'static Painter {
        self.rotation.current()
    }

    pub fn display_text(&self) -> &TextTransition {
        &self.text
    }

    /* ---- input hooks ---- */

    pub fn on_pointer_move(&mut self, nx: f64, ny: f64) {
        self.dither.pointer_moved(nx, ny);
    }

    pub fn on_pointer_enter(&mut self) {
        self.dither.pointer_entered();
    }

    pub fn on_pointer_leave(&mut self) {
        self.dither.pointer_left();
    }

    /// Recomputes the grid; the next frame starts from fresh buffers.
    pub fn on_resize(&mut self, width: u32, height: u32, raster: Raster) {
        let layout = Layout::compute(width, height, raster);
        if layout != self.layout {
            tracing::debug!(
                cols = layout.cols,
                rows = layout.rows,
                compact = layout.compact,
                "resized"
            );
        }
        self.layout = layout;
    }

    /* ---- weather ---- */

    /// Replaces the snapshot wholesale.
    pub fn set_weather(&mut self, snap: WeatherSnapshot, now: Instant) {
        self.weather = Some(snap);
        self.weather_at = Some(now);
    }

    /// True when the last completed poll is older than the poll interval.
    pub fn weather_due(&self, now: Instant) -> bool {
        match self.weather_at {
            Some(t) => now.saturating_duration_since(t) > self.opts.weather_interval,
            None => false,
        }
    }

    pub fn time_key(&self, wall: &NaiveDateTime) -> TimeKey {
        let condition = self.weather.as_ref().and_then(|w| w.usable_condition());
        temporal::time_key(temporal::time_of_day(wall), condition)
    }

    /* ---- frame ---- */

    /// Advances one frame and draws it.
    pub fn tick(&mut self, surface: &mut dyn Surface, wall: &NaiveDateTime, now: Instant) {
        self.clock.advance();

        let key = self.time_key(wall);
        if let Some(p) = self.rotation.update(now) {
            let label = p.label(key);
            tracing::info!(painter = p.name, artwork = p.artwork(key).name, "painter changed");
            self.text.start(&label, now);
        }

        self.dither.ramp();
        self.draw(surface, key, wall, now);
    }

    fn draw(
        &mut self,
        surface: &mut dyn Surface,
        key: TimeKey,
        wall: &NaiveDateTime,
        now: Instant,
    ) {
        let painter = self.rotation.current();
        let layout = self.layout;

        let params = RasterParams {
            layout: &layout,
            rotation: self.clock.rotation,
            gradient: self.clock.gradient,
            color_time: self.clock.color_time,
            palette: Palette {
                artwork: painter.artwork(key),
                style: &painter.style,
                color_time: self.clock.color_time,
                major_radius: layout.torus.major,
                camera_distance: layout.torus.camera_distance,
            },
            dither: &self.dither,
        };
        let buf = raster::rasterize(&params, &mut self.colors);
        raster::blit(&buf, &layout, surface);

        self.text.update(now);
        let label = self.text.display(&mut self.rng);
        overlay::draw(
            surface,
            &layout,
            &OverlayText {
                location: &self.opts.location,
                weather: self.weather.as_ref(),
                now: *wall,
                label: &label,
                // weather-aware key, so a rainy day reads the rain line
                description: painter.description(key),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::testing::RecordingSurface;
    use chrono::NaiveDate;

    fn wall(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 10, 3)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid")
    }

    fn cells() -> Raster {
        Raster::Cells { glyph_aspect: 0.5 }
    }

    fn driver(now: Instant) -> FrameDriver {
        FrameDriver::new(
            DriverOptions::default(),
            Layout::compute(120, 40, cells()),
            &wall(12, 0),
            now,
        )
    }

    #[test]
    fn tick_draws_background_grid_then_overlay() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        let mut s = RecordingSurface::cells(120, 40);
        d.tick(&mut s, &wall(12, 0), t0 + Duration::from_millis(33));

        assert_eq!(s.rects.len(), 1);
        let grid = d.layout().cell_count();
        assert!(s.texts.len() > grid);
        assert_eq!(s.texts[grid].text, "New York, NY");
        assert!(s.texts[..grid].iter().any(|t| t.text != " "));
        assert!((d.clock().rotation - 0.01).abs() < 1e-12);
    }

    #[test]
    fn painter_change_starts_label_transition() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        let mut s = RecordingSurface::cells(120, 40);
        // let the opening transition finish
        d.tick(&mut s, &wall(12, 0), t0 + Duration::from_millis(2000));
        assert!(!d.display_text().is_active());
        assert_eq!(d.display_text().current(), "Beach House - Space Song");

        d.tick(&mut s, &wall(12, 0), t0 + Duration::from_millis(5000));
        assert_eq!(d.painter().name, "Tycho");
        assert!(d.display_text().is_active());
        assert_eq!(d.display_text().target(), "Tycho - Sunrise Projector");
    }

    #[test]
    fn rain_overrides_artwork_choice() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        assert_eq!(d.time_key(&wall(12, 0)), TimeKey::Day);
        d.set_weather(
            WeatherSnapshot::Known(crate::weather::Observation {
                condition: "moderate rain showers".to_string(),
                temperature_f: 50,
                humidity_pct: 90,
                wind_mph: 12,
                observed_at: chrono::Local::now(),
            }),
            t0,
        );
        assert_eq!(d.time_key(&wall(12, 0)), TimeKey::Rain);

        d.set_weather(WeatherSnapshot::Unknown, t0);
        assert_eq!(d.time_key(&wall(12, 0)), TimeKey::Day);
        assert_eq!(d.time_key(&wall(2, 0)), TimeKey::Night);
    }

    #[test]
    fn rain_shows_the_rain_description() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        d.set_weather(
            WeatherSnapshot::Known(crate::weather::Observation {
                condition: "slight rain".to_string(),
                temperature_f: 48,
                humidity_pct: 95,
                wind_mph: 5,
                observed_at: chrono::Local::now(),
            }),
            t0,
        );
        let mut s = RecordingSurface::cells(120, 40);
        d.tick(&mut s, &wall(12, 0), t0);
        assert!(s.texts.iter().any(|t| t.text.starts_with("Raindrops trace patterns")));
    }

    #[test]
    fn unknown_weather_keeps_frames_coming() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        d.set_weather(WeatherSnapshot::Unknown, t0);
        let mut s = RecordingSurface::cells(120, 40);
        for i in 1..=3 {
            d.tick(&mut s, &wall(21, 0), t0 + Duration::from_millis(33 * i));
        }
        assert!(s.texts.iter().any(|t| t.text == "unknown • --°F"));
    }

    #[test]
    fn weather_becomes_due_after_interval() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        assert!(!d.weather_due(t0 + Duration::from_secs(10_000)));
        d.set_weather(WeatherSnapshot::Unknown, t0);
        assert!(!d.weather_due(t0 + Duration::from_secs(300)));
        assert!(d.weather_due(t0 + Duration::from_secs(301)));
    }

    #[test]
    fn resize_twice_is_stable() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        d.on_resize(1024, 768, Raster::Pixels);
        let first = *d.layout();
        d.on_resize(1024, 768, Raster::Pixels);
        assert_eq!(*d.layout(), first);
        assert_eq!(first.grid_size, 12);
    }

    #[test]
    fn empty_surface_still_ticks() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        d.on_resize(0, 0, cells());
        let mut s = RecordingSurface::cells(0, 0);
        d.tick(&mut s, &wall(8, 0), t0);
        assert_eq!(s.rects.len(), 1);
    }

    #[test]
    fn hover_hooks_feed_the_dither() {
        let t0 = Instant::now();
        let mut d = driver(t0);
        d.on_pointer_enter();
        d.on_pointer_move(0.5, 0.5);
        let mut s = RecordingSurface::cells(120, 40);
        d.tick(&mut s, &wall(12, 0), t0);
        assert!(d.dither.hovering());
        assert!(d.dither.intensity() > 0.0);
        d.on_pointer_leave();
        assert!(!d.dither.hovering());
        assert_eq!(d.dither.intensity(), 0.0);
    }
}
