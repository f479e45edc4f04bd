use std::time::{Duration, Instant};

use chrono::{NaiveDateTime, Timelike};

use crate::theme::{Painter, TimeKey};

const SUNRISE: f64 = 6.5;
const SUNSET: f64 = 19.5;
const DAWN: f64 = SUNRISE - 1.0;
const DUSK: f64 = SUNSET + 1.0;

/// Continuous hour of the day, minute resolution.
pub fn time_of_day(t: &NaiveDateTime) -> f64 {
    t.hour() as f64 + t.minute() as f64 / 60.0
}

pub fn bucket(tod: f64) -> TimeKey {
    if (DAWN..SUNRISE).contains(&tod) {
        TimeKey::Dawn
    } else if (SUNRISE..SUNSET).contains(&tod) {
        TimeKey::Day
    } else if (SUNSET..DUSK).contains(&tod) {
        TimeKey::Dusk
    } else {
        TimeKey::Night
    }
}

pub fn is_wet(condition: &str) -> bool {
    let c = condition.to_lowercase();
    c.contains("rain") || c.contains("shower")
}

/// Time bucket with the weather override applied. `None` falls back to the
/// clock alone.
pub fn time_key(tod: f64, condition: Option<&str>) -> TimeKey {
    match condition {
        Some(c) if is_wet(c) => TimeKey::Rain,
        _ => bucket(tod),
    }
}

/// Cycles through the painter list on a fixed interval.
#[derive(Debug)]
pub struct PainterRotation {
    painters: &'static [Painter],
    index: usize,
    interval: Duration,
    last_change: Instant,
}

impl PainterRotation {
    pub fn new(painters: &'static [Painter], interval: Duration, now: Instant) -> Self {
        Self {
            painters,
            index: 0,
            interval,
            last_change: now,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static Painter {
        &self.painters[self.index]
    }

    /// Advances once the interval has fully elapsed. Returns the new painter
    /// when a change happened.
    pub fn update(&mut self, now: Instant) -> Option<&'static Painter> {
        if self.painters.is_empty() {
            return None;
        }
        if now.saturating_duration_since(self.last_change) < self.interval {
            return None;
        }
        self.index = (self.index + 1) % self.painters.len();
        self.last_change = now;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::painters;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(h, m, 0))
            .expect("valid time")
    }

    #[test]
    fn buckets_by_clock() {
        assert_eq!(bucket(7.0), TimeKey::Day);
        assert_eq!(bucket(6.0), TimeKey::Dawn);
        assert_eq!(bucket(20.0), TimeKey::Dusk);
        assert_eq!(bucket(3.0), TimeKey::Night);
    }

    #[test]
    fn bucket_edges_are_half_open() {
        assert_eq!(bucket(5.5), TimeKey::Dawn);
        assert_eq!(bucket(6.5), TimeKey::Day);
        assert_eq!(bucket(19.5), TimeKey::Dusk);
        assert_eq!(bucket(20.5), TimeKey::Night);
        assert_eq!(bucket(5.49), TimeKey::Night);
    }

    #[test]
    fn time_of_day_uses_minutes() {
        assert!((time_of_day(&at(19, 30)) - 19.5).abs() < 1e-12);
        assert_eq!(bucket(time_of_day(&at(6, 29))), TimeKey::Dawn);
        assert_eq!(bucket(time_of_day(&at(6, 30))), TimeKey::Day);
    }

    #[test]
    fn showers_and_rain_override_any_hour() {
        for tod in [3.0, 6.0, 7.0, 20.0] {
            assert_eq!(time_key(tod, Some("slight rain showers")), TimeKey::Rain);
            assert_eq!(time_key(tod, Some("Heavy RAIN")), TimeKey::Rain);
            assert_eq!(time_key(tod, Some("heavy snow showers")), TimeKey::Rain);
        }
    }

    #[test]
    fn dry_or_missing_weather_keeps_clock_bucket() {
        assert_eq!(time_key(7.0, Some("clear")), TimeKey::Day);
        assert_eq!(time_key(7.0, Some("unknown")), TimeKey::Day);
        assert_eq!(time_key(3.0, None), TimeKey::Night);
    }

    #[test]
    fn rotation_is_cyclic() {
        let t0 = Instant::now();
        let step = Duration::from_millis(5000);
        let mut rot = PainterRotation::new(painters(), step, t0);
        let start = rot.index();
        for i in 1..=5u32 {
            assert!(rot.update(t0 + step * i).is_some());
        }
        assert_eq!(rot.index(), start);
    }

    #[test]
    fn rotation_waits_for_interval() {
        let t0 = Instant::now();
        let mut rot = PainterRotation::new(painters(), Duration::from_secs(5), t0);
        assert!(rot.update(t0 + Duration::from_millis(4999)).is_none());
        let p = rot.update(t0 + Duration::from_millis(5000)).expect("changed");
        assert_eq!(p.name, painters()[1].name);
        assert!(rot.update(t0 + Duration::from_millis(6000)).is_none());
    }
}
