use std::time::{Duration, Instant};

use rand::Rng;

const DURATION: Duration = Duration::from_millis(1500);
const STEP: Duration = Duration::from_millis(100);
/// Progress at which scrambling gives way to revealing.
const REVEAL_AT: f64 = 0.7;
const NOISE: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?/~`";

/// Scramble-then-reveal swap between two labels.
#[derive(Clone, Debug, Default)]
pub struct TextTransition {
    current: String,
    target: String,
    started_at: Option<Instant>,
    last_step: Duration,
    progress: f64,
    active: bool,
}

impl TextTransition {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Ignored while another transition is still running.
    pub fn start(&mut self, text: &str, now: Instant) -> bool {
        if self.active {
            return false;
        }
        self.current = if self.target.is_empty() {
            text.to_string()
        } else {
            std::mem::take(&mut self.target)
        };
        self.target = text.to_string();
        self.started_at = Some(now);
        self.last_step = Duration::ZERO;
        self.progress = 0.0;
        self.active = true;
        true
    }

    pub fn update(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        let Some(start) = self.started_at else {
            return;
        };
        let elapsed = now.saturating_duration_since(start);
        if elapsed.saturating_sub(self.last_step) < STEP {
            return;
        }
        self.last_step = elapsed;
        let p = (elapsed.as_secs_f64() / DURATION.as_secs_f64()).min(1.0);
        self.progress = self.progress.max(p);
        if self.progress >= 1.0 {
            self.active = false;
            self.current = self.target.clone();
        }
    }

    /// What to draw this frame.
    pub fn display<R: Rng>(&self, rng: &mut R) -> String {
        if !self.active {
            return self.current.clone();
        }
        scramble(&self.current, &self.target, self.progress, rng)
    }
}

fn noise<R: Rng>(rng: &mut R) -> char {
    NOISE[rng.gen_range(0..NOISE.len())] as char
}

/// Output always has `max(len(from), len(to))` chars.
pub fn scramble<R: Rng>(from: &str, to: &str, progress: f64, rng: &mut R) -> String {
    let from: Vec<char> = from.chars().collect();
    let to: Vec<char> = to.chars().collect();
    let n = from.len().max(to.len());
    let shift = ((to.len() / 2) as f64 - (from.len() / 2) as f64) * progress;
    let shift = shift.floor() as isize;
    let pick = |chars: &[char], i: isize| -> char {
        usize::try_from(i)
            .ok()
            .and_then(|i| chars.get(i).copied())
            .unwrap_or(' ')
    };

    let mut out = String::with_capacity(n);
    for i in 0..n {
        let ch = if progress < REVEAL_AT {
            let local = progress * n as f64 - i as f64;
            if local > 0.0 && local < 1.0 {
                if rng.gen::<f64>() > local {
                    noise(rng)
                } else {
                    pick(&from, i as isize - shift)
                }
            } else if local >= 1.0 {
                noise(rng)
            } else {
                pick(&from, i as isize - shift)
            }
        } else {
            let reveal = (progress - REVEAL_AT) / (1.0 - REVEAL_AT);
            let local = reveal * n as f64 - i as f64;
            if local > 0.0 && local < 1.0 {
                if rng.gen::<f64>() > local {
                    noise(rng)
                } else {
                    pick(&to, i as isize)
                }
            } else if local >= 1.0 {
                pick(&to, i as isize)
            } else {
                noise(rng)
            }
        };
        out.push(ch);
    }
    out
}
