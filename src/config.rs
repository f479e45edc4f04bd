use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::driver::DriverOptions;

const FPS_RANGE: std::ops::RangeInclusive<u32> = 10..=120;

#[derive(Parser, Debug)]
#[command(name = "chromatic-atmospheres")]
#[command(about = "Rotating ASCII torus in album-art palettes that follow the clock and weather")]
pub struct Cli {
    /// Latitude (decimal) for the weather lookup
    #[arg(long, allow_negative_numbers = true, default_value_t = 40.7128)]
    pub lat: f64,

    /// Longitude (decimal) for the weather lookup
    #[arg(long, allow_negative_numbers = true, default_value_t = -74.0060)]
    pub lon: f64,

    /// Label shown in the overlay
    #[arg(long, default_value = "New York, NY")]
    pub location: String,

    /// Target frame rate (clamped to 10..=120)
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Weather refresh interval (minutes)
    #[arg(long, default_value_t = 5)]
    pub weather_refresh_min: u64,

    /// Time each painter stays on screen (milliseconds)
    #[arg(long, default_value_t = 5000)]
    pub painter_interval_ms: u64,

    /// Seed for the label scramble
    #[arg(long, default_value_t = 0xC0FFEE)]
    pub seed: u64,

    /// Disable 24-bit color
    #[arg(long, default_value_t = false)]
    pub mono: bool,

    /// Skip weather polling; time of day alone picks the palette
    #[arg(long, default_value_t = false)]
    pub no_weather: bool,

    /// Write logs here (discarded otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub lat: f64,
    pub lon: f64,
    pub fps: u32,
    pub weather: bool,
    pub mono: bool,
    pub log_file: Option<PathBuf>,
    pub driver: DriverOptions,
}

impl Config {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps as f64)
    }
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            lat: cli.lat,
            lon: cli.lon,
            fps: cli.fps.clamp(*FPS_RANGE.start(), *FPS_RANGE.end()),
            weather: !cli.no_weather,
            mono: cli.mono,
            log_file: cli.log_file,
            driver: DriverOptions {
                location: cli.location,
                painter_interval: Duration::from_millis(cli.painter_interval_ms.max(1)),
                weather_interval: Duration::from_secs(cli.weather_refresh_min.max(1) * 60),
                seed: cli.seed,
            },
        }
    }
}
