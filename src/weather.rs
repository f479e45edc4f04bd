use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use serde::Deserialize;
use tokio::sync::mpsc;

/// Upper bound on one poll, connect to parsed body.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

/// One successful observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub condition: String,
    pub temperature_f: i32,
    pub humidity_pct: i32,
    pub wind_mph: i32,
    pub observed_at: DateTime<Local>,
}

/// Latest poll result. `Unknown` replaces any older data when a poll fails.
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherSnapshot {
    Known(Observation),
    Unknown,
}

impl WeatherSnapshot {
    pub fn condition(&self) -> &str {
        match self {
            WeatherSnapshot::Known(o) => &o.condition,
            WeatherSnapshot::Unknown => "unknown",
        }
    }

    /// Condition for time-key selection; `None` when nothing usable is known.
    pub fn usable_condition(&self) -> Option<&str> {
        match self {
            WeatherSnapshot::Known(o) => Some(&o.condition),
            WeatherSnapshot::Unknown => None,
        }
    }

    pub fn temperature_label(&self) -> String {
        match self {
            WeatherSnapshot::Known(o) => o.temperature_f.to_string(),
            WeatherSnapshot::Unknown => "--".to_string(),
        }
    }

    /// "overcast • 54°F"
    pub fn summary(&self) -> String {
        format!("{} • {}°F", self.condition(), self.temperature_label())
    }
}

/// WMO weather interpretation codes as reported by Open-Meteo.
pub fn condition_for_code(code: i32) -> &'static str {
    match code {
        0 => "clear",
        1 => "mostly clear",
        2 => "partly cloudy",
        3 => "overcast",
        45 | 48 => "foggy",
        51 => "light drizzle",
        53 => "moderate drizzle",
        55 => "dense drizzle",
        61 => "slight rain",
        63 => "moderate rain",
        65 => "heavy rain",
        71 => "slight snow",
        73 => "moderate snow",
        75 => "heavy snow",
        77 => "snow grains",
        80 => "slight rain showers",
        81 => "moderate rain showers",
        82 => "violent rain showers",
        85 => "slight snow showers",
        86 => "heavy snow showers",
        95 => "thunderstorm",
        96 => "thunderstorm with slight hail",
        99 => "thunderstorm with heavy hail",
        _ => "unknown",
    }
}

pub trait WeatherSource {
    fn fetch(&self) -> impl Future<Output = Result<Observation>> + Send;
}

/* ----------------------------
   Open-Meteo
---------------------------- */

#[derive(Debug, Deserialize)]
struct OpenMeteoResp {
    current: OpenMeteoCurrent,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoCurrent {
    temperature_2m: f64,
    relative_humidity_2m: f64,
    wind_speed_10m: f64,
    weather_code: i32,
}

impl OpenMeteoResp {
    fn into_observation(self, observed_at: DateTime<Local>) -> Result<Observation> {
        let c = self.current;
        let round = |v: f64, what: &str| -> Result<i32> {
            if v.is_finite() {
                Ok(v.round() as i32)
            } else {
                Err(anyhow!("non-finite {what} in payload"))
            }
        };
        Ok(Observation {
            condition: condition_for_code(c.weather_code).to_string(),
            temperature_f: round(c.temperature_2m, "temperature")?,
            humidity_pct: round(c.relative_humidity_2m, "humidity")?,
            wind_mph: round(c.wind_speed_10m, "wind speed")?,
            observed_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteo {
    client: reqwest::Client,
    lat: f64,
    lon: f64,
}

impl OpenMeteo {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("could not build HTTP client")?;
        Ok(Self { client, lat, lon })
    }

    fn url(&self) -> String {
        format!(
            "https://api.open-meteo.com/v1/forecast?latitude={}&longitude={}\
&current=temperature_2m,relative_humidity_2m,wind_speed_10m,weather_code\
&temperature_unit=fahrenheit&wind_speed_unit=mph",
            self.lat, self.lon
        )
    }
}

impl WeatherSource for OpenMeteo {
    async fn fetch(&self) -> Result<Observation> {
        let resp = self
            .client
            .get(self.url())
            .send()
            .await
            .context("weather request failed")?;

        if !resp.status().is_success() {
            return Err(anyhow!("weather HTTP {}", resp.status()));
        }

        let om: OpenMeteoResp = resp.json().await.context("weather JSON parse failed")?;
        om.into_observation(Local::now())
    }
}

/// Runs one poll bounded by `limit`; failures and timeouts become
/// [`WeatherSnapshot::Unknown`].
pub async fn poll<S: WeatherSource>(source: &S, limit: Duration) -> WeatherSnapshot {
    let res = match tokio::time::timeout(limit, source.fetch()).await {
        Ok(res) => res,
        Err(_) => Err(anyhow!("weather fetch timed out after {limit:?}")),
    };
    match res {
        Ok(o) => {
            tracing::info!(condition = %o.condition, temp_f = o.temperature_f, "weather updated");
            WeatherSnapshot::Known(o)
        }
        Err(e) => {
            tracing::warn!("weather fetch failed: {e:#}");
            WeatherSnapshot::Unknown
        }
    }
}

/* ----------------------------
   Poller task
---------------------------- */

/// Handle to the background poll task.
#[derive(Debug, Clone)]
pub struct WeatherPoller {
    refresh: mpsc::Sender<()>,
    in_flight: Arc<AtomicBool>,
}

impl WeatherPoller {
    /// Starts polling immediately and then every `every`. Snapshots arrive on
    /// the returned receiver.
    pub fn spawn<S>(source: S, every: Duration) -> (Self, mpsc::Receiver<WeatherSnapshot>)
    where
        S: WeatherSource + Send + Sync + 'static,
    {
        let (tx, rx) = mpsc::channel(4);
        let (refresh, mut refresh_rx) = mpsc::channel::<()>(1);
        let in_flight = Arc::new(AtomicBool::new(false));
        let flag = in_flight.clone();

        tokio::spawn(async move {
            let mut t = tokio::time::interval(every);
            t.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = t.tick() => {}
                    Some(()) = refresh_rx.recv() => {
                        tracing::debug!("opportunistic weather refresh");
                    }
                }
                flag.store(true, Ordering::SeqCst);
                let snap = poll(&source, FETCH_TIMEOUT).await;
                flag.store(false, Ordering::SeqCst);
                if tx.send(snap).await.is_err() {
                    break;
                }
            }
        });

        (Self { refresh, in_flight }, rx)
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Asks for an extra poll. Dropped when one is running or already queued.
    pub fn request_refresh(&self) -> bool {
        if self.in_flight() {
            return false;
        }
        self.refresh.try_send(()).is_ok()
    }
}
