use std::{
    fs::File,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::driver::FrameDriver;
use crate::geometry::Layout;
use crate::surface::Surface;
use crate::term::TerminalSurface;
use crate::weather::{OpenMeteo, WeatherPoller, WeatherSnapshot};

/// Host-side reaction to one terminal event.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Input {
    Quit,
    PointerAt(f64, f64),
    PointerGone,
    Resized(u16, u16),
    Ignored,
}

fn initialise_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("could not open log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn classify(ev: Event, cols: u16, rows: u16) -> Input {
    match ev {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => match code {
            KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Input::Quit,
            _ => Input::Ignored,
        },
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Moved | MouseEventKind::Drag(_),
            column,
            row,
            ..
        }) => Input::PointerAt(
            column as f64 / cols.max(1) as f64,
            row as f64 / rows.max(1) as f64,
        ),
        Event::FocusLost => Input::PointerGone,
        Event::Resize(c, r) => Input::Resized(c, r),
        _ => Input::Ignored,
    }
}

/// Runs until the user quits. The terminal is restored on every exit path.
pub async fn run(cfg: Config) -> Result<()> {
    initialise_tracing(cfg.log_file.as_deref())?;
    tracing::info!(
        location = %cfg.driver.location,
        fps = cfg.fps,
        weather = cfg.weather,
        "starting"
    );

    let (poller, weather_rx) = if cfg.weather {
        let source = OpenMeteo::new(cfg.lat, cfg.lon)?;
        let (p, rx) = WeatherPoller::spawn(source, cfg.driver.weather_interval);
        (Some(p), Some(rx))
    } else {
        (None, None)
    };

    let mut term = TerminalSurface::begin(cfg.mono).context("terminal setup failed")?;
    let res = frame_loop(&mut term, &cfg, poller.as_ref(), weather_rx).await;
    let restored = term.end().context("terminal restore failed");
    res?;
    restored
}

async fn frame_loop(
    term: &mut TerminalSurface,
    cfg: &Config,
    poller: Option<&WeatherPoller>,
    mut weather_rx: Option<mpsc::Receiver<WeatherSnapshot>>,
) -> Result<()> {
    let start = Instant::now();
    let layout = Layout::compute(term.width(), term.height(), term.raster());
    let mut driver = FrameDriver::new(
        cfg.driver.clone(),
        layout,
        &Local::now().naive_local(),
        start,
    );

    let mut ticker = tokio::time::interval(cfg.frame_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;

        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            match classify(ev, term.width() as u16, term.height() as u16) {
                Input::Quit => return Ok(()),
                Input::PointerAt(nx, ny) => {
                    driver.on_pointer_enter();
                    driver.on_pointer_move(nx, ny);
                }
                Input::PointerGone => driver.on_pointer_leave(),
                Input::Resized(c, r) => {
                    term.resize(c, r);
                    driver.on_resize(c as u32, r as u32, term.raster());
                }
                Input::Ignored => {}
            }
        }

        let now = Instant::now();
        if let Some(rx) = weather_rx.as_mut() {
            while let Ok(snap) = rx.try_recv() {
                driver.set_weather(snap, now);
            }
        }
        if let Some(p) = poller {
            if driver.weather_due(now) && p.request_refresh() {
                tracing::debug!("weather stale, refresh requested");
            }
        }

        driver.tick(term, &Local::now().naive_local(), now);
        term.present()?;
    }
}
