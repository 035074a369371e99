// headless.rs - Run the simulation loop without a window
//
// A single-threaded tokio runtime drives the same frame loop the window uses;
// the frame-budget remainder is awaited instead of painted.

use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use conway_engine::patterns;
use conway_engine::scheduler::DEFAULT_FPS;
use conway_engine::{Catalog, Clock, Grid, MonotonicClock, Scheduler, Session, Shape};
use log::{debug, info, warn};

use crate::settings::Settings;

pub struct Options<'a> {
    pub ups: u32,
    pub fast: bool,
    pub frames: u32,
    pub pattern: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub frames: u32,
    pub generations: u64,
    pub population: usize,
    pub overruns: u32,
}

/// Build a running session with the requested pattern stamped in the middle.
pub fn prepare(settings: Settings, shapes: Vec<Shape>, options: &Options<'_>) -> Result<Session> {
    let grid = Grid::new(settings.width as usize, settings.height as usize)
        .context("cannot build the board")?;
    let catalog = Catalog::from_shapes(shapes);

    let seed = match options.pattern {
        Some(name) => match patterns::find(name) {
            Some(pattern) => pattern.shape(),
            None => {
                let known: Vec<_> = patterns::PATTERNS.iter().map(|p| p.name).collect();
                bail!("unknown pattern {name:?}, expected one of: {}", known.join(", "));
            }
        },
        None => catalog.current().clone(),
    };
    if seed.is_empty() {
        warn!("no pattern given and the shape catalog is empty; the board starts blank");
    }

    let mut scheduler = Scheduler::new(options.ups, DEFAULT_FPS);
    scheduler.set_fast(options.fast);
    scheduler.set_paused(false);

    let mut session = Session::new(grid, catalog, scheduler);
    let (cx, cy) = (settings.width as i32 / 2, settings.height as i32 / 2);
    session.grid_mut().put_shape(cx, cy, &seed);
    Ok(session)
}

/// Run `frames` frames against `clock`, sleeping out each frame's remainder.
pub async fn drive<C: Clock>(session: &mut Session, clock: &C, frames: u32) -> Summary {
    let mut overruns = 0;
    for frame in 0..frames {
        let report = session.advance_frame(clock);
        if report.generations() > 0 {
            debug!(
                "frame {frame}: {} scheduled, {} fast, population {}",
                report.scheduled,
                report.fast,
                session.grid().population()
            );
        }
        match session.scheduler().remaining(report.started, clock.now()) {
            Some(rest) => tokio::time::sleep(rest).await,
            None => {
                overruns += 1;
                tokio::task::yield_now().await;
            }
        }
    }
    Summary {
        frames,
        generations: session.grid().generation(),
        population: session.grid().population(),
        overruns,
    }
}

pub fn run(settings: Settings, shapes: Vec<Shape>, options: Options<'_>) -> Result<()> {
    let mut session = prepare(settings, shapes, &options)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("cannot start the runtime")?;

    let started = Instant::now();
    let clock = MonotonicClock::new();
    let summary = runtime.block_on(drive(&mut session, &clock, options.frames));
    let elapsed: Duration = started.elapsed();

    info!(
        "{} frames in {:.2?}: {} generations, population {}, {} overran",
        summary.frames, elapsed, summary.generations, summary.population, summary.overruns
    );
    println!("generation {} population {}", summary.generations, summary.population);
    Ok(())
}
