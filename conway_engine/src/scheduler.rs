// scheduler.rs - Fixed-timestep simulation cadence, decoupled from rendering
//
// Generations are due every `1e9 / ups` nanoseconds of clock time. Each
// rendered frame runs every generation that has come due since the last one,
// then, in fast mode, keeps stepping until the frame budget is spent.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::grid::Grid;

pub const UPS_HARD_CAP: u32 = 1000;
pub const DEFAULT_UPS: u32 = 10;
pub const DEFAULT_FPS: u32 = 30;

/// Most catch-up generations a single frame will run before giving up on
/// the backlog.
pub const MAX_CATCH_UP: u32 = 1000;

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Source of monotonic time, measured from an arbitrary fixed start.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Something that can be advanced one generation.
pub trait Stepper {
    fn step(&mut self);
}

impl Stepper for Grid {
    fn step(&mut self) {
        self.update();
    }
}

/// What one call to [`Scheduler::run_frame`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Clock reading when the frame began.
    pub started: Duration,
    /// Generations run to keep up with the clock.
    pub scheduled: u32,
    /// Extra generations run in fast mode.
    pub fast: u32,
    /// Due generations skipped because the backlog exceeded `MAX_CATCH_UP`.
    pub dropped: u64,
}

impl FrameReport {
    pub fn generations(&self) -> u32 {
        self.scheduled + self.fast
    }
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    ups: u32,
    update_interval: Duration,
    frame_budget: Duration,
    last_update: Duration,
    paused: bool,
    fast_mode: bool,
    resync: bool,
}

fn interval_for(per_second: u32) -> Duration {
    Duration::from_nanos(NANOS_PER_SEC / u64::from(per_second.max(1)))
}

impl Scheduler {
    /// A paused scheduler running `ups` generations and `fps` frames per second.
    pub fn new(ups: u32, fps: u32) -> Self {
        let ups = ups.clamp(1, UPS_HARD_CAP);
        Self {
            ups,
            update_interval: interval_for(ups),
            frame_budget: interval_for(fps),
            last_update: Duration::ZERO,
            paused: true,
            fast_mode: false,
            resync: true,
        }
    }

    pub fn ups(&self) -> u32 {
        self.ups
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    pub fn frame_budget(&self) -> Duration {
        self.frame_budget
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_fast(&self) -> bool {
        self.fast_mode
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.paused && !paused {
            // time spent paused is not owed
            self.resync = true;
        }
        self.paused = paused;
        debug!("scheduler {}", if paused { "paused" } else { "running" });
    }

    pub fn toggle_paused(&mut self) {
        self.set_paused(!self.paused);
    }

    pub fn set_fast(&mut self, fast: bool) {
        self.fast_mode = fast;
        debug!("fast mode {}", if fast { "on" } else { "off" });
    }

    pub fn toggle_fast(&mut self) {
        self.set_fast(!self.fast_mode);
    }

    /// Set updates per second, clamped to `[1, UPS_HARD_CAP]`. The new
    /// interval applies from the next catch-up check.
    pub fn set_ups(&mut self, ups: u32) {
        self.ups = ups.clamp(1, UPS_HARD_CAP);
        self.update_interval = interval_for(self.ups);
        debug!("updates per second: {}", self.ups);
    }

    pub fn change_ups(&mut self, delta: i32) {
        let ups = i64::from(self.ups) + i64::from(delta);
        self.set_ups(ups.clamp(1, i64::from(UPS_HARD_CAP)) as u32);
    }

    pub fn speed_up(&mut self) {
        self.change_ups(1);
    }

    pub fn slow_down(&mut self) {
        self.change_ups(-1);
    }

    /// Run one generation on demand. Only honoured while paused.
    pub fn step_once<S: Stepper + ?Sized>(&mut self, stepper: &mut S) -> bool {
        if !self.paused {
            return false;
        }
        stepper.step();
        true
    }

    /// Advance the simulation for one rendered frame.
    pub fn run_frame<C, S>(&mut self, clock: &C, stepper: &mut S) -> FrameReport
    where
        C: Clock + ?Sized,
        S: Stepper + ?Sized,
    {
        let started = clock.now();
        let mut report = FrameReport { started, ..FrameReport::default() };

        if self.paused || self.resync {
            self.last_update = started;
            self.resync = false;
        }
        if self.paused {
            return report;
        }

        while started >= self.last_update + self.update_interval {
            if report.scheduled == MAX_CATCH_UP {
                let behind = started.saturating_sub(self.last_update);
                report.dropped = (behind.as_nanos() / self.update_interval.as_nanos()) as u64;
                warn!("simulation fell behind, dropping {} generations", report.dropped);
                self.last_update = started;
                break;
            }
            stepper.step();
            self.last_update += self.update_interval;
            report.scheduled += 1;
        }

        if self.fast_mode {
            while clock.now().saturating_sub(started) < self.frame_budget {
                stepper.step();
                report.fast += 1;
            }
        }

        report
    }

    /// Time left in the frame that began at `started`, or `None` if the
    /// frame overran its budget.
    pub fn remaining(&self, started: Duration, now: Duration) -> Option<Duration> {
        self.frame_budget.checked_sub(now.saturating_sub(started))
    }

    /// Speed as shown to the user.
    pub fn speed_label(&self) -> String {
        if self.fast_mode { "Many".to_string() } else { self.ups.to_string() }
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(DEFAULT_UPS, DEFAULT_FPS)
    }
}
