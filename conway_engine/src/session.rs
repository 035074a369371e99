// session.rs - Owner of the grid, shape catalog and scheduler

use log::{debug, info};

use crate::catalog::Catalog;
use crate::geometry::{Point, Rect};
use crate::grid::Grid;
use crate::input::{MouseMode, Pointer};
use crate::scheduler::{Clock, FrameReport, Scheduler};
use crate::shape::Shape;

/// Everything one running simulation needs, driven from a single loop.
pub struct Session {
    grid: Grid,
    catalog: Catalog,
    scheduler: Scheduler,
    mode: MouseMode,
    current_shape: Shape,   // empty in tile mode
    pointer: Pointer,
}

impl Session {
    pub fn new(grid: Grid, catalog: Catalog, scheduler: Scheduler) -> Self {
        Self {
            grid,
            catalog,
            scheduler,
            mode: MouseMode::Tile,
            current_shape: Shape::EMPTY,
            pointer: Pointer::default(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    pub fn mode(&self) -> MouseMode {
        self.mode
    }

    /// Shape that a left click would stamp, and the renderer outlines.
    pub fn current_shape(&self) -> &Shape {
        &self.current_shape
    }

    pub fn pointer(&self) -> &Pointer {
        &self.pointer
    }

    pub fn pointer_mut(&mut self) -> &mut Pointer {
        &mut self.pointer
    }

    /// Run the generations due this frame.
    pub fn advance_frame<C: Clock + ?Sized>(&mut self, clock: &C) -> FrameReport {
        self.scheduler.run_frame(clock, &mut self.grid)
    }

    /// Single generation on demand; ignored unless paused.
    pub fn step(&mut self) -> bool {
        self.scheduler.step_once(&mut self.grid)
    }

    pub fn clear(&mut self) {
        self.grid.reset();
        info!("board cleared");
    }

    /// Toggle tile/shape mode. Buttons held in the old mode count as released
    /// and a marking in progress is dropped.
    pub fn switch_mode(&mut self) {
        self.pointer.release_all();
        self.mode = match self.mode {
            MouseMode::Tile => {
                self.current_shape = self.catalog.current().clone();
                MouseMode::Shape
            }
            MouseMode::Shape => {
                self.current_shape = Shape::EMPTY;
                MouseMode::Tile
            }
        };
        debug!("switched to {}", self.mode.label());
    }

    pub fn rotate_shape(&mut self) {
        self.current_shape = self.current_shape.rotated();
    }

    pub fn next_shape(&mut self) {
        self.catalog.cycle_forward();
        self.current_shape = self.catalog.current().clone();
    }

    pub fn previous_shape(&mut self) {
        self.catalog.cycle_backward();
        self.current_shape = self.catalog.current().clone();
    }

    /// Drop the selected catalog entry. Returns whether one was removed.
    pub fn delete_shape(&mut self) -> bool {
        let removed = self.catalog.delete_current().is_some();
        self.current_shape = self.catalog.current().clone();
        removed
    }

    /// Stamp the current shape centered on `at`.
    pub fn stamp(&mut self, at: Point) {
        self.grid.put_shape(at.x, at.y, &self.current_shape);
    }

    /// Stop outlining a shape while a region is being marked.
    pub fn hide_shape(&mut self) {
        self.current_shape = Shape::EMPTY;
    }

    /// Save the live cells in `region` as a new catalog entry and select it.
    /// Returns whether a shape was added.
    pub fn record(&mut self, region: Rect) -> bool {
        let added = self.catalog.add_shape(self.grid.get_shape(region));
        self.catalog.cycle_to_end();
        self.current_shape = self.catalog.current().clone();
        if added {
            info!("recorded shape of {} cells", self.current_shape.len());
        }
        added
    }

    /// Window title: run state, speed and mouse mode.
    pub fn title(&self) -> String {
        format!(
            "{} - {} Updates / sec - {}",
            if self.scheduler.is_paused() { "Paused" } else { "Running" },
            self.scheduler.speed_label(),
            self.mode.label(),
        )
    }
}
