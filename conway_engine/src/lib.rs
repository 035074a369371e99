// lib.rs - Incremental Conway's Game of Life engine
//
// The grid keeps a neighbor count per cell and a worklist of cells whose
// count moved, so one generation only touches cells near recent changes.

pub mod catalog;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod patterns;
pub mod scheduler;
pub mod session;
pub mod shape;

pub use catalog::{Catalog, MemoryStore, ShapeStore};
pub use error::{LifeError, StoreError};
pub use geometry::{Point, Rect};
pub use grid::Grid;
pub use input::{Button, Effect, Key, MouseMode, PointerEvent};
pub use scheduler::{Clock, FrameReport, MonotonicClock, Scheduler, Stepper};
pub use session::Session;
pub use shape::Shape;
