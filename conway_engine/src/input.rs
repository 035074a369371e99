// input.rs - Keyboard and pointer dispatch for a session
//
// Events arrive already translated into grid-cell space. Each handler takes
// the session by `&mut` plus the event, and reports whether the shape
// catalog needs saving.

use log::debug;

use crate::geometry::{Point, Rect};
use crate::session::Session;

/// What the pointer does on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MouseMode {
    /// Paint single cells alive (left) or dead (right).
    #[default]
    Tile,
    /// Stamp the current shape (left) or record a marked region (right).
    Shape,
}

impl MouseMode {
    pub fn label(self) -> &'static str {
        match self {
            MouseMode::Tile => "Tile mode",
            MouseMode::Shape => "Shape mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    Shift,
    C,
    D,
    F,
    ArrowUp,
    ArrowLeft,
    ArrowRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    /// Button went down at the current pointer cell.
    Pressed(Button),
    /// Button came up at the current pointer cell.
    Released(Button),
    /// Pointer entered a new cell.
    Moved(Point),
}

/// Follow-up work the caller owes after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Effect {
    None,
    /// The catalog's shape list changed and should be persisted.
    CatalogChanged,
}

/// Pointer position in cells, held buttons and the marking anchor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pointer {
    pub pos: Point,
    pub left_down: bool,
    pub right_down: bool,
    mark_start: Option<Point>,
}

impl Pointer {
    pub fn is_marking(&self) -> bool {
        self.mark_start.is_some()
    }

    /// Region spanned from where marking began to the current cell.
    pub fn marking(&self) -> Option<Rect> {
        self.mark_start.map(|start| Rect::spanning(start, self.pos))
    }

    fn start_marking(&mut self) {
        self.mark_start = Some(self.pos);
    }

    fn end_marking(&mut self) -> Option<Rect> {
        let rect = self.marking();
        self.mark_start = None;
        rect
    }

    /// Forget held buttons and any marking in progress, keeping the position.
    pub(crate) fn release_all(&mut self) {
        *self = Pointer { pos: self.pos, ..Pointer::default() };
    }
}

pub fn handle_key(session: &mut Session, key: Key) -> Effect {
    match key {
        Key::Space => {
            session.scheduler_mut().toggle_paused();
            return Effect::None;
        }
        Key::Shift => {
            session.switch_mode();
            return Effect::None;
        }
        Key::C => {
            session.clear();
            return Effect::None;
        }
        Key::F => {
            session.scheduler_mut().toggle_fast();
            return Effect::None;
        }
        _ => {}
    }

    match (session.mode(), key) {
        (MouseMode::Tile, Key::ArrowUp) => {
            session.step();
        }
        (MouseMode::Tile, Key::ArrowLeft) => session.scheduler_mut().slow_down(),
        (MouseMode::Tile, Key::ArrowRight) => session.scheduler_mut().speed_up(),
        (MouseMode::Shape, Key::ArrowUp) => session.rotate_shape(),
        (MouseMode::Shape, Key::ArrowLeft) => session.previous_shape(),
        (MouseMode::Shape, Key::ArrowRight) => session.next_shape(),
        (MouseMode::Shape, Key::D) => {
            if session.delete_shape() {
                return Effect::CatalogChanged;
            }
        }
        _ => {}
    }
    Effect::None
}

pub fn handle_pointer(session: &mut Session, event: PointerEvent) -> Effect {
    match session.mode() {
        MouseMode::Tile => tile_pointer(session, event),
        MouseMode::Shape => shape_pointer(session, event),
    }
}

fn tile_pointer(session: &mut Session, event: PointerEvent) -> Effect {
    match event {
        PointerEvent::Pressed(button) => {
            press(session.pointer_mut(), button);
            let pos = session.pointer().pos;
            session.grid_mut().set_tile(pos.x, pos.y, button == Button::Left);
        }
        PointerEvent::Released(button) => release(session.pointer_mut(), button),
        PointerEvent::Moved(pos) => {
            let pointer = session.pointer_mut();
            pointer.pos = pos;
            let (left, right) = (pointer.left_down, pointer.right_down);
            if left || right {
                session.grid_mut().set_tile(pos.x, pos.y, left);
            }
        }
    }
    Effect::None
}

fn shape_pointer(session: &mut Session, event: PointerEvent) -> Effect {
    match event {
        PointerEvent::Pressed(Button::Left) => {
            press(session.pointer_mut(), Button::Left);
            let pos = session.pointer().pos;
            session.stamp(pos);
        }
        PointerEvent::Pressed(Button::Right) => {
            let pointer = session.pointer_mut();
            press(pointer, Button::Right);
            pointer.start_marking();
            session.hide_shape();
        }
        PointerEvent::Released(Button::Right) => {
            release(session.pointer_mut(), Button::Right);
            if let Some(rect) = session.pointer_mut().end_marking() {
                debug!("recording region {rect:?}");
                if session.record(rect) {
                    return Effect::CatalogChanged;
                }
            }
        }
        PointerEvent::Released(button) => release(session.pointer_mut(), button),
        PointerEvent::Moved(pos) => session.pointer_mut().pos = pos,
    }
    Effect::None
}

fn press(pointer: &mut Pointer, button: Button) {
    match button {
        Button::Left => pointer.left_down = true,
        Button::Right => pointer.right_down = true,
    }
}

fn release(pointer: &mut Pointer, button: Button) {
    match button {
        Button::Left => pointer.left_down = false,
        Button::Right => pointer.right_down = false,
    }
}
