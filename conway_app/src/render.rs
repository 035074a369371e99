// render.rs - Draws the board, shape outline and marking with an egui painter

use conway_engine::{MouseMode, Point, Session};
use egui::{Color32, Painter, Pos2, Rect, Vec2};

use crate::settings::Settings;

const BACKGROUND: Color32 = Color32::BLACK;
const TILE: Color32 = Color32::LIGHT_GRAY;
const OUTLINE: Color32 = Color32::DARK_GRAY;
const GRIDLINE: Color32 = Color32::from_gray(45);
const MARKING: Color32 = Color32::from_rgba_premultiplied(0, 0, 50, 50);

/// Pixel size of the whole board: gridlines only between cells.
pub fn canvas_size(settings: &Settings) -> Vec2 {
    let pitch = settings.pitch() as f32;
    let gap = settings.grid_width as f32;
    Vec2::new(settings.width as f32 * pitch - gap, settings.height as f32 * pitch - gap)
}

/// Cell under `pos`, for a board drawn with its top-left corner at `origin`.
/// May lie outside the board.
pub fn cell_at(settings: &Settings, origin: Pos2, pos: Pos2) -> Point {
    let pitch = settings.pitch() as f32;
    let local = pos - origin;
    Point::new((local.x / pitch).floor() as i32, (local.y / pitch).floor() as i32)
}

fn cell_rect(settings: &Settings, origin: Pos2, cell: Point, cells: Vec2) -> Rect {
    let pitch = settings.pitch() as f32;
    Rect::from_min_size(
        origin + Vec2::new(cell.x as f32 * pitch, cell.y as f32 * pitch),
        cells * pitch - Vec2::splat(settings.grid_width as f32),
    )
}

pub fn draw(painter: &Painter, origin: Pos2, settings: &Settings, session: &Session) {
    let size = canvas_size(settings);
    let board = Rect::from_min_size(origin, size);
    painter.rect_filled(board, 0.0, BACKGROUND);

    draw_gridlines(painter, board, settings);

    if session.mode() == MouseMode::Shape {
        let shape = session.current_shape();
        let center = shape.center();
        let at = session.pointer().pos.offset_by(-center.x, -center.y);
        for p in shape.points() {
            let rect = cell_rect(settings, origin, at.offset_by(p.x, p.y), Vec2::splat(1.0));
            painter.rect_filled(rect.intersect(board), 0.0, OUTLINE);
        }
    }

    for cell in session.grid().live_cells() {
        painter.rect_filled(cell_rect(settings, origin, cell, Vec2::splat(1.0)), 0.0, TILE);
    }

    if let Some(marking) = marking_overlay(session) {
        let span = Vec2::new(marking.width as f32, marking.height as f32);
        let rect = cell_rect(settings, origin, Point::new(marking.x, marking.y), span);
        painter.rect_filled(rect.intersect(board), 0.0, MARKING);
    }
}

/// Region to shade as marked; only shape mode marks.
fn marking_overlay(session: &Session) -> Option<conway_engine::Rect> {
    if session.mode() != MouseMode::Shape {
        return None;
    }
    session.pointer().marking()
}

fn draw_gridlines(painter: &Painter, board: Rect, settings: &Settings) {
    if settings.grid_width == 0 {
        return;
    }
    let pitch = settings.pitch() as f32;
    let gap = settings.grid_width as f32;
    for i in 1..settings.width {
        let x = board.min.x + i as f32 * pitch - gap;
        let line = Rect::from_min_size(Pos2::new(x, board.min.y), Vec2::new(gap, board.height()));
        painter.rect_filled(line, 0.0, GRIDLINE);
    }
    for i in 1..settings.height {
        let y = board.min.y + i as f32 * pitch - gap;
        let line = Rect::from_min_size(Pos2::new(board.min.x, y), Vec2::new(board.width(), gap));
        painter.rect_filled(line, 0.0, GRIDLINE);
    }
}
