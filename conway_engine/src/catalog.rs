// catalog.rs - Ordered shape collection with a wrapping cursor

use std::cell::{Cell, RefCell};

use crate::error::StoreError;
use crate::shape::Shape;

/// Where the catalog's shapes live between runs.
pub trait ShapeStore {
    fn load(&self) -> Result<Vec<Shape>, StoreError>;
    fn save(&self, shapes: &[Shape]) -> Result<(), StoreError>;
}

/// Keeps shapes in memory only. Used when no file is wanted, and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    shapes: RefCell<Vec<Shape>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self { shapes: RefCell::new(shapes), saves: Cell::new(0) }
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes.borrow().clone()
    }
}

impl ShapeStore for MemoryStore {
    fn load(&self) -> Result<Vec<Shape>, StoreError> {
        Ok(self.shapes.borrow().clone())
    }

    fn save(&self, shapes: &[Shape]) -> Result<(), StoreError> {
        *self.shapes.borrow_mut() = shapes.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

static EMPTY: Shape = Shape::EMPTY;

/// Shapes in insertion order plus the index of the selected one.
///
/// The cursor is always a valid index while the catalog is non-empty.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    shapes: Vec<Shape>,
    cursor: usize,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from a loaded list. Empty shapes are dropped.
    pub fn from_shapes(shapes: Vec<Shape>) -> Self {
        let shapes = shapes.into_iter().filter(|s| !s.is_empty()).collect();
        Self { shapes, cursor: 0 }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Selected shape, or the empty shape when there is none.
    pub fn current(&self) -> &Shape {
        self.shapes.get(self.cursor).unwrap_or(&EMPTY)
    }

    pub fn cycle_forward(&mut self) {
        if self.shapes.is_empty() {
            return;
        }
        self.cursor = (self.cursor + 1) % self.shapes.len();
    }

    pub fn cycle_backward(&mut self) {
        if self.shapes.is_empty() {
            return;
        }
        let len = self.shapes.len() as isize;
        self.cursor = (self.cursor as isize - 1).rem_euclid(len) as usize;
    }

    pub fn cycle_to_end(&mut self) {
        if let Some(last) = self.shapes.len().checked_sub(1) {
            self.cursor = last;
        }
    }

    /// Remove the selected shape and return it.
    pub fn delete_current(&mut self) -> Option<Shape> {
        if self.shapes.is_empty() {
            return None;
        }
        let removed = self.shapes.remove(self.cursor);
        if !self.shapes.is_empty() {
            self.cursor %= self.shapes.len();
        } else {
            self.cursor = 0;
        }
        Some(removed)
    }

    /// Append `shape` unless it is empty. Returns whether it was added.
    pub fn add_shape(&mut self, shape: Shape) -> bool {
        if shape.is_empty() {
            return false;
        }
        self.shapes.push(shape);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    fn bar(len: i32) -> Shape {
        Shape::new((0..len).map(|x| Point::new(x, 0)))
    }

    fn catalog_of(n: i32) -> Catalog {
        Catalog::from_shapes((1..=n).map(bar).collect())
    }

    #[test]
    fn empty_catalog_is_inert() {
        let mut catalog = Catalog::new();
        assert!(catalog.current().is_empty());
        catalog.cycle_forward();
        catalog.cycle_backward();
        catalog.cycle_to_end();
        assert_eq!(catalog.cursor(), 0);
        assert_eq!(catalog.delete_current(), None);
    }

    #[test]
    fn backward_from_zero_wraps_to_last() {
        let mut catalog = catalog_of(4);
        catalog.cycle_backward();
        assert_eq!(catalog.cursor(), 3);
        assert_eq!(catalog.current(), &bar(4));
    }

    #[test]
    fn forward_from_last_wraps_to_zero() {
        let mut catalog = catalog_of(3);
        catalog.cycle_to_end();
        assert_eq!(catalog.cursor(), 2);
        catalog.cycle_forward();
        assert_eq!(catalog.cursor(), 0);
    }

    #[test]
    fn add_rejects_empty_shapes() {
        let mut catalog = Catalog::new();
        assert!(!catalog.add_shape(Shape::EMPTY));
        assert!(catalog.add_shape(bar(2)));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn from_shapes_drops_empty_entries() {
        let catalog = Catalog::from_shapes(vec![Shape::EMPTY, bar(1), Shape::EMPTY]);
        assert_eq!(catalog.shapes(), &[bar(1)]);
    }

    #[test]
    fn delete_reclamps_cursor() {
        let mut catalog = catalog_of(3);
        catalog.cycle_to_end();
        assert_eq!(catalog.delete_current(), Some(bar(3)));
        assert_eq!(catalog.cursor(), 0);
        assert_eq!(catalog.current(), &bar(1));

        catalog.cycle_forward();
        assert_eq!(catalog.delete_current(), Some(bar(2)));
        assert_eq!(catalog.cursor(), 0);
        assert_eq!(catalog.delete_current(), Some(bar(1)));
        assert!(catalog.is_empty());
        assert!(catalog.current().is_empty());
    }

    #[test]
    fn delete_in_middle_keeps_position() {
        let mut catalog = catalog_of(4);
        catalog.cycle_forward();
        catalog.delete_current();
        assert_eq!(catalog.cursor(), 1);
        assert_eq!(catalog.current(), &bar(3));
    }

    #[test]
    fn memory_store_keeps_order() {
        let store = MemoryStore::default();
        let shapes = vec![bar(3), bar(1), bar(2)];
        store.save(&shapes).unwrap();
        assert_eq!(store.load().unwrap(), shapes);
        assert_eq!(store.saves(), 1);
    }
}
