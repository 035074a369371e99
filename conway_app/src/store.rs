// store.rs - Shape catalog persisted as a JSON file

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use conway_engine::{Shape, ShapeStore, StoreError};
use log::{error, info};

pub const DEFAULT_PATH: &str = "shapes.json";

/// JSON array of `{"points": [...], "middle": {...}}` records.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ShapeStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Shape>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, shapes: &[Shape]) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(shapes)?;
        // write beside the target, then swap in
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Load the catalog, falling back to an empty list when the store fails.
pub fn load_or_empty(store: &dyn ShapeStore, path: &Path) -> Vec<Shape> {
    match store.load() {
        Ok(shapes) => {
            info!("loaded {} shapes from {}", shapes.len(), path.display());
            shapes
        }
        Err(e) => {
            error!("could not load shapes from {}: {e}", path.display());
            Vec::new()
        }
    }
}

/// Save the catalog. On failure, logs and returns the message to show.
pub fn persist(store: &dyn ShapeStore, shapes: &[Shape]) -> Option<String> {
    match store.save(shapes) {
        Ok(()) => None,
        Err(e) => {
            error!("could not save shapes: {e}");
            Some(e.to_string())
        }
    }
}
