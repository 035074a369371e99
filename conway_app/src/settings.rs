// settings.rs - Board settings and the start-up settings dialog

use eframe::egui;
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 50;
pub const DEFAULT_HEIGHT: u32 = 50;
pub const DEFAULT_TILE_SIZE: u32 = 15;
pub const DEFAULT_GRID_WIDTH: u32 = 0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("{field} must be a whole number of at least {min}, got {value:?}")]
    Invalid { field: &'static str, value: String, min: u32 },
}

/// Board size in cells, and how large each cell is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub width: u32,
    pub height: u32,
    pub tile_size: u32,     // pixels per cell
    pub grid_width: u32,    // pixels of gridline between cells
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
            grid_width: DEFAULT_GRID_WIDTH,
        }
    }
}

impl Settings {
    pub fn validate(self) -> Result<Self, SettingsError> {
        check("Width", self.width, 1)?;
        check("Height", self.height, 1)?;
        check("Tile Size", self.tile_size, 1)?;
        Ok(self)
    }

    /// Distance in pixels from one cell's origin to the next.
    pub fn pitch(&self) -> u32 {
        self.tile_size + self.grid_width
    }
}

fn check(field: &'static str, value: u32, min: u32) -> Result<u32, SettingsError> {
    if value < min {
        return Err(SettingsError::Invalid { field, value: value.to_string(), min });
    }
    Ok(value)
}

fn parse_field(field: &'static str, text: &str, min: u32) -> Result<u32, SettingsError> {
    let invalid = || SettingsError::Invalid { field, value: text.to_string(), min };
    let value: u32 = text.trim().parse().map_err(|_| invalid())?;
    if value < min {
        return Err(invalid());
    }
    Ok(value)
}

struct Input {
    label: &'static str,
    text: String,
    min: u32,
}

/// Text fields for each setting, checked when the user presses Start.
pub struct SettingsForm {
    inputs: [Input; 4],
}

impl SettingsForm {
    pub fn new(settings: Settings) -> Self {
        let input = |label, value: u32, min| Input { label, text: value.to_string(), min };
        Self {
            inputs: [
                input("Width", settings.width, 1),
                input("Height", settings.height, 1),
                input("Tile Size", settings.tile_size, 1),
                input("Grid Width", settings.grid_width, 0),
            ],
        }
    }

    /// Parse every field. Fields that fail are replaced with `error`.
    pub fn parse(&mut self) -> Result<Settings, Vec<SettingsError>> {
        let mut values = [0u32; 4];
        let mut errors = Vec::new();
        for (input, value) in self.inputs.iter_mut().zip(values.iter_mut()) {
            match parse_field(input.label, &input.text, input.min) {
                Ok(v) => *value = v,
                Err(e) => {
                    input.text = "error".to_string();
                    errors.push(e);
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }
        let [width, height, tile_size, grid_width] = values;
        Ok(Settings { width, height, tile_size, grid_width })
    }

    /// Draw the form. Returns true when Start was pressed.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut start = false;
        ui.heading("Game of Life");
        ui.separator();
        ui.horizontal(|ui| {
            egui::Grid::new("settings_form").num_columns(2).show(ui, |ui| {
                for input in &mut self.inputs {
                    ui.label(input.label);
                    ui.add(egui::TextEdit::singleline(&mut input.text).desired_width(100.0));
                    ui.end_row();
                }
            });
            if ui.button("Start").clicked() {
                start = true;
            }
        });
        start
    }
}
