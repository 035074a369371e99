// ui.rs - eframe application: settings screen, then the running board

use std::time::Duration;

use conway_engine::input::{handle_key, handle_pointer};
use conway_engine::{
    Button, Catalog, Clock, Effect, Grid, Key, MonotonicClock, Point, PointerEvent, Scheduler,
    Session, Shape,
};
use eframe::egui;
use egui::{PointerButton, Sense};
use log::{error, info};

use crate::render;
use crate::settings::{Settings, SettingsForm};
use crate::store::{self, JsonFileStore};

const KEYS: [(egui::Key, Key); 7] = [
    (egui::Key::Space, Key::Space),
    (egui::Key::C, Key::C),
    (egui::Key::D, Key::D),
    (egui::Key::F, Key::F),
    (egui::Key::ArrowUp, Key::ArrowUp),
    (egui::Key::ArrowLeft, Key::ArrowLeft),
    (egui::Key::ArrowRight, Key::ArrowRight),
];

/// Options taken from the command line.
pub struct Launch {
    pub settings: Settings,
    pub skip_settings: bool,
    pub shapes: Vec<Shape>,
    pub ups: u32,
    pub fast: bool,
}

enum Screen {
    Settings { form: SettingsForm, problem: Option<String> },
    Game(Box<Game>),
}

pub struct LifeApp {
    screen: Screen,
    store: JsonFileStore,
    shapes: Vec<Shape>,     // handed to the catalog when the game starts
    ups: u32,
    fast: bool,
    save_error: Option<String>,
}

struct Game {
    session: Session,
    settings: Settings,
    clock: MonotonicClock,
    last_cell: Option<Point>,
    shift_was_down: bool,
    title: String,
}

impl LifeApp {
    pub fn new(launch: Launch, store: JsonFileStore) -> Self {
        let mut app = Self {
            screen: Screen::Settings { form: SettingsForm::new(launch.settings), problem: None },
            store,
            shapes: launch.shapes,
            ups: launch.ups,
            fast: launch.fast,
            save_error: None,
        };
        if launch.skip_settings {
            if let Err(problem) = app.start(launch.settings) {
                error!("{problem}");
            }
        }
        app
    }

    fn start(&mut self, settings: Settings) -> Result<(), String> {
        let settings = settings.validate().map_err(|e| e.to_string())?;
        let grid = Grid::new(settings.width as usize, settings.height as usize)
            .map_err(|e| e.to_string())?;
        let mut scheduler = Scheduler::new(self.ups, conway_engine::scheduler::DEFAULT_FPS);
        scheduler.set_fast(self.fast);
        let catalog = Catalog::from_shapes(std::mem::take(&mut self.shapes));
        info!(
            "starting {}x{} board with {} shapes",
            settings.width,
            settings.height,
            catalog.len()
        );
        self.screen = Screen::Game(Box::new(Game {
            session: Session::new(grid, catalog, scheduler),
            settings,
            clock: MonotonicClock::new(),
            last_cell: None,
            shift_was_down: false,
            title: String::new(),
        }));
        Ok(())
    }

    fn show_settings(&mut self, ctx: &egui::Context) {
        let Screen::Settings { form, problem } = &mut self.screen else {
            return;
        };
        let mut chosen = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            if form.show(ui) {
                match form.parse() {
                    Ok(settings) => chosen = Some(settings),
                    Err(errors) => {
                        let text: Vec<_> = errors.iter().map(ToString::to_string).collect();
                        *problem = Some(text.join("\n"));
                    }
                }
            }
            if let Some(problem) = problem.as_deref() {
                ui.colored_label(egui::Color32::RED, problem);
            }
        });
        if let Some(settings) = chosen {
            if let Err(e) = self.start(settings) {
                if let Screen::Settings { problem, .. } = &mut self.screen {
                    *problem = Some(e);
                }
            }
        }
    }

    fn show_save_error(&mut self, ctx: &egui::Context) {
        let Some(message) = &self.save_error else {
            return;
        };
        let mut retry = false;
        let mut dismiss = false;
        egui::Window::new("Could not save shapes")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(message.as_str());
                ui.label(format!("File: {}", self.store.path().display()));
                ui.horizontal(|ui| {
                    retry = ui.button("Try again").clicked();
                    dismiss = ui.button("Dismiss").clicked();
                });
            });
        if dismiss {
            self.save_error = None;
        } else if retry {
            if let Screen::Game(game) = &self.screen {
                self.save_error = store::persist(&self.store, game.session.catalog().shapes());
            }
        }
    }
}

impl Game {
    /// Translate this frame's keyboard and pointer input into engine events.
    fn feed_input(&mut self, ctx: &egui::Context, canvas: &egui::Response) -> bool {
        let mut catalog_changed = false;
        let mut apply = |effect: Effect| catalog_changed |= effect == Effect::CatalogChanged;

        let (pressed, shift, pos, buttons) = ctx.input(|i| {
            let pressed: Vec<Key> = KEYS
                .iter()
                .filter(|(egui_key, _)| i.key_pressed(*egui_key))
                .map(|&(_, key)| key)
                .collect();
            let buttons = [
                (Button::Left, PointerButton::Primary),
                (Button::Right, PointerButton::Secondary),
            ]
            .map(|(button, egui_button)| {
                (button, i.pointer.button_pressed(egui_button), i.pointer.button_released(egui_button))
            });
            (pressed, i.modifiers.shift, i.pointer.latest_pos(), buttons)
        });

        if shift && !self.shift_was_down {
            apply(handle_key(&mut self.session, Key::Shift));
        }
        self.shift_was_down = shift;
        for key in pressed {
            apply(handle_key(&mut self.session, key));
        }

        if let Some(pos) = pos {
            let cell = render::cell_at(&self.settings, canvas.rect.min, pos);
            if self.last_cell != Some(cell) {
                self.last_cell = Some(cell);
                apply(handle_pointer(&mut self.session, PointerEvent::Moved(cell)));
            }
        }
        for (button, down, up) in buttons {
            if down && canvas.hovered() {
                apply(handle_pointer(&mut self.session, PointerEvent::Pressed(button)));
            }
            if up {
                apply(handle_pointer(&mut self.session, PointerEvent::Released(button)));
            }
        }
        catalog_changed
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let title = self.session.title();
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }

    fn schedule_repaint(&mut self, ctx: &egui::Context, started: Duration) {
        let changed = self.session.grid_mut().take_changed();
        let scheduler = self.session.scheduler();
        if !scheduler.is_paused() {
            match scheduler.remaining(started, self.clock.now()) {
                Some(rest) => ctx.request_repaint_after(rest),
                None => ctx.request_repaint(),
            }
        } else if changed {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for LifeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if matches!(self.screen, Screen::Settings { .. }) {
            self.show_settings(ctx);
            return;
        }
        let Screen::Game(game) = &mut self.screen else {
            return;
        };

        let report = game.session.advance_frame(&game.clock);

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!("Generation: {}", game.session.grid().generation()));
                ui.separator();
                ui.label(format!("Population: {}", game.session.grid().population()));
                ui.separator();
                ui.label(format!("Shapes: {}", game.session.catalog().len()));
            });
        });

        let mut catalog_changed = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| {
                let size = render::canvas_size(&game.settings);
                let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
                catalog_changed = game.feed_input(ctx, &response);
                render::draw(&painter, response.rect.min, &game.settings, &game.session);
            });
        });

        game.sync_title(ctx);
        game.schedule_repaint(ctx, report.started);

        if catalog_changed {
            let shapes = game.session.catalog().shapes();
            self.save_error = store::persist(&self.store, shapes);
        }
        self.show_save_error(ctx);
    }
}
