use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText};
use record_confirm_common::imaging::decode_or_warn;
use record_confirm_common::{Bitmap, Config, ImageRef, ImageSlot, RecordForm, Session};
use tracing::{debug, warn};

use crate::model::{FormState, Notice, NoticeKind};

pub struct DesktopApp {
    session: Session,
    config: Config,
    state: FormState,
    search_term: String,
    notice: Option<Notice>,
    status: String,
    images: HashMap<String, ImageState>,
    /// bumped per opened document, part of every image key
    generation: u64,
    image_rx: Receiver<ImageData>,
    image_tx: Sender<ImageData>,
}

enum ImageState {
    Loading,
    Ready(egui::TextureHandle),
    Failed(String),
}

struct ImageData {
    key: String,
    result: std::result::Result<Bitmap, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    Open,
    Search,
    Previous,
    Next,
    Modify,
}

impl DesktopApp {
    pub fn new(config: Config) -> Result<Self> {
        let session = Session::with_config(&config).context("start save worker")?;
        let (image_tx, image_rx) = mpsc::channel();
        let mut app = Self {
            session,
            config,
            state: FormState::default(),
            search_term: String::new(),
            notice: None,
            status: String::new(),
            images: HashMap::new(),
            generation: 0,
            image_rx,
            image_tx,
        };
        app.load_default();
        Ok(app)
    }

    fn load_default(&mut self) {
        match self.session.open_default(&self.config) {
            Ok(Some(form)) => self.show_form(form),
            Ok(None) => {}
            Err(err) => self.notice = Some(Notice::error(err.to_string())),
        }
    }

    fn open_file(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON Files", &["json"])
            .pick_file()
        else {
            return;
        };
        self.load_from_path(&path);
    }

    fn load_from_path(&mut self, path: &Path) {
        match self.session.open(path) {
            Ok(form) => {
                self.images.clear();
                self.generation += 1;
                self.status = format!("Loaded {}", path.display());
                match form {
                    Some(form) => self.show_form(form),
                    None => self.state.clear(),
                }
            }
            Err(err) => self.notice = Some(Notice::error(err.to_string())),
        }
    }

    fn search(&mut self) {
        match self.session.search(&self.search_term) {
            Ok(form) => self.show_form(form),
            Err(err) if err.is_not_found() => {
                self.notice = Some(Notice::info("Not Found", "Record not found."));
            }
            Err(err) => self.notice = Some(Notice::error(err.to_string())),
        }
    }

    fn modify(&mut self) {
        let result = self
            .session
            .modify(&self.state.confirmed_identifier, &self.state.confirmed_results);
        match result {
            Ok(Some(form)) => self.show_form(form),
            Ok(None) => {}
            // keep the text as typed
            Err(err) => self.notice = Some(Notice::error(err.to_string())),
        }
    }

    fn show_form(&mut self, form: RecordForm) {
        debug!(index = form.index, "display record");
        let prefix = image_key_prefix(self.generation, form.index);
        // textures of other records are released; late decodes are ignored
        self.images.retain(|key, _| key.starts_with(&prefix));
        self.state.show(form);
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::Open => self.open_file(),
            Action::Search => self.search(),
            Action::Previous => {
                if let Some(form) = self.session.show_previous() {
                    self.show_form(form);
                }
            }
            Action::Next => {
                if let Some(form) = self.session.show_next() {
                    self.show_form(form);
                }
            }
            Action::Modify => self.modify(),
        }
    }

    fn request_image(&mut self, key: &str, image: &ImageRef) {
        if self.images.contains_key(key) {
            return;
        }
        self.images.insert(key.to_string(), ImageState::Loading);
        let sender = self.image_tx.clone();
        let key = key.to_string();
        let image = image.clone();
        let base_dir: Option<PathBuf> = self.session.base_dir().map(Path::to_path_buf);
        let max_edge = self.config.max_image_edge;

        std::thread::spawn(move || {
            let result = decode_or_warn(&image, base_dir.as_deref(), max_edge);
            let _ = sender.send(ImageData { key, result });
        });
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.image_rx.try_recv() {
            // stale result from a document that is no longer open
            if !self.images.contains_key(&msg.key) {
                continue;
            }
            let state = match msg.result {
                Ok(bitmap) => {
                    let color_image =
                        egui::ColorImage::from_rgba_unmultiplied(bitmap.size(), &bitmap.pixels);
                    ImageState::Ready(ctx.load_texture(&msg.key, color_image, egui::TextureOptions::default()))
                }
                Err(reason) => ImageState::Failed(reason),
            };
            self.images.insert(msg.key, state);
        }

        for outcome in self.session.poll_saves() {
            match outcome.result {
                Ok(()) => self.status = format!("Saved {}", outcome.path.display()),
                Err(err) => {
                    warn!(path = %outcome.path.display(), error = %err, "save failed");
                    self.status = format!("Save failed: {err}");
                }
            }
        }
    }

    fn render_image(&mut self, ui: &mut egui::Ui, index: usize, name: &str, slot: &ImageSlot) {
        let Some(image) = slot.image() else {
            return;
        };
        let key = format!("{}{name}", image_key_prefix(self.generation, index));
        self.request_image(&key, image);
        match self.images.get(&key) {
            Some(ImageState::Ready(texture)) => {
                ui.add(egui::Image::new(texture).fit_to_exact_size(texture.size_vec2()));
            }
            Some(ImageState::Failed(reason)) => {
                ui.label(RichText::new(format!("Image unavailable: {reason}")).color(Color32::from_rgb(220, 90, 90)));
            }
            Some(ImageState::Loading) | None => {
                ui.label("Loading...");
            }
        }
    }

    fn render_record(&mut self, ui: &mut egui::Ui) {
        let Some(form) = self.state.form.clone() else {
            ui.label("Open a JSON file to start.");
            return;
        };

        egui::Grid::new("identifier_grid").num_columns(2).show(ui, |ui| {
            ui.label("Identifier:");
            ui.label(&form.identifier);
            ui.end_row();

            ui.label("Confirmed identifier:");
            ui.add(egui::TextEdit::singleline(&mut self.state.confirmed_identifier).desired_width(f32::INFINITY));
            ui.end_row();
        });

        ui.vertical_centered(|ui| ui.label("Identifier image"));
        self.render_image(ui, form.index, "identifier", &form.identifier_image);

        egui::Grid::new("results_grid").num_columns(2).show(ui, |ui| {
            ui.label("Results:");
            ui.label(&form.results);
            ui.end_row();

            ui.label("Confirmed results:");
            ui.add(egui::TextEdit::singleline(&mut self.state.confirmed_results).desired_width(f32::INFINITY));
            ui.end_row();
        });

        ui.vertical_centered(|ui| ui.label("Results images"));
        self.render_image(ui, form.index, "result", &form.result_image);
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else {
            return;
        };
        let color = match notice.kind {
            NoticeKind::Error => Color32::from_rgb(220, 90, 90),
            NoticeKind::Info => Color32::from_gray(200),
        };
        let mut dismissed = false;
        egui::Window::new(&notice.title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(RichText::new(&notice.message).color(color));
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed {
            self.notice = None;
        }
    }
}

/// Shared start of the image keys of one record.
fn image_key_prefix(generation: u64, index: usize) -> String {
    format!("{generation}:{index}:")
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let loading = self.images.values().any(|s| matches!(s, ImageState::Loading));
        if loading || self.session.has_pending_saves() {
            ctx.request_repaint();
        }
        self.poll_messages(ctx);

        let enabled = self.notice.is_none();
        let mut action = None;

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Open File").clicked() {
                            action = Some(Action::Open);
                            ui.close_menu();
                        }
                    });
                    ui.separator();
                    if let Some(path) = self.session.path() {
                        ui.label(RichText::new(path.display().to_string()).color(Color32::from_gray(170)));
                    }
                });
            });
        });

        egui::TopBottomPanel::bottom("bottom").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    ui.label("Identifier to find:");
                    let width = ui.available_width() - 80.0;
                    let response =
                        ui.add(egui::TextEdit::singleline(&mut self.search_term).desired_width(width));
                    let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if ui.button("Search").clicked() || submitted {
                        action = Some(Action::Search);
                    }
                });
                ui.add_space(6.0);
                ui.horizontal(|ui| {
                    let form = self.state.form.as_ref();
                    let has_prev = form.is_some_and(|f| !f.is_first());
                    let has_next = form.is_some_and(|f| !f.is_last());
                    if ui.add_enabled(has_prev, egui::Button::new("Show previous")).clicked() {
                        action = Some(Action::Previous);
                    }
                    if ui.add_enabled(form.is_some(), egui::Button::new("Modify")).clicked() {
                        action = Some(Action::Modify);
                    }
                    if ui.add_enabled(has_next, egui::Button::new("Show next")).clicked() {
                        action = Some(Action::Next);
                    }
                    if let Some(form) = form {
                        ui.label(format!("{}/{}", form.index + 1, form.total));
                    }
                    if !self.status.is_empty() {
                        ui.separator();
                        ui.label(RichText::new(&self.status).color(Color32::from_gray(170)));
                    }
                });
                ui.add_space(6.0);
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    self.render_record(ui);
                });
            });
        });

        self.render_notice(ctx);

        if let Some(action) = action {
            self.apply(action);
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_key_prefix_separates_records() {
        let current = image_key_prefix(3, 1);
        assert!(format!("{current}identifier").starts_with(&current));
        assert!(!format!("{}result", image_key_prefix(3, 12)).starts_with(&current));
        assert!(!format!("{}result", image_key_prefix(2, 1)).starts_with(&current));
    }
}
