/// Main `eframe::App` implementation for Indexicate.
///
/// This is the top-level layout that composes all panels, widgets and the
/// modal windows (About, delete confirmation, errors).
use crate::dialogs::NativeDialogService;
use crate::panels;
use crate::state::{AppPhase, AppState};
use crate::theme::IndexicateTheme;
use crate::widgets;
use indexicate_core::settings::Settings;
use std::path::PathBuf;
use tracing::info;

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so the initial
/// scan is already running when the first frame is drawn.
pub struct IndexicateState {
    pub(crate) inner: AppState,
}

impl IndexicateState {
    /// Build the state and start scanning the initial folder, if any.
    pub fn build(
        cli_path: Option<PathBuf>,
        settings: Settings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        let start = initial_directory(cli_path, &settings);
        let mut state = AppState::new(settings, settings_path, Box::new(NativeDialogService));
        if let Some(dir) = start {
            info!("Scanning {} on startup", dir.display());
            state.start_scan(dir);
        }
        Self { inner: state }
    }
}

/// The folder to scan at launch: the command-line path, else the last
/// folder when the user asked for it to be reopened.
pub fn initial_directory(cli_path: Option<PathBuf>, settings: &Settings) -> Option<PathBuf> {
    cli_path.or_else(|| {
        settings
            .last_directory
            .clone()
            .filter(|_| settings.reopen_last_directory)
            .filter(|dir| dir.is_dir())
    })
}

/// The Indexicate application.
pub struct IndexicateApp {
    state: AppState,
    /// Theme currently applied to the context, to avoid restyling each frame.
    applied_dark_mode: Option<bool>,
}

impl IndexicateApp {
    /// Create the application from pre-built state.
    pub fn with_state(_cc: &eframe::CreationContext<'_>, state: IndexicateState) -> Self {
        Self {
            state: state.inner,
            applied_dark_mode: None,
        }
    }

    fn about_window(&mut self, ctx: &egui::Context) {
        let mut show_about = self.state.show_about;
        egui::Window::new("About Indexicate")
            .open(&mut show_about)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size([320.0, 0.0])
            .show(ctx, |ui| {
                let accent = ui.visuals().hyperlink_color;
                let muted = ui.visuals().weak_text_color();
                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("\u{1f5c2} Indexicate")
                            .size(24.0)
                            .strong()
                            .color(accent),
                    );
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .size(13.0)
                            .color(muted),
                    );
                    ui.add_space(12.0);
                    ui.label(
                        "Browse a folder as a tree grouped by file type,\n\
                         filter it by name or category, and open, move\n\
                         or delete entries.",
                    );
                    ui.add_space(12.0);
                    ui.label(
                        egui::RichText::new("Built with Rust & egui")
                            .size(11.0)
                            .color(muted),
                    );
                    ui.add_space(8.0);
                });
            });
        self.state.show_about = show_about;
    }

    fn delete_confirmation(&mut self, ctx: &egui::Context) {
        let Some(pending) = self.state.pending_delete.clone() else {
            return;
        };
        let mode = self.state.settings.delete_mode;
        let mut confirmed = false;
        let mut cancelled = false;

        egui::Modal::new(egui::Id::new("confirm_delete")).show(ctx, |ui| {
            ui.set_width(340.0);
            ui.heading("Delete");
            ui.add_space(6.0);
            let what = if pending.is_dir { "folder" } else { "file" };
            ui.label(format!("Delete the {what} '{}'?", pending.name));
            ui.label(
                egui::RichText::new(pending.path.to_string_lossy())
                    .size(11.0)
                    .color(ui.visuals().weak_text_color()),
            );
            if pending.is_dir {
                ui.label("Everything inside it is deleted too.");
            }
            ui.add_space(4.0);
            ui.label(egui::RichText::new(mode.label()).italics());
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Delete").clicked() {
                    confirmed = true;
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });
        });

        if confirmed {
            self.state.confirm_delete();
        } else if cancelled || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.state.cancel_delete();
        }
    }

    fn error_window(&mut self, ctx: &egui::Context) {
        let Some(message) = self.state.error_message.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Modal::new(egui::Id::new("action_error")).show(ctx, |ui| {
            ui.set_width(340.0);
            ui.heading("Error");
            ui.add_space(6.0);
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.state.error_message = None;
        }
    }

    fn scan_errors_window(&mut self, ctx: &egui::Context) {
        let mut open = self.state.show_errors;
        egui::Window::new("Unreadable entries")
            .open(&mut open)
            .default_size([480.0, 260.0])
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (path, message) in &self.state.scan_errors {
                        ui.label(egui::RichText::new(path).strong().size(12.0));
                        ui.label(
                            egui::RichText::new(message)
                                .size(11.0)
                                .color(ui.visuals().weak_text_color()),
                        );
                        ui.add_space(2.0);
                    }
                });
            });
        self.state.show_errors = open;
    }

    /// Keyboard shortcuts on the selected entry, ignored while a text
    /// field has focus or a modal is up.
    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.memory(|m| m.focused().is_some())
            || self.state.pending_delete.is_some()
            || self.state.error_message.is_some()
        {
            return;
        }
        let Some(node) = self.state.selected_node else {
            return;
        };
        let (enter, delete) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Delete),
            )
        });
        if enter {
            if let Some(row) = self
                .state
                .visible_rows
                .iter()
                .position(|r| r.node_index == node)
            {
                self.state.activate_row(row);
            }
        } else if delete {
            self.state.request_delete(node);
        }
    }
}

impl eframe::App for IndexicateApp {
    /// Clear to the panel colour so there is no flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        let dark = self.state.settings.dark_mode;
        if self.applied_dark_mode != Some(dark) {
            IndexicateTheme::for_mode(dark).apply(ctx);
            self.applied_dark_mode = Some(dark);
        }

        // ── Process background messages ───────────────────────────────────
        self.state.process_scan_messages();
        if self.state.phase == AppPhase::Scanning {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ── Menu bar and toolbar ──────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Choose folder…").clicked() {
                            ui.close_menu();
                            self.state.choose_folder();
                        }
                        ui.separator();
                        if ui.button("Exit").clicked() {
                            ui.close_menu();
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &mut self.state);
                ui.add_space(2.0);
            });

        // ── Left sidebar ──────────────────────────────────────────────────
        egui::SidePanel::left("options_panel")
            .default_width(240.0)
            .min_width(200.0)
            .max_width(360.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::options_panel::options_panel(ui, &mut self.state);
                });
            });

        // ── Right details panel ───────────────────────────────────────────
        egui::SidePanel::right("details_panel")
            .default_width(240.0)
            .min_width(180.0)
            .max_width(380.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::details_panel::details_panel(ui, &mut self.state);
                    ui.add_space(16.0);
                    ui.separator();
                    ui.add_space(8.0);
                    panels::summary_panel::summary_panel(ui, &self.state);
                });
            });

        // ── Central panel (tree) ──────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tree_panel::tree_panel(ui, &mut self.state);
        });

        // ── Windows ───────────────────────────────────────────────────────
        self.about_window(ctx);
        self.scan_errors_window(ctx);
        self.delete_confirmation(ctx);
        self.error_window(ctx);
        self.handle_shortcuts(ctx);
    }
}
