/// Top action bar: folder controls, the filter box, theme toggle and About.
use crate::state::{AppPhase, AppState};
use egui::Ui;

/// Draw the toolbar.
pub fn toolbar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new("\u{1f5c2} Indexicate")
                .size(18.0)
                .strong()
                .color(ui.visuals().hyperlink_color),
        );

        ui.separator();

        let scanning = state.phase == AppPhase::Scanning;

        if ui
            .add(egui::Button::new("\u{1f4c2} Choose folder…").min_size(egui::vec2(110.0, 28.0)))
            .on_hover_text("Pick a folder to index")
            .clicked()
        {
            state.choose_folder();
        }

        let can_refresh = !scanning && state.current_root().is_some();
        if ui
            .add_enabled(can_refresh, egui::Button::new("\u{1f504} Refresh"))
            .on_hover_text("Scan the current folder again")
            .clicked()
        {
            state.rescan();
        }

        if ui
            .add_enabled(scanning, egui::Button::new("\u{23f9} Stop"))
            .on_hover_text("Stop scanning and keep what was found")
            .clicked()
        {
            state.cancel_scan();
        }

        ui.separator();

        // Filter box. Every edit re-applies the filter.
        let search = ui.add(
            egui::TextEdit::singleline(&mut state.filter.query)
                .hint_text("\u{1f50d} Filter by name")
                .desired_width(220.0),
        );
        if search.changed() {
            state.refresh_filter();
        }
        if !state.filter.query.is_empty()
            && ui.small_button("\u{2716}").on_hover_text("Clear filter").clicked()
        {
            state.filter.query.clear();
            state.refresh_filter();
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("\u{2139}").on_hover_text("About Indexicate").clicked() {
                state.show_about = true;
            }

            let (theme_label, theme_tip) = if state.settings.dark_mode {
                ("\u{2600}", "Switch to light mode")
            } else {
                ("\u{1f319}", "Switch to dark mode")
            };
            if ui.button(theme_label).on_hover_text(theme_tip).clicked() {
                state.toggle_theme();
            }
        });
    });
}
