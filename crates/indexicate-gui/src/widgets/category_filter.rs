/// Category toggle chips for the tree filter.
use crate::state::AppState;
use crate::theme::IndexicateTheme;
use egui::Ui;
use indexicate_core::category::{CategorySet, FileCategory};

/// Draw one chip per category plus an "All" reset.
pub fn category_filter(ui: &mut Ui, state: &mut AppState) {
    let theme = IndexicateTheme::for_mode(ui.visuals().dark_mode);
    let mut changed = false;

    ui.horizontal_wrapped(|ui| {
        for cat in FileCategory::ALL {
            let enabled = state.filter.categories.contains(cat);
            let text = egui::RichText::new(format!("{} {}", cat.icon(), cat.label())).color(
                if enabled {
                    theme.category_color(cat)
                } else {
                    ui.visuals().weak_text_color()
                },
            );
            if ui
                .selectable_label(enabled, text)
                .on_hover_text(format!("Show or hide {} files", cat.label().to_lowercase()))
                .clicked()
            {
                state.filter.categories.toggle(cat);
                changed = true;
            }
        }

        let all_on = state.filter.categories.is_all();
        if ui.add_enabled(!all_on, egui::Button::new("All")).clicked() {
            state.filter.categories = CategorySet::all();
            changed = true;
        }
    });

    if changed {
        state.refresh_filter();
    }
}
