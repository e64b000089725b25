/// Options panel: current folder, category filter and preferences in the
/// left sidebar.
use crate::state::AppState;
use crate::widgets;
use egui::Ui;
use indexicate_core::actions::DeleteMode;
use indexicate_core::model::SortOrder;

/// Draw the options panel (left sidebar content).
pub fn options_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Folder");
    ui.add_space(4.0);
    match state.current_root() {
        Some(root) => {
            ui.label(
                egui::RichText::new(root.to_string_lossy())
                    .size(12.0)
                    .color(ui.visuals().text_color()),
            );
        }
        None => {
            ui.label(
                egui::RichText::new("None chosen")
                    .size(12.0)
                    .italics()
                    .color(ui.visuals().weak_text_color()),
            );
        }
    }
    if ui.button("\u{1f4c2} Choose folder…").clicked() {
        state.choose_folder();
    }

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(4.0);

    ui.heading("Show");
    ui.add_space(4.0);
    widgets::category_filter::category_filter(ui, state);

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(4.0);

    ui.heading("Preferences");
    ui.add_space(4.0);

    let mut sort_order = state.settings.sort_order;
    egui::ComboBox::from_label("Sort")
        .selected_text(sort_order.label())
        .show_ui(ui, |ui| {
            for order in SortOrder::ALL {
                ui.selectable_value(&mut sort_order, order, order.label());
            }
        });
    if sort_order != state.settings.sort_order {
        state.set_sort_order(sort_order);
    }

    let mut include_hidden = state.settings.include_hidden;
    if ui
        .checkbox(&mut include_hidden, "Include hidden files")
        .on_hover_text("Takes effect by scanning the folder again")
        .changed()
    {
        state.set_include_hidden(include_hidden);
    }

    let mut changed = false;
    egui::ComboBox::from_label("Delete")
        .selected_text(state.settings.delete_mode.label())
        .show_ui(ui, |ui| {
            for mode in [DeleteMode::Trash, DeleteMode::Permanent] {
                changed |= ui
                    .selectable_value(&mut state.settings.delete_mode, mode, mode.label())
                    .changed();
            }
        });
    changed |= ui
        .checkbox(&mut state.settings.confirm_delete, "Ask before deleting")
        .changed();
    changed |= ui
        .checkbox(
            &mut state.settings.reopen_last_directory,
            "Reopen last folder on start",
        )
        .changed();
    if changed {
        state.save_settings();
    }
}
