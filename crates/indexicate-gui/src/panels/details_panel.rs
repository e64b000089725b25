/// Details panel: information and actions for the selected entry.
use crate::state::AppState;
use crate::theme::IndexicateTheme;
use egui::Ui;
use indexicate_core::category::FileCategory;
use indexicate_core::model::size::{format_age, format_count, format_size};
use indexicate_core::model::NodeIndex;
use std::time::SystemTime;

/// Snapshot of the selected node, taken so no tree borrow is held while
/// the buttons mutate state.
struct Selected {
    node: NodeIndex,
    name: String,
    path: String,
    icon: &'static str,
    kind: &'static str,
    category: Option<FileCategory>,
    size: u64,
    is_dir: bool,
    is_error: bool,
    descendant_count: u64,
    modified: Option<SystemTime>,
}

enum DetailAction {
    Open,
    OpenLocation,
    Move,
    Delete,
}

/// Draw the details panel for the currently selected node.
pub fn details_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = IndexicateTheme::for_mode(ui.visuals().dark_mode);
    let color_muted = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_accent = ui.visuals().hyperlink_color;

    let Some(selected) = state.selected_node else {
        ui.label(
            egui::RichText::new("Select an item to see details")
                .color(color_muted)
                .italics(),
        );
        return;
    };

    let snapshot = state
        .with_tree(|tree| {
            // Guard against stale indices from a previous tree.
            if selected.idx() >= tree.len() {
                return None;
            }
            let node = tree.node(selected);
            Some(Selected {
                node: selected,
                name: node.name.to_string(),
                path: tree.full_path(selected).to_string_lossy().into_owned(),
                icon: node.icon(),
                kind: node.kind_label(),
                category: node.category,
                size: node.size,
                is_dir: node.is_dir,
                is_error: node.is_error,
                descendant_count: node.descendant_count,
                modified: node.modified,
            })
        })
        .flatten();
    let Some(item) = snapshot else {
        return;
    };

    let icon_color = match item.category {
        Some(cat) if !item.is_dir => theme.category_color(cat),
        _ => theme.folder,
    };
    ui.heading(egui::RichText::new(item.icon).size(16.0).color(icon_color));
    ui.add_space(2.0);

    if item.is_error {
        ui.label(
            egui::RichText::new("Could not be read; contents may be missing")
                .size(11.0)
                .color(theme.warning)
                .italics(),
        );
        ui.add_space(2.0);
    }

    ui.label(
        egui::RichText::new(&item.name)
            .size(14.0)
            .strong()
            .color(color_normal),
    );
    ui.add_space(4.0);
    ui.label(egui::RichText::new(&item.path).size(11.0).color(color_muted));

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    egui::Grid::new("details_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Type:").color(color_muted));
            ui.label(egui::RichText::new(item.kind).color(color_normal));
            ui.end_row();

            ui.label(egui::RichText::new("Size:").color(color_muted));
            ui.label(
                egui::RichText::new(format_size(item.size))
                    .color(color_accent)
                    .strong(),
            );
            ui.end_row();

            if item.is_dir {
                ui.label(egui::RichText::new("Files:").color(color_muted));
                ui.label(
                    egui::RichText::new(format_count(item.descendant_count)).color(color_normal),
                );
                ui.end_row();
            }

            if let Some(modified) = item.modified {
                if let Some(age) = format_age(modified, SystemTime::now()) {
                    let stamp: chrono::DateTime<chrono::Local> = modified.into();
                    ui.label(egui::RichText::new("Modified:").color(color_muted));
                    ui.label(egui::RichText::new(age).color(color_normal))
                        .on_hover_text(stamp.format("%Y-%m-%d %H:%M").to_string());
                    ui.end_row();
                }
            }
        });

    ui.add_space(8.0);

    let can_modify = state.can_modify(item.node);
    let mut action = None;
    ui.horizontal_wrapped(|ui| {
        if ui.button("Open").clicked() {
            action = Some(DetailAction::Open);
        }
        if ui.button("\u{1f4c2} Show in folder").clicked() {
            action = Some(DetailAction::OpenLocation);
        }
        if ui
            .add_enabled(can_modify, egui::Button::new("Move…"))
            .clicked()
        {
            action = Some(DetailAction::Move);
        }
        if ui
            .add_enabled(can_modify, egui::Button::new("\u{1f5d1} Delete"))
            .on_hover_text(state.settings.delete_mode.label())
            .clicked()
        {
            action = Some(DetailAction::Delete);
        }
        if ui.button("\u{1f4cb} Copy path").clicked() {
            ui.ctx().copy_text(item.path.clone());
        }
    });

    match action {
        Some(DetailAction::Open) => state.open_node(item.node),
        Some(DetailAction::OpenLocation) => state.open_node_location(item.node),
        Some(DetailAction::Move) => state.move_node(item.node),
        Some(DetailAction::Delete) => state.request_delete(item.node),
        None => {}
    }
}
