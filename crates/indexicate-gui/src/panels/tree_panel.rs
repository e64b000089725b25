/// Main tree panel: column headers above the tree view.
use crate::state::AppState;
use crate::theme::IndexicateTheme;
use crate::widgets;
use crate::widgets::tree_view::{COLUMNS_WIDTH, SIZE_COLUMN_OFFSET};
use egui::Ui;

/// Draw the tree panel (central content area).
pub fn tree_panel(ui: &mut Ui, state: &mut AppState) {
    let theme = IndexicateTheme::for_mode(ui.visuals().dark_mode);
    let header_height = 20.0;
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), header_height),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, theme.header_bg);

    let muted = ui.visuals().weak_text_color();
    let columns_x = rect.right() - COLUMNS_WIDTH;
    for (x, label) in [
        (rect.left() + 8.0, "Name"),
        (columns_x, "Type"),
        (columns_x + SIZE_COLUMN_OFFSET, "Size"),
    ] {
        painter.text(
            egui::pos2(x, rect.center().y),
            egui::Align2::LEFT_CENTER,
            label,
            egui::FontId::proportional(12.0),
            muted,
        );
    }

    ui.separator();

    widgets::tree_view::tree_view(ui, state);
}
