/// Virtualised tree view, the main UI component.
///
/// Only rows inside the viewport are painted, so drawing cost does not
/// depend on tree size. Rows come from the flat `visible_rows` list kept by
/// `AppState`. During a scan the shared `LiveTree` is read under its lock.
///
/// Clicks are collected into a [`TreeAction`] and applied after the tree
/// borrow ends.
use crate::state::{AppPhase, AppState};
use crate::theme::IndexicateTheme;
use egui::{Rect, Response, Sense, Ui, Vec2};
use indexicate_core::category::FileCategory;
use indexicate_core::model::size::{format_count, format_size};
use indexicate_core::model::{FileTree, NodeIndex};

/// Height of each row in pixels.
pub const ROW_HEIGHT: f32 = 24.0;

/// Indentation per depth level in pixels.
const INDENT_PX: f32 = 20.0;

/// Width reserved on the right for the Type and Size columns.
pub const COLUMNS_WIDTH: f32 = 220.0;

/// Offset of the Size column from the start of the column area.
pub const SIZE_COLUMN_OFFSET: f32 = 110.0;

/// A user interaction with the tree, applied once rendering is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TreeAction {
    Select(usize),
    Toggle(usize),
    Activate(usize),
    Open(NodeIndex),
    OpenLocation(NodeIndex),
    Move(NodeIndex),
    Delete(NodeIndex),
}

/// Draw the virtualised tree view.
pub fn tree_view(ui: &mut Ui, state: &mut AppState) -> Response {
    let have_tree = state.with_tree(|t| !t.is_empty()).unwrap_or(false);
    if !have_tree {
        let message = if state.phase == AppPhase::Scanning {
            "Scanning... waiting for results"
        } else {
            "No folder loaded. Use \u{1f4c2} Choose folder… to start."
        };
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(message).color(ui.visuals().weak_text_color()));
        });
        return ui.interact(ui.max_rect(), ui.id().with("empty_tree"), Sense::click());
    }

    if state.phase == AppPhase::Scanning {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                egui::RichText::new(format!(
                    " Scanning... {} files found",
                    format_count(state.scan_files_found)
                ))
                .color(ui.visuals().weak_text_color())
                .size(12.0),
            );
        });
        ui.add_space(2.0);
    }

    if state.filter_result.as_ref().is_some_and(|r| r.match_count == 0) {
        ui.label(
            egui::RichText::new("Nothing matches the current filter.")
                .color(ui.visuals().weak_text_color())
                .italics(),
        );
    }

    // Scoped so the tree borrow (possibly a read guard) ends before any
    // state mutation.
    let action = {
        let live_guard;
        let tree: &FileTree = if let Some(ref t) = state.tree {
            t
        } else if let Some(ref lt) = state.live_tree {
            live_guard = lt.read();
            &*live_guard
        } else {
            return ui.interact(ui.max_rect(), ui.id().with("empty_tree"), Sense::click());
        };
        render_tree_rows(ui, state, tree)
    };

    match action {
        Some(TreeAction::Select(row)) => state.select_row(row),
        Some(TreeAction::Toggle(row)) => state.toggle_expand(row),
        Some(TreeAction::Activate(row)) => state.activate_row(row),
        Some(TreeAction::Open(node)) => state.open_node(node),
        Some(TreeAction::OpenLocation(node)) => state.open_node_location(node),
        Some(TreeAction::Move(node)) => state.move_node(node),
        Some(TreeAction::Delete(node)) => state.request_delete(node),
        None => {}
    }

    ui.interact(ui.max_rect(), ui.id().with("tree_bg"), Sense::hover())
}

/// Paint the rows in the viewport and return the interaction, if any.
fn render_tree_rows(ui: &mut Ui, state: &AppState, tree: &FileTree) -> Option<TreeAction> {
    let theme = IndexicateTheme::for_mode(ui.visuals().dark_mode);
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_selection = ui.visuals().selection.bg_fill;
    let color_hover = theme.surface_hover;

    let total_rows = state.visible_rows.len();
    let total_height = total_rows as f32 * ROW_HEIGHT;
    let mut action: Option<TreeAction> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Reserve the full virtual height so the scrollbar is correct.
            let (response, painter) = ui.allocate_painter(
                Vec2::new(ui.available_width(), total_height),
                Sense::click(),
            );

            let viewport = ui.clip_rect();
            let top_y = response.rect.top();
            let first_visible = ((viewport.top() - top_y) / ROW_HEIGHT).floor().max(0.0) as usize;
            let last_visible = ((viewport.bottom() - top_y) / ROW_HEIGHT)
                .ceil()
                .min(total_rows as f32) as usize;

            for row_idx in first_visible..last_visible {
                let Some(row) = state.visible_rows.get(row_idx) else {
                    break;
                };
                // Rows can briefly outlive a tree swap.
                if row.node_index.idx() >= tree.len() {
                    continue;
                }
                let node = tree.node(row.node_index);

                let row_rect = Rect::from_min_size(
                    egui::pos2(response.rect.left(), top_y + row_idx as f32 * ROW_HEIGHT),
                    Vec2::new(response.rect.width(), ROW_HEIGHT),
                );
                if !viewport.intersects(row_rect) {
                    continue;
                }

                let is_selected = state.selected_node == Some(row.node_index);
                if is_selected {
                    painter.rect_filled(row_rect, 0.0, color_selection);
                }

                let row_response =
                    ui.interact(row_rect, ui.id().with(("tree_row", row_idx)), Sense::click());
                if row_response.hovered() && !is_selected {
                    painter.rect_filled(row_rect, 0.0, color_hover);
                }

                if row_response.double_clicked() {
                    action = Some(TreeAction::Activate(row_idx));
                } else if row_response.clicked() || row_response.secondary_clicked() {
                    action = Some(TreeAction::Select(row_idx));
                }

                let can_modify = state.can_modify(row.node_index);
                row_response.context_menu(|ui| {
                    if let Some(chosen) = context_menu(ui, tree, row.node_index, can_modify) {
                        action = Some(chosen);
                    }
                });

                if row_response.hovered() {
                    let tip = if node.is_error {
                        format!("{}\n\u{26a0} Could not be read", node.name)
                    } else if node.is_dir {
                        format!(
                            "{}\n{} in {} files",
                            node.name,
                            format_size(node.size),
                            format_count(node.descendant_count)
                        )
                    } else {
                        format!("{}\n{} · {}", node.name, node.kind_label(), format_size(node.size))
                    };
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        ui.id().with(("tree_tip", row_idx)),
                        |ui| {
                            ui.label(tip);
                        },
                    );
                }

                let indent = INDENT_PX * row.depth as f32;
                let text_x = row_rect.left() + indent + 18.0;
                let text_y = row_rect.center().y;

                // Expand/collapse arrow for directories.
                if node.is_dir {
                    let arrow_rect = Rect::from_min_size(
                        egui::pos2(row_rect.left() + indent, row_rect.top()),
                        Vec2::new(16.0, ROW_HEIGHT),
                    );
                    let arrow_response =
                        ui.interact(arrow_rect, ui.id().with(("arrow", row_idx)), Sense::click());
                    if arrow_response.clicked() {
                        action = Some(TreeAction::Toggle(row_idx));
                    }
                    painter.text(
                        egui::pos2(row_rect.left() + indent + 2.0, text_y),
                        egui::Align2::LEFT_CENTER,
                        if row.is_expanded { "\u{25bc}" } else { "\u{25b6}" },
                        egui::FontId::proportional(11.0),
                        color_weak,
                    );
                }

                let (icon, icon_color) = if node.is_error {
                    ("\u{26a0}", theme.warning)
                } else if node.is_dir {
                    (node.icon(), theme.folder)
                } else {
                    let cat = node.category.unwrap_or(FileCategory::Other);
                    (node.icon(), theme.category_color(cat))
                };
                painter.text(
                    egui::pos2(text_x, text_y),
                    egui::Align2::LEFT_CENTER,
                    icon,
                    egui::FontId::proportional(13.0),
                    icon_color,
                );

                // Name, clipped with an ellipsis before the columns.
                let name_x = text_x + 22.0;
                let columns_x = row_rect.right() - COLUMNS_WIDTH;
                let max_name_w = (columns_x - name_x - 8.0).max(20.0);
                let name_color = if node.is_error { color_weak } else { color_normal };
                let name_galley = painter.layout_no_wrap(
                    node.name.to_string(),
                    egui::FontId::proportional(13.0),
                    name_color,
                );
                let name_pos = egui::pos2(name_x, text_y - name_galley.size().y / 2.0);
                if name_galley.size().x <= max_name_w {
                    painter.galley(name_pos, name_galley, name_color);
                } else {
                    let clip = Rect::from_min_size(
                        egui::pos2(name_x, row_rect.top()),
                        Vec2::new(max_name_w - 12.0, ROW_HEIGHT),
                    );
                    painter
                        .with_clip_rect(painter.clip_rect().intersect(clip))
                        .galley(name_pos, name_galley, name_color);
                    painter.text(
                        egui::pos2(name_x + max_name_w - 12.0, text_y),
                        egui::Align2::LEFT_CENTER,
                        "\u{2026}",
                        egui::FontId::proportional(13.0),
                        color_weak,
                    );
                }

                painter.text(
                    egui::pos2(columns_x, text_y),
                    egui::Align2::LEFT_CENTER,
                    node.kind_label(),
                    egui::FontId::proportional(12.0),
                    color_weak,
                );
                painter.text(
                    egui::pos2(columns_x + SIZE_COLUMN_OFFSET, text_y),
                    egui::Align2::LEFT_CENTER,
                    format_size(node.size),
                    egui::FontId::proportional(12.0),
                    color_weak,
                );
            }

            response
        });

    action
}

/// Right-click menu for one node. Returns the chosen action; copying the
/// path is handled in place.
fn context_menu(
    ui: &mut Ui,
    tree: &FileTree,
    node_index: NodeIndex,
    can_modify: bool,
) -> Option<TreeAction> {
    let mut chosen = None;

    if ui.button("Open").clicked() {
        chosen = Some(TreeAction::Open(node_index));
        ui.close_menu();
    }
    if ui.button("Open folder location").clicked() {
        chosen = Some(TreeAction::OpenLocation(node_index));
        ui.close_menu();
    }

    ui.separator();

    if ui
        .add_enabled(can_modify, egui::Button::new("Move…"))
        .clicked()
    {
        chosen = Some(TreeAction::Move(node_index));
        ui.close_menu();
    }
    if ui
        .add_enabled(can_modify, egui::Button::new("Delete"))
        .clicked()
    {
        chosen = Some(TreeAction::Delete(node_index));
        ui.close_menu();
    }

    ui.separator();

    if ui.button("Copy path").clicked() {
        ui.ctx()
            .copy_text(tree.full_path(node_index).to_string_lossy().into_owned());
        ui.close_menu();
    }

    chosen
}
