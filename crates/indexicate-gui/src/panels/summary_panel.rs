/// Summary panel: file count and size per category.
///
/// Reads `AppState::category_stats`, computed once when a scan finishes,
/// instead of walking the tree every frame.
use crate::state::{AppPhase, AppState};
use crate::theme::IndexicateTheme;
use egui::{Rect, Ui, Vec2};
use egui_extras::{Column, TableBuilder};
use indexicate_core::model::size::{format_count, format_size};

pub fn summary_panel(ui: &mut Ui, state: &AppState) {
    let theme = IndexicateTheme::for_mode(ui.visuals().dark_mode);
    let color_muted = ui.visuals().weak_text_color();

    ui.heading("By category");
    ui.add_space(4.0);

    if state.category_stats.is_empty() {
        let text = if state.phase == AppPhase::Scanning {
            "Available after the scan completes."
        } else {
            "No files."
        };
        ui.label(egui::RichText::new(text).color(color_muted).size(12.0));
        return;
    }

    let total_size: u64 = state.category_stats.iter().map(|s| s.total_size).sum();

    TableBuilder::new(ui)
        .id_salt("category_summary")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::remainder().at_least(60.0))
        .header(18.0, |mut header| {
            for title in ["Category", "Files", "Size"] {
                header.col(|ui| {
                    ui.label(egui::RichText::new(title).color(color_muted).size(11.0));
                });
            }
        })
        .body(|mut body| {
            for stat in &state.category_stats {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "{} {}",
                                stat.category.icon(),
                                stat.category.label()
                            ))
                            .color(theme.category_color(stat.category))
                            .size(12.0),
                        );
                    });
                    row.col(|ui| {
                        ui.label(egui::RichText::new(format_count(stat.file_count)).size(12.0));
                    });
                    row.col(|ui| {
                        ui.label(egui::RichText::new(format_size(stat.total_size)).size(12.0));
                    });
                });
            }
        });

    ui.add_space(6.0);

    // Stacked share bar across all categories.
    let bar_width = ui.available_width() - 8.0;
    let bar_height = 8.0;
    let (bar_rect, _) =
        ui.allocate_exact_size(Vec2::new(bar_width, bar_height), egui::Sense::hover());
    let painter = ui.painter_at(bar_rect);
    painter.rect_filled(bar_rect, 2.0, ui.visuals().extreme_bg_color);
    if total_size > 0 {
        let mut x = bar_rect.left();
        for stat in &state.category_stats {
            let w = bar_width * (stat.total_size as f32 / total_size as f32);
            if w > 0.5 {
                let seg =
                    Rect::from_min_size(egui::pos2(x, bar_rect.top()), Vec2::new(w, bar_height));
                painter.rect_filled(seg, 0.0, theme.category_color(stat.category));
            }
            x += w;
        }
    }
}
