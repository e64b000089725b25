/// Bottom status bar: scan progress, totals and the outcome of the last
/// action.
use crate::state::{AppPhase, AppState};
use crate::theme::IndexicateTheme;
use egui::Ui;
use indexicate_core::model::size::{format_count, format_size};

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &mut AppState) {
    let theme = IndexicateTheme::for_mode(ui.visuals().dark_mode);
    let color_accent = ui.visuals().hyperlink_color;
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        match state.phase {
            AppPhase::Idle => {
                let (text, color) = match state.status_message {
                    Some(ref message) => (message.as_str(), theme.warning),
                    None => ("Ready", color_weak),
                };
                ui.label(egui::RichText::new(text).size(12.0).color(color));
            }
            AppPhase::Scanning => {
                ui.spinner();
                ui.label(
                    egui::RichText::new(format!(
                        "Scanning {}...",
                        truncate_path(&state.scan_current_path, 60)
                    ))
                    .size(12.0)
                    .color(color_normal),
                );
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{} files", format_count(state.scan_files_found)))
                        .size(12.0)
                        .color(color_normal),
                );
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{} folders", format_count(state.scan_dirs_found)))
                        .size(12.0)
                        .color(color_normal),
                );
                error_count_label(ui, state, theme.warning);
            }
            AppPhase::Results => {
                let Some(ref tree) = state.tree else {
                    return;
                };
                let (status_text, status_color) = if state.scan_was_cancelled {
                    ("\u{23f9} Scan stopped (partial results)", theme.warning)
                } else {
                    ("\u{2713} Scan complete", theme.success)
                };
                ui.label(
                    egui::RichText::new(status_text)
                        .size(12.0)
                        .color(status_color),
                );
                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{} files", format_count(tree.file_count())))
                        .size(12.0)
                        .color(color_normal),
                );
                ui.separator();
                ui.label(
                    egui::RichText::new(format_size(tree.total_size))
                        .size(12.0)
                        .color(color_accent),
                );
                if let Some(duration) = state.scan_duration {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("{:.1}s", duration.as_secs_f64()))
                            .size(12.0)
                            .color(color_weak),
                    );
                }
                if let Some(ref result) = state.filter_result {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} matches",
                            format_count(result.match_count as u64)
                        ))
                        .size(12.0)
                        .color(color_accent),
                    );
                }
                error_count_label(ui, state, theme.warning);
                if let Some(ref message) = state.status_message {
                    ui.separator();
                    ui.label(egui::RichText::new(message).size(12.0).color(color_weak));
                }
            }
        }
    });
}

/// Clickable "N unreadable" counter that opens the error list.
fn error_count_label(ui: &mut Ui, state: &mut AppState, color: egui::Color32) {
    if state.scan_error_count == 0 {
        return;
    }
    ui.separator();
    let text = egui::RichText::new(format!(
        "{} unreadable",
        format_count(state.scan_error_count)
    ))
    .size(12.0)
    .color(color);
    if ui
        .add(egui::Label::new(text).sense(egui::Sense::click()))
        .on_hover_text("Show entries that could not be read")
        .clicked()
    {
        state.show_errors = true;
    }
}

/// Shorten `path` to at most `max_chars` characters by replacing the middle
/// with "...".
fn truncate_path(path: &str, max_chars: usize) -> String {
    let count = path.chars().count();
    if count <= max_chars {
        return path.to_string();
    }
    let half = max_chars.saturating_sub(3) / 2;
    let head: String = path.chars().take(half).collect();
    let tail: String = path.chars().skip(count - half).collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paths_are_untouched() {
        assert_eq!(truncate_path("/home/a", 60), "/home/a");
    }

    #[test]
    fn long_paths_keep_both_ends() {
        let path = format!("/start/{}/end.txt", "x".repeat(100));
        let short = truncate_path(&path, 21);
        assert_eq!(short.chars().count(), 21);
        assert!(short.starts_with("/start/"));
        assert!(short.ends_with("end.txt"));
    }

    #[test]
    fn multibyte_names_do_not_split_characters() {
        let path = "ä".repeat(80);
        assert_eq!(truncate_path(&path, 11), "ääää...ääää");
    }
}
