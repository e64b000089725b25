/// Colour scheme and visual theme for Indexicate.
///
/// Dark and light palettes, plus the per-category colours used by the tree
/// icons, the category filter chips and the summary bars. Widgets ask the
/// theme for semantic colours instead of scattering hex codes.
use egui::{Color32, Stroke, Visuals};
use indexicate_core::category::FileCategory;

/// Semantic colour palette.
pub struct IndexicateTheme {
    pub dark: bool,
    pub background: Color32,
    pub surface: Color32,
    pub surface_hover: Color32,
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub accent: Color32,
    pub folder: Color32,
    pub warning: Color32,
    pub success: Color32,
    pub separator: Color32,
    pub selection: Color32,
    pub header_bg: Color32,
}

impl IndexicateTheme {
    /// Dark theme, the default.
    pub fn dark() -> Self {
        Self {
            dark: true,
            background: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            surface: Color32::from_rgb(0x2a, 0x2a, 0x3c),
            surface_hover: Color32::from_rgb(0x35, 0x35, 0x4a),
            text_primary: Color32::from_rgb(0xe4, 0xe4, 0xe8),
            text_secondary: Color32::from_rgb(0xb8, 0xb8, 0xc4),
            accent: Color32::from_rgb(0x89, 0xb4, 0xfa),
            folder: Color32::from_rgb(0xf9, 0xe2, 0xaf),
            warning: Color32::from_rgb(0xfa, 0xb3, 0x87),
            success: Color32::from_rgb(0xa6, 0xe3, 0xa1),
            separator: Color32::from_rgb(0x3a, 0x3a, 0x50),
            selection: Color32::from_rgb(0x28, 0x3a, 0x5c),
            header_bg: Color32::from_rgb(0x22, 0x22, 0x34),
        }
    }

    pub fn light() -> Self {
        Self {
            dark: false,
            background: Color32::from_rgb(0xf5, 0xf5, 0xf5),
            surface: Color32::from_rgb(0xff, 0xff, 0xff),
            surface_hover: Color32::from_rgb(0xe8, 0xe8, 0xef),
            text_primary: Color32::from_rgb(0x1e, 0x1e, 0x2e),
            text_secondary: Color32::from_rgb(0x4a, 0x4a, 0x5a),
            accent: Color32::from_rgb(0x3a, 0x6f, 0xd8),
            folder: Color32::from_rgb(0xc0, 0x98, 0x20),
            warning: Color32::from_rgb(0xd0, 0x80, 0x20),
            success: Color32::from_rgb(0x30, 0x98, 0x30),
            separator: Color32::from_rgb(0xd0, 0xd0, 0xd8),
            selection: Color32::from_rgba_premultiplied(0x3a, 0x6f, 0xd8, 0x30),
            header_bg: Color32::from_rgb(0xe8, 0xe8, 0xf0),
        }
    }

    pub fn for_mode(dark: bool) -> Self {
        if dark {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// Apply this theme to an egui context.
    pub fn apply(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let mut visuals = if self.dark {
            Visuals::dark()
        } else {
            Visuals::light()
        };

        visuals.panel_fill = self.background;
        visuals.window_fill = self.surface;
        visuals.extreme_bg_color = self.background;
        visuals.faint_bg_color = self.surface;
        visuals.selection.bg_fill = self.selection;
        visuals.selection.stroke = Stroke::new(1.0, self.accent);
        visuals.hyperlink_color = self.accent;

        visuals.widgets.noninteractive.bg_fill = self.surface;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.inactive.bg_fill = self.surface;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.hovered.bg_fill = self.surface_hover;
        visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, self.accent);
        visuals.widgets.active.bg_fill = self.accent;
        visuals.widgets.active.fg_stroke = Stroke::new(1.0, self.background);
        visuals.window_stroke = Stroke::new(1.0, self.separator);

        style.visuals = visuals;
        style.spacing.item_spacing = egui::vec2(8.0, 4.0);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        ctx.set_style(style);
    }

    /// Colour for a file category's icon, chip and bar.
    pub fn category_color(&self, cat: FileCategory) -> Color32 {
        let (dark, light) = match cat {
            FileCategory::Media => ((0xf3, 0x8b, 0xa8), (0xc0, 0x30, 0x60)),
            FileCategory::Images => ((0xcb, 0xa6, 0xf7), (0x80, 0x40, 0xc0)),
            FileCategory::Documents => ((0x89, 0xb4, 0xfa), (0x30, 0x60, 0xc0)),
            FileCategory::Archives => ((0xfa, 0xb3, 0x87), (0xb0, 0x60, 0x10)),
            FileCategory::Other => ((0x9a, 0x9e, 0xb4), (0x60, 0x64, 0x78)),
        };
        let (r, g, b) = if self.dark { dark } else { light };
        Color32::from_rgb(r, g, b)
    }
}
