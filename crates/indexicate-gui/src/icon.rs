//! Indexicate application icon generator.
//!
//! Produces a procedural icon: a folder whose front panel carries one
//! coloured stripe per file category. Rendered at any resolution as RGBA
//! pixel data for the window icon.

/// Category stripe colours, top to bottom.
const STRIPES: [[u8; 3]; 4] = [
    [0xf3, 0x8b, 0xa8], // media
    [0xcb, 0xa6, 0xf7], // images
    [0x89, 0xb4, 0xfa], // documents
    [0xfa, 0xb3, 0x87], // archives
];

const FOLDER_BACK: [u8; 3] = [0xd9, 0xa8, 0x3a];
const FOLDER_FRONT: [u8; 3] = [0xf9, 0xe2, 0xaf];

/// Generate the icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    egui::IconData {
        rgba: render_icon(size),
        width: size,
        height: size,
    }
}

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // Back panel with a tab on the upper left.
    let back = RoundRect::new(s * 0.08, s * 0.22, s * 0.92, s * 0.86, s * 0.06);
    let tab = RoundRect::new(s * 0.08, s * 0.14, s * 0.44, s * 0.30, s * 0.05);
    // Front panel, slightly lower so the back shows above it.
    let front = RoundRect::new(s * 0.08, s * 0.32, s * 0.92, s * 0.86, s * 0.06);

    let stripe_top = s * 0.44;
    let stripe_h = s * 0.07;
    let stripe_gap = s * 0.025;
    let stripe_left = s * 0.22;
    let stripe_right = s * 0.78;

    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            let mut rgb = [0u8; 3];
            let mut alpha = 0.0f32;

            let back_cov = back.coverage(px, py).max(tab.coverage(px, py));
            if back_cov > 0.0 {
                rgb = FOLDER_BACK;
                alpha = back_cov;
            }

            let front_cov = front.coverage(px, py);
            if front_cov > 0.0 {
                // Light vertical gradient on the front panel.
                let shade = 1.0 - 0.12 * ((py - s * 0.32) / (s * 0.54)).clamp(0.0, 1.0);
                let face = FOLDER_FRONT.map(|c| (c as f32 * shade) as u8);
                rgb = blend(rgb, face, front_cov);
                alpha = alpha + (1.0 - alpha) * front_cov;

                for (i, colour) in STRIPES.iter().enumerate() {
                    let top = stripe_top + i as f32 * (stripe_h + stripe_gap);
                    let stripe = RoundRect::new(
                        stripe_left,
                        top,
                        stripe_right,
                        top + stripe_h,
                        stripe_h * 0.5,
                    );
                    let cov = stripe.coverage(px, py) * front_cov;
                    if cov > 0.0 {
                        rgb = blend(rgb, *colour, cov);
                    }
                }
            }

            let idx = ((y * size + x) * 4) as usize;
            pixels[idx] = rgb[0];
            pixels[idx + 1] = rgb[1];
            pixels[idx + 2] = rgb[2];
            pixels[idx + 3] = (alpha * 255.0).clamp(0.0, 255.0) as u8;
        }
    }

    pixels
}

// ── Helpers ─────────────────────────────────────────────────────

/// Axis-aligned rectangle with rounded corners.
struct RoundRect {
    cx: f32,
    cy: f32,
    half_w: f32,
    half_h: f32,
    radius: f32,
}

impl RoundRect {
    fn new(left: f32, top: f32, right: f32, bottom: f32, radius: f32) -> Self {
        Self {
            cx: (left + right) * 0.5,
            cy: (top + bottom) * 0.5,
            half_w: (right - left) * 0.5,
            half_h: (bottom - top) * 0.5,
            radius,
        }
    }

    /// Anti-aliased coverage of the pixel centred at (`px`, `py`), 0.0 to 1.0.
    fn coverage(&self, px: f32, py: f32) -> f32 {
        let qx = (px - self.cx).abs() - (self.half_w - self.radius);
        let qy = (py - self.cy).abs() - (self.half_h - self.radius);
        let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
        let inside = qx.max(qy).min(0.0);
        smooth_edge(outside + inside, self.radius)
    }
}

/// Smooth anti-aliased edge (1 → 0 as `dist` crosses `edge`).
fn smooth_edge(dist: f32, edge: f32) -> f32 {
    let d = dist - edge;
    if d < -1.0 {
        1.0
    } else if d > 1.0 {
        0.0
    } else {
        0.5 - d * 0.5
    }
}

fn blend(a: [u8; 3], b: [u8; 3], t: f32) -> [u8; 3] {
    let lerp = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).clamp(0.0, 255.0) as u8;
    [lerp(a[0], b[0]), lerp(a[1], b[1]), lerp(a[2], b[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_matches_requested_size() {
        let icon = generate_icon(32);
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);
        assert_eq!((icon.width, icon.height), (32, 32));
    }

    #[test]
    fn corners_are_transparent_and_centre_is_opaque() {
        let size = 64;
        let pixels = render_icon(size);
        let alpha = |x: u32, y: u32| pixels[((y * size + x) * 4 + 3) as usize];
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(size - 1, 0), 0);
        assert_eq!(alpha(size / 2, size / 2), 255);
    }
}
