use egui::Color32;

/// App background, behind all panels.
pub const BACKGROUND: Color32 = Color32::from_rgb(0x09, 0x0D, 0x1B);
/// Default fill for unpainted regions.
pub const SURFACE: Color32 = Color32::from_rgb(0x15, 0x1B, 0x2F);
/// Canvas card behind the artwork.
pub const SURFACE_ALT: Color32 = Color32::from_rgb(0x1F, 0x27, 0x40);
/// Region outlines and panel separators.
pub const BORDER: Color32 = Color32::from_rgb(0x25, 0x2D, 0x45);
/// Highlight for the armed clip region and selected swatches.
pub const ACCENT: Color32 = Color32::from_rgb(0x3E, 0xC5, 0xFF);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(0xF4, 0xF6, 0xFB);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0x9E, 0xA6, 0xC6);

/// Parses a `#RRGGBB` color string. Session colors are kept as strings
/// end to end; this is the one place they become drawable.
///
/// Color strings come from persisted pages as well as the builtin
/// palettes, so the length check counts bytes and the pair slices use
/// `get`, which rejects a split inside a multi-byte character instead
/// of panicking on it.
pub fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(digits.get(0..2)?, 16).ok()?;
    let g = u8::from_str_radix(digits.get(2..4)?, 16).ok()?;
    let b = u8::from_str_radix(digits.get(4..6)?, 16).ok()?;
    Some(Color32::from_rgb(r, g, b))
}

/// Parses a hex color, falling back to the unpainted surface tone.
pub fn parse_hex_or_surface(hex: &str) -> Color32 {
    parse_hex(hex).unwrap_or(SURFACE)
}

pub fn to_hex(color: Color32) -> String {
    format!("#{:02X}{:02X}{:02X}", color.r(), color.g(), color.b())
}

/// Dark theme carried over from the app's visual identity.
pub fn apply_theme(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = SURFACE;
    visuals.window_fill = SURFACE_ALT;
    visuals.extreme_bg_color = BACKGROUND;
    visuals.widgets.noninteractive.bg_stroke.color = BORDER;
    visuals.selection.bg_fill = ACCENT.linear_multiply(0.35);
    visuals.selection.stroke = egui::Stroke::new(1.0, ACCENT);
    visuals.hyperlink_color = ACCENT;
    ctx.set_visuals(visuals);
}
