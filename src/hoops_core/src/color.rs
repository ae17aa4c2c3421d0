/// Text color for labels drawn on a team-colored background.
///
/// Uses sRGB relative luminance; anything brighter than 0.5 gets dark text.
/// Unreadable input is treated as a dark background.
pub fn readable_text_color(bg_hex: &str) -> &'static str {
    const DARK_TEXT: &str = "#111111";
    const LIGHT_TEXT: &str = "#ffffff";

    let hex = bg_hex.trim().trim_start_matches('#');
    let hex = if hex.is_empty() { "000000" } else { hex };
    match relative_luminance(hex) {
        Some(l) if l > 0.5 => DARK_TEXT,
        _ => LIGHT_TEXT,
    }
}

fn relative_luminance(hex: &str) -> Option<f64> {
    let channel = |i: usize| -> Option<f64> {
        let raw = hex.get(i..(i + 2).min(hex.len())).unwrap_or("");
        let raw = if raw.is_empty() { "00" } else { raw };
        let v = u8::from_str_radix(raw, 16).ok()? as f64 / 255.0;
        Some(if v <= 0.03928 {
            v / 12.92
        } else {
            ((v + 0.055) / 1.055).powf(2.4)
        })
    };
    Some(0.2126 * channel(0)? + 0.7152 * channel(2)? + 0.0722 * channel(4)?)
}
