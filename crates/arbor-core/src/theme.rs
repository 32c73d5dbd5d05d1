//! Constant style tables and color math.
//!
//! The lookup tables are pure constants; every keyed accessor has an explicit
//! unknown-key fallback so callers never handle errors for styling.

use crate::model::{TemporalBand, Vine};

pub const DEFAULT_COLLEGE_COLOR: &str = "#9ca3af";

#[derive(Debug, Clone, Copy)]
struct Rgb01 {
    r: f64,
    g: f64,
    b: f64,
}

fn parse_hex_rgb01(s: &str) -> Option<Rgb01> {
    let hex = s.trim().strip_prefix('#')?;
    let (r, g, b) = match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()?;
            (r, g, b)
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            (r, g, b)
        }
        _ => return None,
    };
    Some(Rgb01 {
        r: (r as f64) / 255.0,
        g: (g as f64) / 255.0,
        b: (b as f64) / 255.0,
    })
}

fn rgb01_to_hex(rgb: Rgb01) -> String {
    let r = (rgb.r.clamp(0.0, 1.0) * 255.0).round() as i64;
    let g = (rgb.g.clamp(0.0, 1.0) * 255.0).round() as i64;
    let b = (rgb.b.clamp(0.0, 1.0) * 255.0).round() as i64;
    format!(
        "#{:02x}{:02x}{:02x}",
        r.clamp(0, 255),
        g.clamp(0, 255),
        b.clamp(0, 255)
    )
}

/// Linear interpolation between two hex colors, `t` clamped to `[0, 1]`.
/// Unparseable inputs fall back to the first operand (or the default gray).
pub fn mix_hex(a: &str, b: &str, t: f64) -> String {
    let t = t.clamp(0.0, 1.0);
    let (Some(ca), Some(cb)) = (parse_hex_rgb01(a), parse_hex_rgb01(b)) else {
        return parse_hex_rgb01(a)
            .map(rgb01_to_hex)
            .unwrap_or_else(|| DEFAULT_COLLEGE_COLOR.to_string());
    };
    rgb01_to_hex(Rgb01 {
        r: ca.r + (cb.r - ca.r) * t,
        g: ca.g + (cb.g - ca.g) * t,
        b: ca.b + (cb.b - ca.b) * t,
    })
}

pub fn vine_color(vine: Vine) -> &'static str {
    match vine {
        Vine::History => "#b45309",
        Vine::Philosophy => "#7c3aed",
        Vine::Science => "#0e7490",
        Vine::Mathematics => "#1d4ed8",
        Vine::Arts => "#be185d",
        Vine::Technology => "#15803d",
    }
}

pub fn band_symbol(band: TemporalBand) -> &'static str {
    match band {
        TemporalBand::Antiquity => "\u{25cf}",     // ●
        TemporalBand::Classical => "\u{25c6}",     // ◆
        TemporalBand::Medieval => "\u{25b2}",      // ▲
        TemporalBand::Modern => "\u{25a0}",        // ■
        TemporalBand::Contemporary => "\u{2605}", // ★
    }
}

/// Color for a credential "college" category; unknown categories get a neutral gray.
pub fn college_color(category: &str) -> &'static str {
    match category.trim().to_ascii_uppercase().as_str() {
        "MATH" => "#1d4ed8",
        "SCIENCE" => "#0e7490",
        "HUMANITIES" => "#b45309",
        "ARTS" => "#be185d",
        "LANGUAGE" => "#7c3aed",
        "TECHNOLOGY" => "#15803d",
        _ => DEFAULT_COLLEGE_COLOR,
    }
}
