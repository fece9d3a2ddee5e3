//! Fill colour resolution for `.xlsx` cells.
//!
//! Handles ARGB literals, theme colours with tint, and the indexed palette.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::BufRead;

use super::xml::{attr_bool, attr_f64, attr_string, attr_string_local, attr_u32};

/// Excel's 64 indexed colours (legacy palette)
pub const INDEXED_COLORS: [&str; 64] = [
    "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#000000", "#FFFFFF", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#800000", "#008000", "#000080", "#808000", "#800080", "#008080", "#C0C0C0", "#808080",
    "#9999FF", "#993366", "#FFFFCC", "#CCFFFF", "#660066", "#FF8080", "#0066CC", "#CCCCFF",
    "#000080", "#FF00FF", "#FFFF00", "#00FFFF", "#800080", "#800000", "#008080", "#0000FF",
    "#00CCFF", "#CCFFFF", "#CCFFCC", "#FFFF99", "#99CCFF", "#FF99CC", "#CC99FF", "#FFCC99",
    "#3366FF", "#33CCCC", "#99CC00", "#FFCC00", "#FF9900", "#FF6600", "#666699", "#969696",
    "#003366", "#339966", "#003300", "#333300", "#993300", "#993366", "#333399", "#333333",
];

/// Office theme colours, in the order `theme="n"` indexes them:
/// lt1, dk1, lt2, dk2, accent1-6, hlink, folHlink.
pub const DEFAULT_THEME_COLORS: [&str; 12] = [
    "#FFFFFF", "#000000", "#E7E6E6", "#44546A", "#4472C4", "#ED7D31", "#A5A5A5", "#FFC000",
    "#5B9BD5", "#70AD47", "#0563C1", "#954F72",
];

/// Scheme element names in theme index order.
const THEME_SLOTS: [&str; 12] = [
    "lt1", "dk1", "lt2", "dk2", "accent1", "accent2", "accent3", "accent4", "accent5", "accent6",
    "hlink", "folHlink",
];

/// Colour attributes of a `<fgColor>`-style element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorSpec {
    pub rgb: Option<String>,
    pub theme: Option<u32>,
    pub tint: Option<f64>,
    pub indexed: Option<u32>,
    pub auto: bool,
}

impl ColorSpec {
    pub fn from_element(e: &BytesStart) -> Self {
        Self {
            rgb: attr_string(e, b"rgb"),
            theme: attr_u32(e, b"theme"),
            tint: attr_f64(e, b"tint"),
            indexed: attr_u32(e, b"indexed"),
            auto: attr_bool(e, b"auto").unwrap_or(false),
        }
    }
}

/// Palettes a workbook may override.
#[derive(Debug, Clone)]
pub struct Palette {
    pub theme: Vec<String>,
    pub indexed: Vec<String>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME_COLORS.iter().map(|s| (*s).to_string()).collect(),
            indexed: Vec::new(),
        }
    }
}

/// Strip an optional `#` and ARGB alpha, returning `#RRGGBB`.
pub fn normalize_hex(raw: &str) -> Option<String> {
    let hex = raw.trim().trim_start_matches('#');
    let rgb = match hex.len() {
        8 => hex.get(2..)?,
        6 => hex,
        _ => return None,
    };
    rgb.chars()
        .all(|c| c.is_ascii_hexdigit())
        .then(|| format!("#{}", rgb.to_ascii_uppercase()))
}

/// Resolve a fill colour to `#RRGGBB`. Priority: rgb > theme > indexed.
///
/// `auto` fills have no concrete colour and resolve to `None`.
pub fn resolve_color(color: &ColorSpec, palette: &Palette) -> Option<String> {
    if let Some(rgb) = &color.rgb {
        return normalize_hex(rgb);
    }

    if let Some(theme_idx) = color.theme {
        let idx = theme_idx as usize;
        let base = palette
            .theme
            .get(idx)
            .map(String::as_str)
            .or_else(|| DEFAULT_THEME_COLORS.get(idx).copied())?;
        return match color.tint {
            Some(tint) if tint != 0.0 => apply_tint(base, tint),
            _ => Some(base.to_string()),
        };
    }

    if let Some(indexed) = color.indexed {
        // 64 is "system foreground", 65 "system background"
        match indexed {
            64 => return Some("#000000".to_string()),
            65 => return Some("#FFFFFF".to_string()),
            _ => {}
        }
        let idx = indexed as usize;
        return palette
            .indexed
            .get(idx)
            .cloned()
            .or_else(|| INDEXED_COLORS.get(idx).map(|c| (*c).to_string()));
    }

    None
}

/// Lighten (`tint > 0`) or darken (`tint < 0`) a colour in HSL space.
#[allow(clippy::many_single_char_names)]
pub fn apply_tint(hex_color: &str, tint: f64) -> Option<String> {
    let hex = normalize_hex(hex_color)?;
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    let (r, g, b) = (channel(1..3)?, channel(3..5)?, channel(5..7)?);

    let (h, s, l) = rgb_to_hsl(r, g, b);
    let l = if tint < 0.0 {
        l * (1.0 + tint)
    } else {
        (1.0 - l).mul_add(tint, l)
    };
    let (r, g, b) = hsl_to_rgb(h, s, l.clamp(0.0, 1.0));
    Some(format!("#{r:02X}{g:02X}{b:02X}"))
}

#[allow(clippy::many_single_char_names)]
fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let r = f64::from(r) / 255.0;
    let g = f64::from(g) / 255.0;
    let b = f64::from(b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if (max - min).abs() < f64::EPSILON {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if (max - r).abs() < f64::EPSILON {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if (max - g).abs() < f64::EPSILON {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (h / 6.0, s, l)
}

#[allow(
    clippy::many_single_char_names,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let to_byte = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
    if s.abs() < f64::EPSILON {
        let v = to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l.mul_add(-s, l + s)
    };
    let p = 2.0f64.mul_add(l, -q);

    (
        to_byte(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_rgb(p, q, h)),
        to_byte(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return ((q - p) * 6.0).mul_add(t, p);
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return ((q - p) * (2.0 / 3.0 - t)).mul_add(6.0, p);
    }
    p
}

/// Read the `<a:clrScheme>` of a theme part into theme index order.
///
/// Slots the theme leaves out fall back to the Office defaults.
pub fn parse_theme_colors<R: BufRead>(reader: R) -> Vec<String> {
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut found: HashMap<String, String> = HashMap::new();
    let mut current_slot: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e) | Event::Empty(ref e)) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
                if THEME_SLOTS.contains(&name) {
                    current_slot = Some(name.to_string());
                } else if let Some(slot) = &current_slot {
                    let value = match name {
                        "sysClr" => attr_string_local(e, b"lastClr"),
                        "srgbClr" => attr_string_local(e, b"val"),
                        _ => None,
                    };
                    if let Some(hex) = value.as_deref().and_then(normalize_hex) {
                        found.insert(slot.clone(), hex);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                let local = e.local_name();
                let name = std::str::from_utf8(local.as_ref()).unwrap_or("");
                if THEME_SLOTS.contains(&name) {
                    current_slot = None;
                } else if name == "clrScheme" {
                    break;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("theme part is malformed, using default colours: {e}");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    THEME_SLOTS
        .iter()
        .zip(DEFAULT_THEME_COLORS)
        .map(|(slot, default)| {
            found
                .remove(*slot)
                .unwrap_or_else(|| default.to_string())
        })
        .collect()
}
