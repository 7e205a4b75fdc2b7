//! Host color strings → paint colors.

use peniko::Color;

/// Parse a single hex digit.
fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// Parse a hex color string: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`.
/// The leading `#` is optional.
pub fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let bytes = hex.as_bytes();

    match bytes.len() {
        3 | 4 => {
            let mut c = [255u8; 4];
            for (slot, &b) in c.iter_mut().zip(bytes) {
                *slot = hex_val(b)? * 17;
            }
            Some(Color::from_rgba8(c[0], c[1], c[2], c[3]))
        }
        6 | 8 => {
            let mut c = [255u8; 4];
            for (slot, pair) in c.iter_mut().zip(bytes.chunks(2)) {
                *slot = hex_val(pair[0])? << 4 | hex_val(pair[1])?;
            }
            Some(Color::from_rgba8(c[0], c[1], c[2], c[3]))
        }
        _ => None,
    }
}

/// Parse a host color, falling back when the string is not a hex color.
pub fn parse_or(hex: &str, fallback: Color) -> Color {
    parse_hex(hex).unwrap_or_else(|| {
        log::warn!("unsupported color {hex:?}, using fallback");
        fallback
    })
}

/// Emit a color as `#RRGGBB` or `#RRGGBBAA`.
pub fn to_hex(color: Color) -> String {
    let [r, g, b, a] = color.to_rgba8().to_u8_array();
    if a == 255 {
        format!("#{r:02X}{g:02X}{b:02X}")
    } else {
        format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
    }
}
