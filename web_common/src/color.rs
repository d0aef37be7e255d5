//! EPG colour tags and contrast-safe label colours.

/// Label colour used on dark backgrounds.
pub const LIGHT_TEXT: &str = "#ffffff";
/// Label colour used on light backgrounds and for unparseable colours.
pub const DARK_TEXT: &str = "#111111";
/// Relative luminance above which the dark label is used.
pub const LUMINANCE_THRESHOLD: f64 = 0.179;
/// Swatch colour for entries without a tag.
pub const DEFAULT_SWATCH: &str = "#ffffff";

/// Parse `#rgb`, `#rrggbb` or `rgb(r, g, b)`.
pub fn parse_color(input: &str) -> Option<(u8, u8, u8)> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return match hex.len() {
            3 => {
                let mut out = [0u8; 3];
                for (i, c) in hex.chars().enumerate() {
                    let v = c.to_digit(16)? as u8;
                    out[i] = v * 17;
                }
                Some((out[0], out[1], out[2]))
            }
            6 => {
                let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                Some((r, g, b))
            }
            _ => None,
        };
    }
    let lower = s.to_ascii_lowercase();
    let inner = lower.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = inner
        .split(',')
        .map(|p| p.trim().parse::<u8>().ok())
        .collect::<Option<Vec<_>>>()?;
    match parts.as_slice() {
        [r, g, b] => Some((*r, *g, *b)),
        _ => None,
    }
}

fn linearize(channel: u8) -> f64 {
    let c = f64::from(channel) / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance of an sRGB colour.
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * linearize(r) + 0.7152 * linearize(g) + 0.0722 * linearize(b)
}

/// Text colour that stays readable on `background`.
pub fn contrast_text_color(background: &str) -> &'static str {
    match parse_color(background) {
        Some((r, g, b)) if relative_luminance(r, g, b) > LUMINANCE_THRESHOLD => DARK_TEXT,
        Some(_) => LIGHT_TEXT,
        None => DARK_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_notations() {
        assert_eq!(parse_color("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_color("#1e90ff"), Some((30, 144, 255)));
        assert_eq!(parse_color("rgb(10, 20, 30)"), Some((10, 20, 30)));
        assert_eq!(parse_color("blue"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("rgb(300, 0, 0)"), None);
    }

    #[test]
    fn light_backgrounds_get_dark_text() {
        assert_eq!(contrast_text_color("#ffffff"), DARK_TEXT);
        assert_eq!(contrast_text_color("#ffff00"), DARK_TEXT);
        assert_eq!(contrast_text_color("#000000"), LIGHT_TEXT);
        assert_eq!(contrast_text_color("#1a237e"), LIGHT_TEXT);
    }

    #[test]
    fn unparseable_colours_fall_back_to_dark_text() {
        assert_eq!(contrast_text_color("not-a-colour"), DARK_TEXT);
        assert_eq!(contrast_text_color(""), DARK_TEXT);
    }
}
