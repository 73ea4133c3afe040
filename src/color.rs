//! Hex color parsing and conversion to XRender fill colors

use x11rb::protocol::render::Color;

/// An RGB color parsed from a `#RRGGBB` hex string.
///
/// No alpha channel is stored here; opacity is a separate config field and
/// is applied when converting to an XRender color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Parse a 6-digit hex color. The leading `#` is optional.
    pub fn parse(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        // Byte length alone is not enough: slicing a multibyte string at
        // fixed offsets would panic mid-character
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Format as `#RRGGBB`
    pub fn format(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Convert to an XRender fill color at the given opacity.
    ///
    /// XRender expects premultiplied 16-bit channels, so each component is
    /// scaled by the alpha value.
    pub fn to_render_color(&self, opacity: f32) -> Color {
        let alpha = opacity.clamp(0.0, 1.0);
        let channel = |c: u8| -> u16 { (f32::from(c) / 255.0 * alpha * 65535.0).round() as u16 };
        Color {
            red: channel(self.r),
            green: channel(self.g),
            blue: channel(self.b),
            alpha: (alpha * 65535.0).round() as u16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_and_without_hash() {
        assert_eq!(HexColor::parse("#FF0000"), Some(HexColor { r: 255, g: 0, b: 0 }));
        assert_eq!(HexColor::parse("00ff7f"), Some(HexColor { r: 0, g: 255, b: 127 }));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(HexColor::parse("#FF00"), None);
        assert_eq!(HexColor::parse("#GG0000"), None);
        assert_eq!(HexColor::parse(""), None);
        assert_eq!(HexColor::parse("#AARRGGBB"), None);
    }

    #[test]
    fn test_parse_rejects_multibyte_input() {
        // Six bytes but two characters; must not panic while a color is
        // being typed into the settings field
        assert_eq!(HexColor::parse("\u{20ac}\u{20ac}"), None);
        assert_eq!(HexColor::parse("#ффф"), None);
        assert_eq!(HexColor::parse("FF00é0"), None);
    }

    #[test]
    fn test_format_round_trip() {
        let color = HexColor { r: 18, g: 52, b: 86 };
        assert_eq!(HexColor::parse(&color.format()), Some(color));
    }

    #[test]
    fn test_render_color_full_opacity() {
        let c = HexColor { r: 255, g: 0, b: 0 }.to_render_color(1.0);
        assert_eq!(c.red, 65535);
        assert_eq!(c.green, 0);
        assert_eq!(c.alpha, 65535);
    }

    #[test]
    fn test_render_color_premultiplies() {
        let c = HexColor { r: 255, g: 255, b: 255 }.to_render_color(0.5);
        assert_eq!(c.alpha, 32768);
        // Premultiplied: channels never exceed alpha
        assert!(c.red <= c.alpha);
        assert!(c.green <= c.alpha);
        assert!(c.blue <= c.alpha);
    }
}
