/// Theme system: bundled color schemes plus per-color overrides from config.

use crate::config::ColorConfig;
use crate::core::LineKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_f32(self) -> [f32; 3] {
        [self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0]
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub fg: Color,
    pub bg: Color,
    pub prompt: Color,
    pub error: Color,
    pub notice: Color,
}

pub fn hex_to_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color { r, g, b })
}

impl Theme {
    /// White on black; errors in bright red.
    pub fn default_dark() -> Self {
        Self {
            name: "default".into(),
            fg: Color::rgb(255, 255, 255),
            bg: Color::rgb(0, 0, 0),
            prompt: Color::rgb(255, 255, 255),
            error: Color::rgb(255, 0, 0),
            notice: Color::rgb(42, 130, 218),
        }
    }

    pub fn dracula() -> Self {
        Self {
            name: "dracula".into(),
            fg: Color::rgb(248, 248, 242),
            bg: Color::rgb(40, 42, 54),
            prompt: Color::rgb(80, 250, 123),
            error: Color::rgb(255, 85, 85),
            notice: Color::rgb(139, 233, 253),
        }
    }

    /// Look up a bundled theme by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default_dark()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }

    /// Bundled theme named in config, with its hex overrides applied.
    /// Unknown names and malformed colors fall back to the default.
    pub fn from_config(colors: &ColorConfig) -> Self {
        let mut theme = Self::by_name(&colors.theme).unwrap_or_else(|| {
            log::warn!("unknown theme {:?}, using default", colors.theme);
            Self::default_dark()
        });
        if let Some(fg) = colors.foreground.as_deref().and_then(hex_to_color) {
            theme.fg = fg;
            theme.prompt = fg;
        }
        if let Some(bg) = colors.background.as_deref().and_then(hex_to_color) {
            theme.bg = bg;
        }
        theme
    }

    pub fn color_for(&self, kind: LineKind) -> Color {
        match kind {
            LineKind::Prompt => self.prompt,
            LineKind::Output => self.fg,
            LineKind::Error => self.error,
            LineKind::Notice => self.notice,
        }
    }

    /// List all bundled theme names.
    pub fn bundled_names() -> &'static [&'static str] {
        &["default", "dracula"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_color() {
        assert_eq!(hex_to_color("#ff0000"), Some(Color::rgb(255, 0, 0)));
        assert_eq!(hex_to_color("00ff00"), Some(Color::rgb(0, 255, 0)));
        assert_eq!(hex_to_color("#zzzzzz"), None);
        assert_eq!(hex_to_color("#fff"), None); // too short
        assert_eq!(hex_to_color("#ffé0"), None);
    }

    #[test]
    fn test_color_to_f32() {
        let f = Color::rgb(255, 128, 0).to_f32();
        assert!((f[0] - 1.0).abs() < 0.01);
        assert!((f[1] - 0.502).abs() < 0.01);
        assert!((f[2] - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_bundled_themes() {
        for name in Theme::bundled_names() {
            assert!(Theme::by_name(name).is_some(), "missing theme: {}", name);
        }
        assert!(Theme::by_name("nonexistent").is_none());
    }

    #[test]
    fn test_default_is_white_on_black() {
        let t = Theme::default_dark();
        assert_eq!(t.bg, Color::rgb(0, 0, 0));
        assert_eq!(t.color_for(LineKind::Output), Color::rgb(255, 255, 255));
        assert_eq!(t.color_for(LineKind::Error), Color::rgb(255, 0, 0));
    }

    #[test]
    fn test_from_config_overrides() {
        let colors = ColorConfig {
            theme: "dracula".into(),
            foreground: None,
            background: Some("#112233".into()),
        };
        let t = Theme::from_config(&colors);
        assert_eq!(t.name, "dracula");
        assert_eq!(t.bg, Color::rgb(17, 34, 51));
        assert_eq!(t.fg, Color::rgb(248, 248, 242));
    }

    #[test]
    fn test_from_config_unknown_theme() {
        let colors = ColorConfig {
            theme: "neon".into(),
            foreground: Some("not-a-color".into()),
            background: None,
        };
        let t = Theme::from_config(&colors);
        assert_eq!(t.name, "default");
        assert_eq!(t.fg, Color::rgb(255, 255, 255));
    }
}
