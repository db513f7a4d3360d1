use ratatui::style::Color;

use crate::model::config::UiConfig;
use crate::model::preferences::ThemePreference;
use crate::model::task::Priority;

/// Resolved color palette for the TUI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub selection_bg: Color,
    pub notice: Color,
    pub priority_high: Color,
    pub priority_medium: Color,
    pub priority_low: Color,
}

impl Theme {
    pub fn light() -> Self {
        Theme {
            background: Color::Rgb(0xFA, 0xF8, 0xF5),
            text: Color::Rgb(0x3A, 0x36, 0x4A),
            text_bright: Color::Rgb(0x12, 0x10, 0x1C),
            highlight: Color::Rgb(0xC2, 0x1F, 0x6A),
            dim: Color::Rgb(0x9A, 0x96, 0xA8),
            selection_bg: Color::Rgb(0xEC, 0xE4, 0xF2),
            notice: Color::Rgb(0xB0, 0x60, 0x00),
            priority_high: Color::Rgb(0xD3, 0x2F, 0x2F),
            priority_medium: Color::Rgb(0xE0, 0x8A, 0x00),
            priority_low: Color::Rgb(0x2E, 0x7D, 0x32),
        }
    }

    pub fn dark() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            notice: Color::Rgb(0xFF, 0xD7, 0x00),
            priority_high: Color::Rgb(0xFF, 0x44, 0x44),
            priority_medium: Color::Rgb(0xFF, 0xD7, 0x00),
            priority_low: Color::Rgb(0x44, 0xFF, 0x88),
        }
    }

    /// Palette for the stored preference, with `[ui.colors]` overrides applied
    pub fn new(preference: ThemePreference, ui: &UiConfig) -> Self {
        let mut theme = match preference {
            ThemePreference::Light => Theme::light(),
            ThemePreference::Dark => Theme::dark(),
        };

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "selection_bg" => theme.selection_bg = color,
                "notice" => theme.notice = color,
                "priority_high" => theme.priority_high = color,
                "priority_medium" => theme.priority_medium = color,
                "priority_low" => theme.priority_low = color,
                _ => tracing::warn!(key = %key, "unknown color slot"),
            }
        }

        theme
    }

    /// Color of the priority marker; unprioritized tasks use the dim color
    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::High => self.priority_high,
            Priority::Medium => self.priority_medium,
            Priority::Low => self.priority_low,
            Priority::None => self.dim,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF4444"), Some(Color::Rgb(0xFF, 0x44, 0x44)));
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None); // too short
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
        assert_eq!(parse_hex_color("#éé4444"), None);
    }

    #[test]
    fn preference_selects_palette() {
        let ui = UiConfig::default();
        assert_eq!(Theme::new(ThemePreference::Light, &ui), Theme::light());
        assert_eq!(Theme::new(ThemePreference::Dark, &ui), Theme::dark());
        assert_ne!(Theme::light().background, Theme::dark().background);
    }

    #[test]
    fn overrides_apply_to_either_palette() {
        let mut ui = UiConfig::default();
        ui.colors.insert("highlight".into(), "#112233".into());
        ui.colors.insert("nonsense".into(), "#000000".into());
        ui.colors.insert("dim".into(), "not-a-color".into());

        for pref in [ThemePreference::Light, ThemePreference::Dark] {
            let theme = Theme::new(pref, &ui);
            assert_eq!(theme.highlight, Color::Rgb(0x11, 0x22, 0x33));
        }
        // Invalid values leave the default in place
        assert_eq!(Theme::new(ThemePreference::Dark, &ui).dim, Theme::dark().dim);
    }

    #[test]
    fn priority_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.priority_color(Priority::High), theme.priority_high);
        assert_eq!(theme.priority_color(Priority::Low), theme.priority_low);
        assert_eq!(theme.priority_color(Priority::None), theme.dim);
    }
}
