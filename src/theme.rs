use ratatui::style::Color;

use crate::format::LabelColor;

#[derive(Debug, Clone, Copy)]
pub struct ThemePalette {
    pub name: &'static str,
    pub accent: Color,
    pub status_open: Color,
    pub status_closed: Color,
    pub bg_app: Color,
    pub bg_panel: Color,
    pub text_primary: Color,
    pub text_muted: Color,
    pub border_panel: Color,
    pub border_focus: Color,
    pub bg_selected: Color,
    pub warning: Color,
}

pub const THEMES: [ThemePalette; 2] = [
    ThemePalette {
        name: "night",
        accent: Color::Rgb(91, 157, 255),
        status_open: Color::Rgb(255, 167, 38),
        status_closed: Color::Rgb(102, 187, 106),
        bg_app: Color::Rgb(9, 13, 20),
        bg_panel: Color::Rgb(15, 20, 31),
        text_primary: Color::Rgb(226, 234, 250),
        text_muted: Color::Rgb(141, 157, 190),
        border_panel: Color::Rgb(39, 57, 98),
        border_focus: Color::Rgb(115, 156, 255),
        bg_selected: Color::Rgb(28, 42, 71),
        warning: Color::Rgb(238, 111, 129),
    },
    ThemePalette {
        name: "paper",
        accent: Color::Rgb(40, 53, 147),
        status_open: Color::Rgb(230, 81, 0),
        status_closed: Color::Rgb(46, 125, 50),
        bg_app: Color::Rgb(250, 250, 250),
        bg_panel: Color::Rgb(255, 255, 255),
        text_primary: Color::Rgb(33, 33, 33),
        text_muted: Color::Rgb(117, 117, 117),
        border_panel: Color::Rgb(224, 224, 224),
        border_focus: Color::Rgb(92, 107, 192),
        bg_selected: Color::Rgb(232, 234, 246),
        warning: Color::Rgb(198, 40, 40),
    },
];

pub fn resolve_theme(name: Option<&str>) -> &'static ThemePalette {
    if let Some(name) = name
        && let Some(theme) = THEMES
            .iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(name))
    {
        return theme;
    }
    default_theme()
}

pub fn default_theme() -> &'static ThemePalette {
    &THEMES[0]
}

/// Converts a `#rrggbb` color into a terminal color.
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn label_colors(color: LabelColor) -> (Color, Color) {
    (
        hex_color(color.background).unwrap_or(Color::Reset),
        hex_color(color.foreground).unwrap_or(Color::Reset),
    )
}

#[cfg(test)]
mod tests {
    use super::{default_theme, hex_color, label_colors, resolve_theme};
    use crate::format::label_color;
    use ratatui::style::Color;

    #[test]
    fn resolves_known_theme_case_insensitive() {
        let theme = resolve_theme(Some("PaPeR"));
        assert_eq!(theme.name, "paper");
    }

    #[test]
    fn falls_back_to_default_for_unknown_theme() {
        let theme = resolve_theme(Some("unknown"));
        assert_eq!(theme.name, default_theme().name);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(hex_color("#e8eaf6"), Some(Color::Rgb(0xe8, 0xea, 0xf6)));
        assert_eq!(hex_color("e8eaf6"), None);
        assert_eq!(hex_color("#zzzzzz"), None);
    }

    #[test]
    fn label_colors_follow_category_table() {
        let (background, foreground) = label_colors(label_color("安全"));
        assert_eq!(background, Color::Rgb(0xfc, 0xe4, 0xec));
        assert_eq!(foreground, Color::Rgb(0xc6, 0x28, 0x28));
    }
}
