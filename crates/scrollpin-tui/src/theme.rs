use ratatui::style::Color;

/// Runtime theme with configurable colors
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub grey1: Color,
    pub grey2: Color,

    // Palette colors
    pub yellow: Color,
    pub aqua: Color,
    pub purple: Color,

    // Semantic colors
    pub card_border: Color,
    pub front_border: Color,
    pub pinned: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        gruvbox_dark()
    }
}

fn gruvbox_dark() -> Theme {
    Theme {
        bg0: Color::Rgb(0x28, 0x28, 0x28),
        bg1: Color::Rgb(0x32, 0x30, 0x2f),
        bg2: Color::Rgb(0x45, 0x40, 0x3d),
        fg0: Color::Rgb(0xd4, 0xbe, 0x98),
        grey1: Color::Rgb(0x92, 0x83, 0x74),
        grey2: Color::Rgb(0xa8, 0x99, 0x84),
        yellow: Color::Rgb(0xd8, 0xa6, 0x57),
        aqua: Color::Rgb(0x89, 0xb4, 0x82),
        purple: Color::Rgb(0xd3, 0x86, 0x9b),
        card_border: Color::Rgb(0x92, 0x83, 0x74),
        front_border: Color::Rgb(0xd8, 0xa6, 0x57),
        pinned: Color::Rgb(0xa9, 0xb6, 0x65),
        accent: Color::Rgb(0x89, 0xb4, 0x82),
    }
}

fn nord() -> Theme {
    Theme {
        bg0: Color::Rgb(0x2e, 0x34, 0x40), // nord0
        bg1: Color::Rgb(0x3b, 0x42, 0x52), // nord1
        bg2: Color::Rgb(0x43, 0x4c, 0x5e), // nord2
        fg0: Color::Rgb(0xec, 0xef, 0xf4), // nord6
        grey1: Color::Rgb(0x5e, 0x68, 0x7a),
        grey2: Color::Rgb(0xd8, 0xde, 0xe9), // nord4
        yellow: Color::Rgb(0xeb, 0xcb, 0x8b),
        aqua: Color::Rgb(0x8f, 0xbc, 0xbb),
        purple: Color::Rgb(0x81, 0xa1, 0xc1),
        card_border: Color::Rgb(0x5e, 0x68, 0x7a),
        front_border: Color::Rgb(0x88, 0xc0, 0xd0),
        pinned: Color::Rgb(0xa3, 0xbe, 0x8c),
        accent: Color::Rgb(0x8f, 0xbc, 0xbb),
    }
}

fn dracula() -> Theme {
    Theme {
        bg0: Color::Rgb(0x28, 0x2a, 0x36),
        bg1: Color::Rgb(0x34, 0x37, 0x46),
        bg2: Color::Rgb(0x44, 0x47, 0x5a),
        fg0: Color::Rgb(0xf8, 0xf8, 0xf2),
        grey1: Color::Rgb(0x62, 0x72, 0xa4),
        grey2: Color::Rgb(0xbf, 0xbf, 0xbf),
        yellow: Color::Rgb(0xf1, 0xfa, 0x8c),
        aqua: Color::Rgb(0x8b, 0xe9, 0xfd),
        purple: Color::Rgb(0xff, 0x79, 0xc6),
        card_border: Color::Rgb(0x62, 0x72, 0xa4),
        front_border: Color::Rgb(0xff, 0x79, 0xc6),
        pinned: Color::Rgb(0x50, 0xfa, 0x7b),
        accent: Color::Rgb(0x8b, 0xe9, 0xfd),
    }
}

/// Look up a built-in theme by name, falling back to Gruvbox Dark
pub fn load_theme(name: &str) -> Theme {
    match name.to_lowercase().as_str() {
        "gruvbox-dark" | "gruvbox" => gruvbox_dark(),
        "nord" => nord(),
        "dracula" => dracula(),
        other => {
            tracing::warn!("Unknown theme '{}', using gruvbox-dark", other);
            gruvbox_dark()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_theme_is_case_insensitive() {
        assert_eq!(load_theme("NORD").bg0, nord().bg0);
    }

    #[test]
    fn test_front_card_border_stands_out() {
        for theme in [gruvbox_dark(), nord(), dracula()] {
            assert_ne!(theme.front_border, theme.card_border);
            assert_ne!(theme.front_border, theme.bg1);
        }
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(load_theme("does-not-exist").bg0, Theme::default().bg0);
    }
}
