use ratatui::style::Color;

/// Runtime theme for the showcase
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Brand colors
    pub brand: Color,
    pub brand_light: Color,
    pub shine: Color,
    pub star: Color,

    // Semantic colors
    pub selection: Color,
    pub paused: Color,
    pub accent: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg0: Color::Rgb(0x0b, 0x12, 0x1f),
            bg1: Color::Rgb(0x13, 0x1d, 0x2e),
            bg2: Color::Rgb(0x1e, 0x2a, 0x3f),
            fg0: Color::Rgb(0xe6, 0xed, 0xf5),
            fg1: Color::Rgb(0xc3, 0xcd, 0xdb),
            grey0: Color::Rgb(0x5b, 0x67, 0x7a),
            grey1: Color::Rgb(0x8a, 0x96, 0xa8),
            brand: Color::Rgb(0x1e, 0x6f, 0xd9),
            brand_light: Color::Rgb(0x5f, 0xa8, 0xff),
            shine: Color::Rgb(0xf4, 0xf8, 0xff),
            star: Color::Rgb(0xf5, 0xb7, 0x2b),
            selection: Color::Rgb(0x1e, 0x2a, 0x3f),
            paused: Color::Rgb(0xe7, 0x8a, 0x4e),
            accent: Color::Rgb(0x5f, 0xa8, 0xff),
        }
    }
}

impl Theme {
    /// Blend `fg` over `bg` at `opacity`; terminals have no alpha channel
    pub fn fade(fg: Color, bg: Color, opacity: f64) -> Color {
        let opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
        match (fg, bg) {
            (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg_, bb)) => {
                let mix = |f: u8, b: u8| (b as f64 + (f as f64 - b as f64) * opacity).round() as u8;
                Color::Rgb(mix(fr, br), mix(fg_, bg_), mix(fb, bb))
            }
            _ if opacity >= 0.5 => fg,
            _ => bg,
        }
    }
}
