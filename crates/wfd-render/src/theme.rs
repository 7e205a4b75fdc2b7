use peniko::Color;

/// Theme-dependent colors for painting the designer.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub background: Color,
    pub grid: Color,
    pub activity_text: Color,
    /// Outline of the selected activity.
    pub selection: Color,
    /// Used when an activity's own color cannot be parsed.
    pub activity_fallback: Color,
    pub invalid_icon: Color,
    pub connector: Color,
    pub connection: Color,
    pub label_background: Color,
    pub label_text: Color,
}

impl Theme {
    pub fn light() -> Self {
        Self {
            background: Color::from_rgba8(0xF5, 0xF5, 0xF7, 0xFF),
            grid: Color::from_rgba8(0x00, 0x00, 0x00, 0x0D),
            activity_text: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xFF),
            selection: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xFF),
            activity_fallback: Color::from_rgba8(0x86, 0x86, 0x8B, 0xFF),
            invalid_icon: Color::from_rgba8(0xFF, 0xD6, 0x0A, 0xFF),
            connector: Color::from_rgba8(0x3A, 0x3A, 0x3C, 0xFF),
            connection: Color::from_rgba8(0x63, 0x63, 0x66, 0xFF),
            label_background: Color::from_rgba8(0x63, 0x63, 0x66, 0xFF),
            label_text: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xFF),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: Color::from_rgba8(0x1C, 0x1C, 0x1E, 0xFF),
            grid: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0x0A),
            activity_text: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xFF),
            selection: Color::from_rgba8(0xFF, 0xFF, 0xFF, 0xFF),
            activity_fallback: Color::from_rgba8(0x63, 0x63, 0x66, 0xFF),
            invalid_icon: Color::from_rgba8(0xFF, 0xD6, 0x0A, 0xFF),
            connector: Color::from_rgba8(0xAE, 0xAE, 0xB2, 0xFF),
            connection: Color::from_rgba8(0x98, 0x98, 0x9D, 0xFF),
            label_background: Color::from_rgba8(0x48, 0x48, 0x4A, 0xFF),
            label_text: Color::from_rgba8(0xF2, 0xF2, 0xF7, 0xFF),
        }
    }

    /// Resolve a theme by name; unknown names get the light theme.
    pub fn named(name: &str) -> Self {
        match name {
            "dark" => Self::dark(),
            "light" => Self::light(),
            other => {
                log::warn!("unknown theme {other:?}, using light");
                Self::light()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}
