//! ANSI color codes for layout dumps and execution traces.

/// Palette keyed by what is being printed rather than by hue.
///
/// `name` covers struct and word names, `literal` covers values pushed or
/// stored, `meta` covers offsets, sizes and stack signatures.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    pub name: &'static str,
    pub literal: &'static str,
    pub meta: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        name: "\x1b[34m",
        literal: "\x1b[32m",
        meta: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        name: "",
        literal: "",
        meta: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }

    /// Wrap `text` in `color`, followed by a reset when colors are on.
    pub fn paint(&self, color: &str, text: impl std::fmt::Display) -> String {
        format!("{color}{text}{}", self.reset)
    }
}
