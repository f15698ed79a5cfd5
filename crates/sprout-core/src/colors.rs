//! Terminal styling for engine traces and match-tree dumps.

/// Escape sequences keyed by what they highlight. [`Colors::OFF`] holds
/// empty strings, so formatting code never branches on color support.
#[derive(Clone, Copy, Debug)]
pub struct Colors {
    /// Rule names and operator labels.
    pub rule: &'static str,
    /// Terminals and consumed input.
    pub text: &'static str,
    pub failure: &'static str,
    /// Offsets and spans.
    pub position: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        rule: "\x1b[34m",
        text: "\x1b[32m",
        failure: "\x1b[31m",
        position: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        rule: "",
        text: "",
        failure: "",
        position: "",
        reset: "",
    };
}
