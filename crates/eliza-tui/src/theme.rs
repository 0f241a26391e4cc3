//! Catppuccin Mocha color palette for the TUI.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Speakers
    pub user: Color,
    pub responder: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),    // #1e1e2e
            surface: Color::Rgb(49, 50, 68), // #313244

            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            user: Color::Rgb(180, 190, 254),      // #b4befe (lavender)
            responder: Color::Rgb(148, 226, 213), // #94e2d5 (teal)

            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe
        }
    }

    /// Color used for a speaker's name.
    pub fn speaker(&self, speaker: eliza_engine::Speaker) -> Color {
        match speaker {
            eliza_engine::Speaker::User => self.user,
            eliza_engine::Speaker::Responder => self.responder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eliza_engine::Speaker;

    #[test]
    fn test_speakers_have_distinct_colors() {
        let theme = Theme::default();
        assert_ne!(theme.speaker(Speaker::User), theme.speaker(Speaker::Responder));
    }
}
