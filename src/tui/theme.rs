//! Color palette and styles for the TUI

use ratatui::prelude::*;

/// Readiness at or above this reads as "ready to start"
pub const READINESS_HIGH: f64 = 3.5;
/// Readiness below this reads as "needs groundwork"
pub const READINESS_LOW: f64 = 2.5;

#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Score colors (traffic light, green is best)
    pub score_high: Color,
    pub score_mid: Color,
    pub score_low: Color,

    pub bar_empty: Color,
    pub bar_negative: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub out_of_range: Color,

    pub header_style: Style,
    pub row_selected: Style,

    pub muted: Color,
    pub title_color: Color,

    pub tab_active_style: Style,
    pub tab_inactive_style: Style,

    // Weights panel
    pub weight_selected: Style,
    pub weight_penalty: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_warning: Color,

    // Popups
    pub popup_border: Color,
    pub popup_title: Style,
    pub popup_bg: Color,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            score_high: Color::Green,
            score_mid: Color::Yellow,
            score_low: Color::Red,
            bar_empty: Color::DarkGray,
            bar_negative: Color::Magenta,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            out_of_range: Color::LightRed,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            tab_active_style: Style::new().fg(Color::Cyan).bold().reversed(),
            tab_inactive_style: Style::new().fg(Color::DarkGray),
            weight_selected: Style::new().fg(Color::Cyan).bold(),
            weight_penalty: Color::LightMagenta,
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_warning: Color::Yellow,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
            popup_bg: Color::Indexed(234),
        }
    }

    /// Color for a priority score relative to the best score on screen
    pub fn score_color(&self, score: f64, max_score: f64) -> Color {
        let percentage = if max_score > 0.0 {
            (score / max_score) * 100.0
        } else {
            0.0
        };

        if percentage >= 70.0 {
            self.score_high
        } else if percentage >= 40.0 {
            self.score_mid
        } else {
            self.score_low
        }
    }

    /// Color for an absolute readiness score
    pub fn readiness_color(&self, readiness: f64) -> Color {
        if readiness >= READINESS_HIGH {
            self.score_high
        } else if readiness >= READINESS_LOW {
            self.score_mid
        } else {
            self.score_low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_color_thresholds() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.score_color(2.0, 2.0), Color::Green);
        assert_eq!(theme.score_color(1.0, 2.0), Color::Yellow);
        assert_eq!(theme.score_color(0.5, 2.0), Color::Red);
        assert_eq!(theme.score_color(1.0, 0.0), Color::Red);
    }

    #[test]
    fn test_readiness_color_thresholds() {
        let theme = ThemeColors::dark();
        assert_eq!(theme.readiness_color(3.75), Color::Green);
        assert_eq!(theme.readiness_color(3.0), Color::Yellow);
        assert_eq!(theme.readiness_color(1.0), Color::Red);
    }
}
