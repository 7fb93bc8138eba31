//! Centralized theme module for TUI colors and styles

use ratatui::prelude::*;

use crate::scoring::ProfileLabel;

/// Luma above which the terminal background counts as light
const LIGHT_LUMA: f32 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

/// Resolve the configured theme; "auto" (or nothing) asks the terminal.
pub fn resolve_theme(setting: Option<&str>) -> Theme {
    match setting.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("dark") => Theme::Dark,
        Some("light") => Theme::Light,
        _ => match terminal_light::luma() {
            Ok(luma) if luma > LIGHT_LUMA => Theme::Light,
            Ok(_) => Theme::Dark,
            Err(e) => {
                tracing::debug!("could not detect terminal background: {}", e);
                Theme::Dark
            }
        },
    }
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Likert scale
    pub scale_selected: Style,
    pub scale_idle: Style,

    pub gauge: Color,

    // Radar chart
    pub radar_grid: Color,
    pub radar_axis: Color,
    pub radar_shape: Color,

    // Profiles
    pub leisure: Color,
    pub food_driven: Color,
    pub cultural_food: Color,

    // General
    pub title_color: Color,
    pub muted: Color,
    pub heading: Style,

    // Status bar
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            scale_selected: Style::new().fg(Color::Black).bg(Color::Cyan).bold(),
            scale_idle: Style::new().fg(Color::Gray),
            gauge: Color::Cyan,
            radar_grid: Color::Indexed(238),
            radar_axis: Color::DarkGray,
            radar_shape: Color::Yellow,
            leisure: Color::Cyan,
            food_driven: Color::Yellow,
            cultural_food: Color::Green,
            title_color: Color::Cyan,
            muted: Color::Gray,
            heading: Style::new().bold().underlined(),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            scale_selected: Style::new().fg(Color::White).bg(Color::Blue).bold(),
            scale_idle: Style::new().fg(Color::DarkGray),
            gauge: Color::Blue,
            radar_grid: Color::Indexed(252),
            radar_axis: Color::Gray,
            radar_shape: Color::Magenta,
            leisure: Color::Blue,
            food_driven: Color::Indexed(130),
            cultural_food: Color::Indexed(28),
            title_color: Color::Blue,
            muted: Color::DarkGray,
            heading: Style::new().bold().underlined(),
            status_bar_bg: Color::Indexed(254),
            status_key_color: Color::Blue,
            flash_success: Color::Indexed(28),
            flash_error: Color::Red,
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn profile_color(&self, profile: ProfileLabel) -> Color {
        match profile {
            ProfileLabel::LeisureTraveler => self.leisure,
            ProfileLabel::FoodDrivenTraveler => self.food_driven,
            ProfileLabel::CulturalFoodTraveler => self.cultural_food,
        }
    }
}
