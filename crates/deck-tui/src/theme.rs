//! Color palette and style constants for the control panel.

use ratatui::style::{Color, Modifier, Style};

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 18, 20);
pub const C_PRIMARY: Color = Color::Rgb(214, 216, 222);
pub const C_SECONDARY: Color = Color::Rgb(122, 128, 148);
pub const C_MUTED: Color = Color::Rgb(70, 76, 92);
pub const C_BORDER: Color = Color::Rgb(42, 46, 58);
pub const C_BORDER_FOCUSED: Color = Color::Rgb(92, 160, 200);
pub const C_SELECTION_BG: Color = Color::Rgb(30, 34, 44);
pub const C_DANGER: Color = Color::Rgb(235, 94, 90);
pub const C_LIVE: Color = Color::Rgb(90, 205, 130);
pub const C_WARN: Color = Color::Rgb(240, 180, 80);
pub const C_PROGRESS: Color = Color::Rgb(92, 160, 200);
pub const C_NAV_ACTIVE: Color = Color::Rgb(214, 216, 222);
pub const C_TOAST_INFO: Color = Color::Rgb(92, 160, 200);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(90, 205, 130);
pub const C_TOAST_WARNING: Color = Color::Rgb(240, 180, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(235, 94, 90);

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_selected_focused() -> Style {
    Style::default()
        .bg(C_SELECTION_BG)
        .fg(C_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_BORDER)
}
