//! Always-visible header: service indicator, toggle affordance, nav strip.
//!
//! The header is not focusable — it renders whatever the latest status poll
//! reported, on every view.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::action::View;
use crate::app_state::{AppState, InputMode};
use crate::theme::{
    C_DANGER, C_LIVE, C_MUTED, C_NAV_ACTIVE, C_PRIMARY, C_SECONDARY, C_WARN,
};

/// Indicator text for the current service state:
/// `(status label, toggle affordance, danger styling)`.
pub fn service_label(enabled: bool) -> (&'static str, &'static str, bool) {
    if enabled {
        ("Service running", "[t] stop service", true)
    } else {
        ("Service stopped", "[t] start service", false)
    }
}

/// Top strip: title, status dot + label, toggle hint, last-poll stamp.
pub fn draw_status_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let (label, affordance, danger) = service_label(state.status.service_enabled);

    let dot = if !state.status_seen {
        Span::styled("○", Style::default().fg(C_MUTED))
    } else if state.status.service_enabled {
        Span::styled("●", Style::default().fg(C_LIVE))
    } else {
        Span::styled("○", Style::default().fg(C_MUTED))
    };

    let mut spans = vec![
        Span::styled(
            " recdeck ",
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        dot,
        Span::raw(" "),
    ];

    if state.status_seen {
        spans.push(Span::styled(label, Style::default().fg(C_PRIMARY)));
        spans.push(Span::raw("  "));
        let affordance_style = if danger {
            Style::default().fg(C_DANGER)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        spans.push(Span::styled(affordance, affordance_style));
        let live = state.status.active_recordings.len();
        if live > 0 {
            spans.push(Span::styled(
                format!("  {} recording", live),
                Style::default().fg(C_LIVE),
            ));
            if live > 1 {
                spans.push(Span::styled("s", Style::default().fg(C_LIVE)));
            }
        }
    } else {
        spans.push(Span::styled(
            "connecting to service…",
            Style::default().fg(C_MUTED),
        ));
    }

    if state.poll_failing {
        spans.push(Span::styled("  offline?", Style::default().fg(C_WARN)));
    }

    // Right-aligned last-update stamp.
    if let Some(at) = state.last_status_at {
        let stamp = format!("updated {} ", at.format("%H:%M:%S"));
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let pad = (area.width as usize).saturating_sub(used + stamp.chars().count());
        spans.push(Span::raw(" ".repeat(pad)));
        spans.push(Span::styled(stamp, Style::default().fg(C_MUTED)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Nav strip: every view tag, with all controls for the active view lit.
pub fn draw_nav(frame: &mut Frame, area: Rect, active: View) {
    let mut spans = vec![Span::raw(" ")];
    for view in View::ALL {
        let is_active = view == active;
        let style = if is_active {
            Style::default()
                .fg(C_NAV_ACTIVE)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(C_SECONDARY)
        };
        spans.push(Span::styled(
            format!("[{}] {}", view.key(), view.title()),
            style,
        ));
        spans.push(Span::raw("   "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Bottom key bar, hints depend on the active view and input mode.
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, view: View, mode: InputMode) {
    let keys = match mode {
        InputMode::Editing => " type to edit  Enter confirm  Esc cancel",
        InputMode::Normal => match view {
            View::Home => " ↑↓ select  Enter stop recording  t toggle service  Tab/1-4 views  q quit",
            View::Channels => " ↑↓ select  a add  Space enable/disable  d remove  Tab/1-4 views  q quit",
            View::Recordings => {
                " ↑↓ select  y copy link  u upload  d delete  Tab/1-4 views  q quit"
            }
            View::Settings => " ↑↓ field  Enter edit  s save  g authorize youtube  Tab/1-4 views  q quit",
        },
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            keys,
            Style::default().fg(C_MUTED),
        ))),
        area,
    );
}
