//! Smooth Unicode percent bar for in-flight transfers.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MUTED, C_PROGRESS, C_SECONDARY};

const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Render `caption ▉▉▏     42%` in `area`.  `percent` is 0..=100.
pub fn draw_percent(frame: &mut Frame, area: Rect, percent: f64, caption: &str) {
    if area.width < 8 || area.height == 0 {
        return;
    }

    let pct = percent.clamp(0.0, 100.0);
    let pct_label = format!("{:>3.0}%", pct);
    let caption_w = if caption.is_empty() {
        0
    } else {
        caption.chars().count() + 1
    };
    let bar_w = area
        .width
        .saturating_sub((caption_w + pct_label.len() + 1) as u16)
        .max(4) as usize;

    // Eighth-block smooth fill.
    let eighths = (pct / 100.0 * bar_w as f64 * 8.0) as usize;
    let full = eighths / 8;
    let partial = eighths % 8;

    let mut bar = String::with_capacity(bar_w + 4);
    for _ in 0..full {
        bar.push('█');
    }
    if full < bar_w {
        bar.push(BLOCKS[partial]);
        for _ in (full + 1)..bar_w {
            bar.push(' ');
        }
    }

    let mut spans = Vec::new();
    if !caption.is_empty() {
        spans.push(Span::styled(
            format!("{} ", caption),
            Style::default().fg(C_SECONDARY),
        ));
    }
    spans.push(Span::styled(bar, Style::default().fg(C_PROGRESS)));
    spans.push(Span::styled(
        format!(" {}", pct_label),
        Style::default().fg(C_MUTED),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Compact textual form for list rows, e.g. `↑ archive 42%`.
pub fn inline_label(target: &str, percent: f64) -> String {
    format!("↑ {} {:.0}%", target, percent.clamp(0.0, 100.0))
}
