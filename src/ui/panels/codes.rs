// logmonitor - ui/panels/codes.rs
//
// HTTP status codes grouped into 1xx..5xx class bins.

use crate::ui::format;
use crate::ui::state::DashboardState;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let bins = state
        .snapshot
        .as_ref()
        .map(|snapshot| format::code_bins(&snapshot.codes))
        .unwrap_or_default();

    let lines: Vec<Line> = bins
        .iter()
        .enumerate()
        .map(|(class, count)| Line::from(format!("{}xx: {count}", class + 1)))
        .collect();

    let panel =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("HTTP codes"));
    frame.render_widget(panel, area);
}
