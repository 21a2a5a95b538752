// logmonitor - ui/panels/rates.rs
//
// The one-line frame/global rates summary.

use crate::ui::format;
use crate::ui::state::DashboardState;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let text = match &state.snapshot {
        Some(snapshot) => format::rates_line(&snapshot.rates),
        None => "No traffic".to_string(),
    };

    let panel =
        Paragraph::new(text).block(Block::default().borders(Borders::ALL).title("Rates"));
    frame.render_widget(panel, area);
}
