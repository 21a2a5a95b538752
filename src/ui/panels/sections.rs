// logmonitor - ui/panels/sections.rs
//
// Top sections by hit count for the current frame. The snapshot already
// carries the hits in rank order; this panel only truncates the list.

use crate::ui::format;
use crate::ui::state::DashboardState;
use crate::util::constants::MAX_SECTIONS_SHOWN;
use ratatui::layout::Rect;
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let items: Vec<ListItem> = match &state.snapshot {
        Some(snapshot) if !snapshot.hits.is_empty() => snapshot
            .hits
            .iter()
            .take(MAX_SECTIONS_SHOWN)
            .map(|hit| ListItem::new(format::hit_line(hit)))
            .collect(),
        _ => vec![ListItem::new("No traffic")],
    };

    let panel =
        List::new(items).block(Block::default().borders(Borders::ALL).title("Most hits"));
    frame.render_widget(panel, area);
}
