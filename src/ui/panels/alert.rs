// logmonitor - ui/panels/alert.rs
//
// Alert banner: configured parameters, current status, and the most
// recent transition messages.

use crate::ui::format;
use crate::ui::state::DashboardState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let settings = format::alert_settings(state.alert_threshold, state.alert_period);

    let status = match &state.snapshot {
        None => Span::styled("waiting for traffic data", Style::default().fg(Color::DarkGray)),
        Some(snapshot) if snapshot.alert.is_on => Span::styled(
            "FIRING",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Some(snapshot) if snapshot.alert.date.is_some() => {
            Span::styled("recovered", Style::default().fg(Color::Green))
        }
        Some(_) => Span::styled("idle", Style::default().fg(Color::Green)),
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(settings),
        Span::raw("  Status: "),
        status,
    ])];
    for message in state.messages.iter().take(area.height.saturating_sub(3) as usize) {
        lines.push(Line::from(Span::raw(message.clone())));
    }

    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Alert"),
    );
    frame.render_widget(panel, area);
}
