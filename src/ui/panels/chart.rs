// logmonitor - ui/panels/chart.rs
//
// Bar chart of the last frames' request rates, oldest on the left.

use crate::ui::state::DashboardState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{BarChart, Block, Borders};
use ratatui::Frame;

pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState) {
    let labels: Vec<String> = (1..=state.history.len()).map(|i| i.to_string()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .map(String::as_str)
        .zip(state.history.iter().copied())
        .collect();

    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Req/s"))
        .data(&data)
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Blue))
        .value_style(Style::default().fg(Color::Yellow));
    frame.render_widget(chart, area);
}
