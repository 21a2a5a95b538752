// logmonitor - ui/panels/mod.rs
//
// Screen layout and panel dispatch. Mirrors the dashboard's grid: an alert
// banner across the top; the rates line and the req/s bar chart on the
// left; most-hit sections and the HTTP code bins on the right.

pub mod alert;
pub mod chart;
pub mod codes;
pub mod rates;
pub mod sections;

use crate::ui::state::DashboardState;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Render the whole dashboard for one redraw.
pub fn draw(frame: &mut Frame, state: &DashboardState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(frame.area());

    alert::render(frame, rows[0], state);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(columns[0]);
    rates::render(frame, left[0], state);
    chart::render(frame, left[1], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);
    sections::render(frame, right[0], state);
    codes::render(frame, right[1], state);
}
