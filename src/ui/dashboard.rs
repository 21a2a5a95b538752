// logmonitor - ui/dashboard.rs
//
// Terminal lifecycle and the render loop: take snapshots off the channel,
// fold them into the view state, redraw, and watch for Esc / Ctrl-C.
//
// The snapshot channel is a rendezvous: this loop parks in a short
// `recv_timeout` each pass, which is the window in which the scheduler's
// send can land. Key presses are polled between waits, so quit latency is
// bounded by one redraw interval.
//
// Render failures are retried once with a placeholder message; a second
// failure aborts the loop with a render error.

use crate::app::config::Config;
use crate::core::model::FrameSnapshot;
use crate::ui::panels;
use crate::ui::state::DashboardState;
use crate::util::constants::REDRAW_INTERVAL_MS;
use crate::util::error::{MonitorError, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::Paragraph;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

/// How long each loop pass waits for input before checking the channel.
const EVENT_POLL_MS: u64 = 50;

/// Run the dashboard until the user quits or the snapshot producer dies.
pub fn run(
    config: &Config,
    rx: Receiver<FrameSnapshot>,
    cancel: Arc<AtomicBool>,
) -> Result<()> {
    let mut terminal = setup_terminal().map_err(|source| MonitorError::Render { source })?;
    let result = event_loop(&mut terminal, config, rx, cancel);

    // Leave the terminal usable no matter how the loop ended.
    if let Err(e) = restore_terminal(&mut terminal) {
        tracing::warn!(error = %e, "Failed to restore terminal state");
    }
    result
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: &Config,
    rx: Receiver<FrameSnapshot>,
    cancel: Arc<AtomicBool>,
) -> Result<()> {
    let mut state = DashboardState::new(config);
    let snapshot_wait = Duration::from_millis(REDRAW_INTERVAL_MS);

    loop {
        if quit_requested().map_err(|source| MonitorError::Render { source })? {
            tracing::info!("Quit requested");
            cancel.store(true, Ordering::SeqCst);
            return Ok(());
        }

        // Park on the rendezvous channel; this is where snapshots land.
        match rx.recv_timeout(snapshot_wait) {
            Ok(snapshot) => state.apply(snapshot),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // Scheduler gone; its error (if any) surfaces at join.
                tracing::info!("Snapshot producer stopped, closing dashboard");
                return Ok(());
            }
        }

        draw(terminal, &state)?;
    }
}

/// True when Esc or Ctrl-C has been pressed.
fn quit_requested() -> io::Result<bool> {
    while event::poll(Duration::from_millis(EVENT_POLL_MS))? {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let ctrl_c = key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL);
            if key.code == KeyCode::Esc || ctrl_c {
                return Ok(true);
            }
        }
    }
    Ok(false)
}

/// Draw the dashboard, retrying once with a placeholder on failure.
fn draw(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    state: &DashboardState,
) -> Result<()> {
    if let Err(e) = terminal.draw(|frame| panels::draw(frame, state)) {
        tracing::warn!(error = %e, "Draw failed, retrying with placeholder");
        terminal
            .draw(|frame| {
                frame.render_widget(Paragraph::new("<render error>"), frame.area());
            })
            .map_err(|source| MonitorError::Render { source })?;
    }
    Ok(())
}
