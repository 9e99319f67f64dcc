use {
    crate::pipeline::RefreshMessage,
    crate::source::REGIONS,
    crate::state::DashboardState,
    ratatui::{backend::CrosstermBackend, Terminal},
    std::{sync::Arc, time::Duration},
    tokio::sync::{mpsc, RwLock},
};

/// Run the TUI event loop
///
/// Renders the shared dashboard state on a fixed cadence and forwards
/// region selection changes to the refresh scheduler.
pub async fn run_ui(
    state: Arc<RwLock<DashboardState>>,
    sender: mpsc::Sender<RefreshMessage>,
) -> Result<(), Box<dyn std::error::Error>> {
    let stdout = std::io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    crossterm::terminal::enable_raw_mode()?;

    // Alternate screen isolates the dashboard from stderr logging
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::EnterAlternateScreen,
        crossterm::cursor::Hide
    )?;
    terminal.clear()?;

    let mut region_index = { state.read().await.region_index() };

    loop {
        // Check for keyboard input (non-blocking)
        if crossterm::event::poll(Duration::from_millis(250))? {
            if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                match key.code {
                    crossterm::event::KeyCode::Char('q') | crossterm::event::KeyCode::Esc => {
                        break;
                    }
                    crossterm::event::KeyCode::Left | crossterm::event::KeyCode::Char('[') => {
                        region_index = (region_index + REGIONS.len() - 1) % REGIONS.len();
                        let _ = sender
                            .send(RefreshMessage::SelectRegion(
                                REGIONS[region_index].to_string(),
                            ))
                            .await;
                    }
                    crossterm::event::KeyCode::Right | crossterm::event::KeyCode::Char(']') => {
                        region_index = (region_index + 1) % REGIONS.len();
                        let _ = sender
                            .send(RefreshMessage::SelectRegion(
                                REGIONS[region_index].to_string(),
                            ))
                            .await;
                    }
                    _ => {}
                }
            }
        }

        {
            let state = state.read().await;
            let area = terminal.size()?;
            terminal.draw(|f| {
                crate::ui::layout::render_layout(f, area, &state);
            })?;
        }
    }

    // Cleanup - restore terminal state
    crossterm::execute!(
        std::io::stdout(),
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    crossterm::terminal::disable_raw_mode()?;

    let _ = sender.send(RefreshMessage::Shutdown).await;
    Ok(())
}
