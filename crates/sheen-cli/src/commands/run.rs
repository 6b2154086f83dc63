use std::io;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use sheen_core::motion::{clock::frame_duration, FrameClock};
use sheen_core::AppConfig;
use sheen_tui::{
    app::App,
    event::{AppEvent, EventHandler},
    input::handle_key_event,
    widgets,
};

pub async fn run(config: Arc<AppConfig>) -> Result<()> {
    let clock = Arc::new(FrameClock::new(config.motion.frame_rate)?);

    // Create app state before touching the terminal so config errors print normally
    let mut app = App::new(config.clone(), clock.clone())?;
    info!(frame_ms = ?clock.frame(), "Preview started");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("Sheen"))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &config);

    // Every motion stops with the app, before the terminal is handed back
    drop(app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Preview stopped");
    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    config: &AppConfig,
) -> Result<()> {
    let event_handler = EventHandler::new(frame_duration(config.motion.frame_rate));

    loop {
        app.update();

        // Draw UI
        terminal.draw(|frame| widgets::render(frame, app))?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app);
                    app.apply(action)?;
                }
                AppEvent::Click(column, row) => app.click(column, row),
                AppEvent::Hover(column, row) => app.hover(column, row),
                AppEvent::Wheel(notches) => {
                    app.scroll_by(notches as f64 * sheen_tui::app::SCROLL_STEP)
                }
                AppEvent::Resize(width, height) => app.resize(width, height),
                AppEvent::Tick => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
