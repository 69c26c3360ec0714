mod ui;

use anyhow::{Context, Result};
use ascii_globe::app::App;
use ascii_globe::config::{Config, CONFIG_FILE};
use ascii_globe::{data, logging};
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

fn main() -> Result<()> {
    let config = Config::load_or_default(Path::new(CONFIG_FILE))
        .with_context(|| format!("failed to load {CONFIG_FILE}"))?;

    let log_path = config.log_file.clone().unwrap_or_else(logging::default_log_path);
    logging::init(&log_path).context("failed to start logging")?;
    info!(log = %log_path.display(), "starting ascii-globe");

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Mouse drags and focus loss both feed the drag state
    execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange)?;

    // Run the app
    let result = run(&mut terminal, &config);

    // Disable mouse capture and restore terminal
    if let Err(e) = execute!(std::io::stdout(), DisableFocusChange, DisableMouseCapture) {
        warn!(error = %e, "failed to release mouse capture");
    }
    ratatui::restore();

    info!("exiting");
    result
}

/// Left-button drags rotate the globe
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.pointer_down(mouse.column, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => app.pointer_move(mouse.column, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => app.pointer_up(),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: &Config) -> Result<()> {
    let shapes = data::load_coastlines(config.coastlines.as_deref());
    let size = terminal.size()?;
    let mut app = App::new(config, shapes, size.width as usize, size.height as usize);

    let tick = Duration::from_millis(config.motion.tick_ms);
    let mut last_tick = Instant::now();
    app.request_frame();

    // Main loop
    loop {
        app.poll_frame();

        // Draw
        terminal.draw(|frame| ui::render(frame, &mut app))?;

        // Wait for input until the next tick is due
        let timeout = tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    // Only handle key press events (not release)
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Rotate with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.nudge(-1, 0),
                            KeyCode::Right | KeyCode::Char('l') => app.nudge(1, 0),
                            KeyCode::Up | KeyCode::Char('k') => app.nudge(0, -1),
                            KeyCode::Down | KeyCode::Char('j') => app.nudge(0, 1),

                            // Grid resolution
                            KeyCode::Char('+') | KeyCode::Char('=') => app.finer(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.coarser(),

                            KeyCode::Char('r') | KeyCode::Char('0') => app.reset_rotation(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::FocusLost => app.pointer_leave(),
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        let elapsed = last_tick.elapsed();
        if elapsed >= tick {
            app.on_tick(elapsed);
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
