mod app;
mod ui;

use anyhow::Result;
use app::App;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use std::path::Path;
use std::time::Duration;
use tui_globe::data;
use tui_globe::map::LayerKind;

fn main() -> Result<()> {
    // Log to a file when RUST_LOG is set; stderr would corrupt the TUI.
    let _log_guard = init_logging();

    let mut terminal = ratatui::init();
    terminal.clear()?;

    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run(&mut terminal);

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    if std::env::var("RUST_LOG").is_err() {
        return None;
    }
    let appender = tracing_appender::rolling::never(".", "tui-globe.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();
    Some(guard)
}

/// Handle mouse events: drag to spin the globe, wheel to zoom.
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.zoom_in(),
        MouseEventKind::ScrollDown => app.zoom_out(),
        MouseEventKind::ScrollLeft => app.pan(15, 0),
        MouseEventKind::ScrollRight => app.pan(-15, 0),
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

/// Read a byte-count limit in megabytes from the environment.
fn env_limit_mb(name: &str) -> Option<u64> {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(|mb| mb * 1024 * 1024)
}

fn run(terminal: &mut DefaultTerminal) -> Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize);

    // Cache budgets for the external tile cache; this shell only stores them.
    if let Some(bytes) = env_limit_mb("TUI_GLOBE_TILE_CACHE_MB") {
        app.tile_cache.set_persistent_limit(bytes);
    }
    if let Some(bytes) = env_limit_mb("TUI_GLOBE_TILE_MEMORY_MB") {
        app.tile_cache.set_volatile_limit(bytes);
    }
    tracing::info!(
        persistent = app.tile_cache.persistent_limit(),
        volatile = app.tile_cache.volatile_limit(),
        "tile cache limits"
    );

    // Load Natural Earth data when available, else the built-in coarse world.
    let data_dir = Path::new("data");
    if data_dir.exists() {
        app.layers = data::load_layers(data_dir);
    }
    if app.layers.is_empty() {
        app.layers = data::builtin_world();
    }

    loop {
        terminal.draw(|frame| ui::render(frame, &app))?;

        // ~60fps event polling.
        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => app.quit(),

                            // Rotate with hjkl or arrow keys
                            KeyCode::Left | KeyCode::Char('h') => app.rotate_left(),
                            KeyCode::Right | KeyCode::Char('l') => app.rotate_right(),
                            KeyCode::Up | KeyCode::Char('k') => app.rotate_up(),
                            KeyCode::Down | KeyCode::Char('j') => app.rotate_down(),

                            // Zoom
                            KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
                            KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

                            // Layer toggles
                            KeyCode::Char('i') | KeyCode::Char('I') => app.toggle_ice(),
                            KeyCode::Char('b') | KeyCode::Char('B') => app.toggle_borders(),
                            KeyCode::Char('r') | KeyCode::Char('R') => {
                                app.toggle_layer(LayerKind::River)
                            }
                            KeyCode::Char('L') => app.toggle_layer(LayerKind::Lake),

                            // Reset view
                            KeyCode::Char('0') => app.reset_view(),

                            _ => {}
                        }
                    }
                }
                Event::Mouse(mouse) => {
                    handle_mouse(&mut app, mouse);
                }
                Event::Resize(width, height) => {
                    app.resize(width as usize, height as usize);
                }
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
