mod app;
mod braille;
mod color;
mod config;
mod settings;
mod simulation;
mod surface;
mod ui;

use app::{App, Focus};
use clap::Parser;
use color::ColorScheme;
use config::AppConfig;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use settings::{BoundaryBehavior, RenderMode};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use surface::FramePacer;

#[derive(Parser, Debug)]
#[command(name = "particle-field")]
#[command(about = "Interactive animated particle field in the terminal")]
struct Args {
    /// Number of particles (default: 100, or 60 on narrow terminals)
    #[arg(short = 'p', long)]
    particles: Option<usize>,

    /// Distance under which particles are linked (10-400)
    #[arg(long = "connection-distance")]
    connection_distance: Option<f32>,

    /// Radius of the pointer's pull (10-400)
    #[arg(long = "force-radius")]
    force_radius: Option<f32>,

    /// Particle rendering (circles, glyphs)
    #[arg(long)]
    render: Option<String>,

    /// Characters cycled through in glyph mode
    #[arg(long)]
    label: Option<String>,

    /// Edge behavior (clamp, bounce)
    #[arg(long)]
    boundary: Option<String>,

    /// Color scheme (aqua, amber, violet, mono)
    #[arg(long)]
    color: Option<String>,

    /// Braille dots per logical unit
    #[arg(long = "pixel-ratio")]
    pixel_ratio: Option<f32>,

    /// Random seed for reproducible layouts
    #[arg(long)]
    seed: Option<u64>,

    /// Load configuration from this file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the resolved configuration to this file and exit
    #[arg(long = "export-config")]
    export_config: Option<PathBuf>,

    /// Write logs to this file (filter with RUST_LOG)
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Start with the animation stopped
    #[arg(long, default_value = "false")]
    paused: bool,
}

fn parse_render_mode(s: &str) -> RenderMode {
    match s.to_lowercase().as_str() {
        "glyphs" | "glyph" | "letters" | "text" => RenderMode::Glyphs,
        _ => RenderMode::Circles,
    }
}

fn parse_boundary(s: &str) -> BoundaryBehavior {
    match s.to_lowercase().as_str() {
        "bounce" | "reflect" | "mirror" => BoundaryBehavior::Bounce,
        _ => BoundaryBehavior::Clamp,
    }
}

fn parse_color_scheme(s: &str) -> ColorScheme {
    match s.to_lowercase().as_str() {
        "amber" => ColorScheme::Amber,
        "violet" | "purple" => ColorScheme::Violet,
        "mono" | "white" => ColorScheme::Mono,
        _ => ColorScheme::Aqua,
    }
}

/// Route `log` output to a file; without one logging stays off so the TUI is not disturbed
fn init_logging(path: Option<&Path>) -> io::Result<()> {
    if let Some(path) = path {
        let file = File::create(path)?;
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

/// Defaults, then the config file, then CLI flags
fn resolve_config(args: &Args) -> Result<AppConfig, String> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => match AppConfig::default_path().filter(|path| path.exists()) {
            Some(path) => AppConfig::load_from_file(&path).unwrap_or_else(|err| {
                log::warn!("ignoring {}: {}", path.display(), err);
                AppConfig::default()
            }),
            None => AppConfig::default(),
        },
    };

    let settings = &mut config.settings;
    if let Some(particles) = args.particles {
        settings.particle_count = Some(particles.min(500));
    }
    if let Some(distance) = args.connection_distance {
        settings.connection_distance = distance.clamp(10.0, 400.0);
    }
    if let Some(radius) = args.force_radius {
        settings.force_radius = radius.clamp(10.0, 400.0);
    }
    if let Some(render) = &args.render {
        settings.render_mode = parse_render_mode(render);
    }
    if let Some(label) = &args.label {
        settings.label = label.clone();
    }
    if let Some(boundary) = &args.boundary {
        settings.boundary_behavior = parse_boundary(boundary);
    }
    if let Some(color) = &args.color {
        config.color_scheme = parse_color_scheme(color);
    }
    if let Some(ratio) = args.pixel_ratio {
        config.pixel_ratio = ratio;
    }

    // CLI values go through the same bounds as the config file
    config.sanitize();
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = resolve_config(&args)?;

    if let Some(path) = &args.export_config {
        config.save_to_file(path)?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Get initial terminal size and create app
    let size = terminal.size()?;
    let frame_rect = Rect::new(0, 0, size.width, size.height);
    let (canvas_width, canvas_height) = ui::get_canvas_size(frame_rect, config.fullscreen);
    let mut app = App::new(canvas_width, canvas_height, config, args.seed);

    if !args.paused {
        app.start();
    }

    let res = run_app(&mut terminal, &mut app);

    // Cleanup
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("event loop failed: {:?}", err);
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Resize the app to whatever the current layout leaves for the canvas
fn fit_to_terminal(app: &mut App, width: u16, height: u16) {
    let (canvas_width, canvas_height) =
        ui::get_canvas_size(Rect::new(0, 0, width, height), app.fullscreen_mode);
    app.resize(canvas_width, canvas_height);
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    // Target ~60fps for smooth animation
    const FRAME_DURATION: Duration = Duration::from_millis(16);
    let mut pacer = FramePacer::new(FRAME_DURATION);

    loop {
        // Render current state
        terminal.draw(|frame| ui::render(frame, app))?;

        // Wait for input only until the next frame is due
        if event::poll(pacer.time_until_due(Instant::now()))? {
            match event::read()? {
                Event::Key(key) => {
                    // Only process Press events
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }

                    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }

                    match key.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                        KeyCode::Char(' ') => app.toggle_running(),
                        KeyCode::Char('r') | KeyCode::Char('R') => app.reset(),
                        KeyCode::Char('g') | KeyCode::Char('G') => app.cycle_render_mode(),
                        KeyCode::Char('b') | KeyCode::Char('B') => app.cycle_boundary(),
                        KeyCode::Char('c') | KeyCode::Char('C') => app.cycle_color_scheme(),
                        KeyCode::Char('s') | KeyCode::Char('S') => app.save_config(),
                        KeyCode::Char('v') | KeyCode::Char('V') => {
                            app.toggle_fullscreen();
                            let size = terminal.size()?;
                            fit_to_terminal(app, size.width, size.height);
                        }
                        KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                            app.toggle_help()
                        }

                        // Navigation
                        KeyCode::Tab => app.next_focus(),
                        KeyCode::BackTab => app.prev_focus(),
                        KeyCode::Up if !app.show_help => app.adjust_focused_up(),
                        KeyCode::Down if !app.show_help => app.adjust_focused_down(),
                        KeyCode::Esc => {
                            if app.show_help {
                                app.toggle_help();
                            } else if app.focus.is_param() {
                                app.focus = Focus::None;
                            }
                        }
                        KeyCode::Char('j') | KeyCode::Char('J') if app.show_help => {
                            app.scroll_help_down(ui::HELP_CONTENT_LINES);
                        }
                        KeyCode::Char('k') | KeyCode::Char('K') if app.show_help => {
                            app.scroll_help_up();
                        }
                        _ => {}
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_) => {
                        let origin = ui::get_canvas_origin(app.fullscreen_mode);
                        app.pointer_moved(mouse.column, mouse.row, origin);
                    }
                    _ => {}
                },
                Event::FocusLost => app.pointer_left(),
                Event::Resize(width, height) => fit_to_terminal(app, width, height),
                _ => {}
            }
        }

        // Run the frame the field scheduled, if any, at most once per interval
        if pacer.due(Instant::now()) {
            app.tick();
        }
    }
}
