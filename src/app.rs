use crate::braille::{self, BrailleCanvas};
use crate::color::{ColorLut, ColorScheme};
use crate::config::AppConfig;
use crate::simulation::ParticleField;
use crate::surface::{DrawSurface, FrameQueue};

/// Focus state for parameter editing in the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Focus {
    #[default]
    None,
    Particles,
    Links,
    LinkOpacity,
    Force,
    Reach,
    Render,
    Boundary,
    ColorScheme,
}

impl Focus {
    /// Tab cycles through parameters in sidebar order
    pub fn next(&self) -> Focus {
        match self {
            Focus::None => Focus::Particles,
            Focus::Particles => Focus::Links,
            Focus::Links => Focus::LinkOpacity,
            Focus::LinkOpacity => Focus::Force,
            Focus::Force => Focus::Reach,
            Focus::Reach => Focus::Render,
            Focus::Render => Focus::Boundary,
            Focus::Boundary => Focus::ColorScheme,
            Focus::ColorScheme => Focus::Particles, // Loop back
        }
    }

    /// Shift+Tab cycles in reverse
    pub fn prev(&self) -> Focus {
        match self {
            Focus::None => Focus::ColorScheme,
            Focus::Particles => Focus::ColorScheme, // Loop back
            Focus::Links => Focus::Particles,
            Focus::LinkOpacity => Focus::Links,
            Focus::Force => Focus::LinkOpacity,
            Focus::Reach => Focus::Force,
            Focus::Render => Focus::Reach,
            Focus::Boundary => Focus::Render,
            Focus::ColorScheme => Focus::Boundary,
        }
    }

    /// Get the line index in the parameters box for this focus
    pub fn line_index(&self) -> u16 {
        match self {
            Focus::None | Focus::Particles => 0,
            Focus::Links => 1,
            Focus::LinkOpacity => 2,
            Focus::Force => 3,
            Focus::Reach => 4,
            Focus::Render => 5,
            Focus::Boundary => 6,
            Focus::ColorScheme => 7,
        }
    }

    pub fn is_param(&self) -> bool {
        !matches!(self, Focus::None)
    }
}

/// Main application state
pub struct App {
    pub field: ParticleField,
    pub canvas: BrailleCanvas,
    pub frames: FrameQueue,
    pub pixel_ratio: f32,
    pub color_scheme: ColorScheme,
    pub color_lut: ColorLut,
    pub focus: Focus,
    pub fullscreen_mode: bool,
    pub show_help: bool,
    pub help_scroll: u16,
    /// One-line feedback shown in the status box
    pub status_message: Option<String>,
}

impl App {
    pub fn new(canvas_width: u16, canvas_height: u16, mut config: AppConfig, seed: Option<u64>) -> Self {
        config.sanitize();
        let pixel_ratio = config.pixel_ratio;
        let (width, height) = braille::calculate_viewport_size(canvas_width, canvas_height, pixel_ratio);

        let mut canvas = BrailleCanvas::new();
        canvas.set_size(width, height, pixel_ratio);

        let field = match seed {
            Some(seed) => ParticleField::with_seed(config.settings, width, height, seed),
            None => ParticleField::new(config.settings, width, height),
        };

        Self {
            field,
            canvas,
            frames: FrameQueue::new(),
            pixel_ratio,
            color_lut: config.color_scheme.build_lut(),
            color_scheme: config.color_scheme,
            focus: Focus::None,
            fullscreen_mode: config.fullscreen,
            show_help: false,
            help_scroll: 0,
            status_message: None,
        }
    }

    /// Run the pending frame, if one was scheduled
    pub fn tick(&mut self) {
        if self.frames.take() {
            self.field.tick(&mut self.canvas, &mut self.frames);
        }
    }

    /// Repaint the current state when the animation loop is not doing it
    fn refresh(&mut self) {
        if !self.field.is_running() {
            self.canvas.clear();
            self.field.draw(&mut self.canvas);
        }
    }

    pub fn start(&mut self) {
        self.field.start(&mut self.frames);
    }

    /// Start or stop the animation
    pub fn toggle_running(&mut self) {
        self.field.toggle(&mut self.frames);
    }

    /// Re-create all particles
    pub fn reset(&mut self) {
        self.field.reset();
        self.refresh();
    }

    /// Resize viewport to match new canvas size
    pub fn resize(&mut self, canvas_width: u16, canvas_height: u16) {
        let (width, height) =
            braille::calculate_viewport_size(canvas_width, canvas_height, self.pixel_ratio);
        self.field.resize(width, height, self.pixel_ratio, &mut self.canvas);
        self.refresh();
    }

    /// Track the mouse; `origin` is the terminal cell of the canvas top-left
    pub fn pointer_moved(&mut self, column: u16, row: u16, origin: (u16, u16)) {
        let (ox, oy) = origin;
        let inside = column >= ox
            && row >= oy
            && column < ox + self.canvas.cols
            && row < oy + self.canvas.rows;

        if inside {
            // Centre of the cell, in dots, then back to logical units
            let dot_x = (column - ox) as f32 * 2.0 + 1.0;
            let dot_y = (row - oy) as f32 * 4.0 + 2.0;
            self.field
                .set_pointer(dot_x / self.pixel_ratio, dot_y / self.pixel_ratio);
        } else {
            self.field.clear_pointer();
        }
    }

    pub fn pointer_left(&mut self) {
        self.field.clear_pointer();
    }

    pub fn next_focus(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn prev_focus(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_up(&mut self) {
        self.adjust_focused(1.0);
    }

    /// Handle adjusting the currently focused parameter
    pub fn adjust_focused_down(&mut self) {
        self.adjust_focused(-1.0);
    }

    fn adjust_focused(&mut self, sign: f32) {
        let settings = &mut self.field.settings;
        match self.focus {
            Focus::None => return,
            Focus::Particles => {
                settings.adjust_particle_count(10 * sign as i32, self.field.count);
                self.field.reset();
            }
            Focus::Links => settings.adjust_connection_distance(10.0 * sign),
            Focus::LinkOpacity => settings.adjust_link_opacity(0.05 * sign),
            Focus::Force => settings.adjust_force_radius(10.0 * sign),
            Focus::Reach => settings.adjust_pointer_link_radius(10.0 * sign),
            Focus::Render => settings.render_mode = settings.render_mode.next(),
            Focus::Boundary => settings.boundary_behavior = settings.boundary_behavior.next(),
            Focus::ColorScheme => {
                let scheme = if sign > 0.0 {
                    self.color_scheme.next()
                } else {
                    self.color_scheme.prev()
                };
                self.set_color_scheme(scheme);
            }
        }
        self.refresh();
    }

    fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
        self.color_lut = scheme.build_lut();
    }

    pub fn cycle_color_scheme(&mut self) {
        self.set_color_scheme(self.color_scheme.next());
        self.focus = Focus::ColorScheme;
    }

    pub fn cycle_render_mode(&mut self) {
        let settings = &mut self.field.settings;
        settings.render_mode = settings.render_mode.next();
        self.focus = Focus::Render;
        self.refresh();
    }

    pub fn cycle_boundary(&mut self) {
        let settings = &mut self.field.settings;
        settings.boundary_behavior = settings.boundary_behavior.next();
        self.focus = Focus::Boundary;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen_mode = !self.fullscreen_mode;
    }

    /// Toggle help overlay
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            self.help_scroll = 0; // Reset scroll when opening
        }
    }

    pub fn scroll_help_up(&mut self) {
        self.help_scroll = self.help_scroll.saturating_sub(1);
    }

    pub fn scroll_help_down(&mut self, max_scroll: u16) {
        self.help_scroll = (self.help_scroll + 1).min(max_scroll);
    }

    /// Snapshot of the current state as a config
    pub fn to_config(&self) -> AppConfig {
        AppConfig {
            settings: self.field.settings.clone(),
            color_scheme: self.color_scheme,
            pixel_ratio: self.pixel_ratio,
            fullscreen: self.fullscreen_mode,
            ..AppConfig::default()
        }
    }

    /// Write the current state to the default config path
    pub fn save_config(&mut self) {
        let result = match AppConfig::default_path() {
            Some(path) => self
                .to_config()
                .save_to_file(&path)
                .map(|_| format!("Saved {}", path.display())),
            None => Err("No config directory on this platform".to_string()),
        };

        match result {
            Ok(message) => {
                log::info!("{}", message);
                self.status_message = Some("Config saved".to_string());
            }
            Err(err) => {
                log::warn!("{}", err);
                self.status_message = Some("Save failed".to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{FieldSettings, RenderMode};

    fn app(particles: usize) -> App {
        let config = AppConfig {
            settings: FieldSettings {
                particle_count: Some(particles),
                ..FieldSettings::default()
            },
            pixel_ratio: 0.5,
            ..AppConfig::default()
        };
        App::new(40, 10, config, Some(11))
    }

    #[test]
    fn test_new_sizes_viewport_from_canvas() {
        let app = app(5);
        assert_eq!((app.field.width, app.field.height), (160.0, 80.0));
        assert_eq!((app.canvas.cols, app.canvas.rows), (40, 10));
        assert_eq!(app.field.particles.len(), 5);
        assert!(!app.field.is_running());
    }

    #[test]
    fn test_tick_runs_only_scheduled_frames() {
        let mut app = app(5);
        let before = app.field.particles.clone();
        app.tick();
        assert_eq!(app.field.particles, before);

        app.start();
        app.tick();
        assert_ne!(app.field.particles, before);
        assert!(app.frames.is_pending());

        app.toggle_running();
        app.tick();
        assert!(!app.frames.is_pending());
    }

    #[test]
    fn test_pointer_maps_cells_to_logical_units() {
        let mut app = app(0);
        app.pointer_moved(23, 4, (23, 1));
        assert!(app.field.pointer.is_active());
        assert_eq!((app.field.pointer.x, app.field.pointer.y), (2.0, 28.0));

        // Outside the canvas clears the pointer
        app.pointer_moved(2, 4, (23, 1));
        assert!(!app.field.pointer.is_active());

        app.pointer_moved(30, 5, (23, 1));
        app.pointer_left();
        assert!(!app.field.pointer.is_active());
    }

    #[test]
    fn test_adjust_particles_reinitializes() {
        let mut app = app(20);
        app.focus = Focus::Particles;
        app.adjust_focused_up();
        assert_eq!(app.field.particles.len(), 30);
        app.adjust_focused_down();
        app.adjust_focused_down();
        assert_eq!(app.field.particles.len(), 10);
    }

    #[test]
    fn test_stopped_changes_repaint_canvas() {
        let mut app = app(30);
        assert!(app.canvas.cells().is_empty());
        app.cycle_render_mode();
        assert_eq!(app.field.settings.render_mode, RenderMode::Glyphs);
        assert!(!app.canvas.cells().is_empty());
    }

    #[test]
    fn test_resize_recreates_particles() {
        let mut app = app(12);
        app.resize(20, 5);
        assert_eq!((app.field.width, app.field.height), (80.0, 40.0));
        assert_eq!(app.field.particles.len(), 12);
        for p in &app.field.particles {
            assert!(p.x <= 80.0 && p.y <= 40.0);
        }
    }

    #[test]
    fn test_focus_cycle_round_trip() {
        let mut focus = Focus::Particles;
        for _ in 0..8 {
            assert_eq!(focus.next().prev(), focus);
            focus = focus.next();
        }
        assert_eq!(focus, Focus::Particles);
    }

    #[test]
    fn test_to_config_captures_state() {
        let mut app = app(3);
        app.cycle_color_scheme();
        app.toggle_fullscreen();
        let config = app.to_config();
        assert_eq!(config.color_scheme, ColorScheme::Amber);
        assert!(config.fullscreen);
        assert_eq!(config.settings.particle_count, Some(3));
        assert_eq!(config.pixel_ratio, 0.5);
    }

    #[test]
    fn test_out_of_range_config_is_clamped() {
        let config = AppConfig {
            settings: FieldSettings {
                particle_count: Some(10_000),
                glow_radius: 1e30,
                ..FieldSettings::default()
            },
            pixel_ratio: 1e20,
            ..AppConfig::default()
        };
        let mut app = App::new(40, 10, config, Some(1));
        assert_eq!(app.pixel_ratio, 4.0);
        assert_eq!((app.canvas.cols, app.canvas.rows), (40, 10));
        assert_eq!(app.field.particles.len(), 500);

        app.start();
        app.tick();
        assert!(!app.canvas.cells().is_empty());
    }

    #[test]
    fn test_right_border_is_outside_canvas() {
        let config = AppConfig {
            pixel_ratio: 0.3,
            ..AppConfig::default()
        };
        let mut app = App::new(27, 10, config, Some(2));
        assert_eq!((app.canvas.cols, app.canvas.rows), (27, 10));

        app.pointer_moved(1 + 26, 1, (1, 1));
        assert!(app.field.pointer.is_active());
        app.pointer_moved(1 + 27, 1, (1, 1));
        assert!(!app.field.pointer.is_active());
    }
}
