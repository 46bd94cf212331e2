use crate::settings::{FieldSettings, RenderMode};
use crate::surface::{DrawSurface, FrameScheduler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Line width of particle-to-particle links
const LINK_WIDTH: f32 = 1.0;
/// Line width of particle-to-pointer links
const POINTER_LINK_WIDTH: f32 = 2.0;

/// A single moving dot (or glyph)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Fixed at creation
    pub radius: f32,
    /// Fixed at creation
    pub opacity: f32,
    pub glyph: Option<char>,
}

impl Particle {
    /// Euclidean distance to a point
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = x - self.x;
        let dy = y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Last known pointer position, or a far-away sentinel when inactive
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub const INACTIVE: Pointer = Pointer {
        x: -1000.0,
        y: -1000.0,
    };

    /// Anything past this toward the sentinel counts as "not interacting"
    const ACTIVE_THRESHOLD: f32 = -500.0;

    pub fn is_active(&self) -> bool {
        self.x > Self::ACTIVE_THRESHOLD && self.y > Self::ACTIVE_THRESHOLD
    }
}

impl Default for Pointer {
    fn default() -> Self {
        Self::INACTIVE
    }
}

/// Opacity of a link drawn between two points `distance` apart.
///
/// Falls linearly from `base` at distance 0 to 0 at `threshold`; `None` when
/// the points are too far apart to be linked.
pub fn link_opacity(distance: f32, threshold: f32, base: f32) -> Option<f32> {
    if distance < threshold {
        Some(base * (1.0 - distance / threshold))
    } else {
        None
    }
}

/// Attraction impulse toward the pointer for a particle `distance` away
fn pointer_force(distance: f32, radius: f32, strength: f32) -> Option<f32> {
    if distance < radius {
        Some((radius - distance) / radius * strength)
    } else {
        None
    }
}

/// Particle field state
pub struct ParticleField {
    pub particles: Vec<Particle>,
    pub pointer: Pointer,
    pub width: f32,
    pub height: f32,
    /// Number of particles created on the next (re)initialization
    pub count: usize,
    pub settings: FieldSettings,
    running: bool,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(settings: FieldSettings, width: f32, height: f32) -> Self {
        Self::with_rng(settings, width, height, StdRng::from_entropy())
    }

    /// Deterministic field for a given seed
    pub fn with_seed(settings: FieldSettings, width: f32, height: f32, seed: u64) -> Self {
        Self::with_rng(settings, width, height, StdRng::seed_from_u64(seed))
    }

    fn with_rng(settings: FieldSettings, width: f32, height: f32, rng: StdRng) -> Self {
        let count = settings.count_for_width(width);
        let mut field = Self {
            particles: Vec::new(),
            pointer: Pointer::INACTIVE,
            width,
            height,
            count,
            settings,
            running: false,
            rng,
        };
        field.initialize(width, height, count);
        log::info!(
            "particle field initialized with {} particles ({}x{})",
            field.particles.len(),
            width,
            height
        );
        field
    }

    /// Replace the particle collection with `count` fresh particles
    pub fn initialize(&mut self, width: f32, height: f32, count: usize) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.count = count;

        let max_speed = self.settings.max_speed;
        let mut particles = Vec::with_capacity(count);
        for i in 0..count {
            // gen::<f32>() scaling keeps zero-size viewports valid
            particles.push(Particle {
                x: self.rng.gen::<f32>() * self.width,
                y: self.rng.gen::<f32>() * self.height,
                vx: (self.rng.gen::<f32>() - 0.5) * 2.0 * max_speed,
                vy: (self.rng.gen::<f32>() - 0.5) * 2.0 * max_speed,
                radius: self.rng.gen::<f32>() * 2.0 + 1.0,
                opacity: self.rng.gen::<f32>() * 0.6 + 0.4,
                glyph: self.settings.glyph_for(i),
            });
        }
        self.particles = particles;
    }

    /// Re-create the current population in the current viewport
    pub fn reset(&mut self) {
        self.count = self.settings.count_for_width(self.width);
        self.initialize(self.width, self.height, self.count);
    }

    /// Resize the surface and re-seed the particles for the new viewport
    pub fn resize<S: DrawSurface + ?Sized>(
        &mut self,
        width: f32,
        height: f32,
        pixel_ratio: f32,
        surface: &mut S,
    ) {
        surface.set_size(width, height, pixel_ratio);
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.count = self.settings.count_for_width(self.width);

        if !self.particles.is_empty() {
            self.initialize(self.width, self.height, self.count);
        }
        log::debug!(
            "resized to {}x{} (ratio {}), {} particles",
            self.width,
            self.height,
            pixel_ratio,
            self.particles.len()
        );
    }

    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = Pointer { x, y };
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = Pointer::INACTIVE;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin the tick chain; no-op when already running
    pub fn start<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
        if !self.running {
            self.running = true;
            frames.request_frame();
            log::info!("animation started");
        }
    }

    /// Halt the tick chain; the next pending tick exits without rescheduling
    pub fn stop(&mut self) {
        if self.running {
            log::info!("animation stopped");
        }
        self.running = false;
    }

    /// Toggle between running and stopped
    pub fn toggle<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
        if self.running {
            self.stop();
        } else {
            self.start(frames);
        }
    }

    /// Advance one step, draw it, and schedule the next frame
    pub fn tick<S, F>(&mut self, surface: &mut S, frames: &mut F)
    where
        S: DrawSurface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        if !self.running {
            return;
        }

        surface.clear();
        self.step();
        self.draw(surface);

        frames.request_frame();
    }

    /// Integrate positions, reflect at the walls, and apply pointer attraction
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        let boundary = self.settings.boundary_behavior;
        let pointer = self.pointer;
        let force_radius = self.settings.force_radius;
        let force_strength = self.settings.force_strength;

        for particle in &mut self.particles {
            particle.x += particle.vx;
            particle.y += particle.vy;

            if particle.x < 0.0 || particle.x > width {
                particle.vx = -particle.vx;
                particle.x = boundary.apply(particle.x, width);
            }
            if particle.y < 0.0 || particle.y > height {
                particle.vy = -particle.vy;
                particle.y = boundary.apply(particle.y, height);
            }

            if pointer.is_active() {
                let distance = particle.distance_to(pointer.x, pointer.y);
                if let Some(force) = pointer_force(distance, force_radius, force_strength) {
                    particle.vx += (pointer.x - particle.x) * force;
                    particle.vy += (pointer.y - particle.y) * force;
                }
            }
        }
    }

    /// Render particles, their links, and the pointer links
    pub fn draw<S: DrawSurface + ?Sized>(&self, surface: &mut S) {
        let settings = &self.settings;

        for particle in &self.particles {
            match (settings.render_mode, particle.glyph) {
                (RenderMode::Glyphs, Some(glyph)) => {
                    surface.draw_glyph(particle.x, particle.y, glyph, particle.opacity)
                }
                _ => surface.fill_circle(
                    particle.x,
                    particle.y,
                    particle.radius,
                    particle.opacity,
                    settings.glow_radius,
                ),
            }
        }

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.distance_to(b.x, b.y);
                if let Some(opacity) =
                    link_opacity(distance, settings.connection_distance, settings.link_opacity)
                {
                    surface.draw_line(a.x, a.y, b.x, b.y, LINK_WIDTH, opacity);
                }
            }
        }

        if self.pointer.is_active() {
            let Pointer { x: px, y: py } = self.pointer;
            for particle in &self.particles {
                let distance = particle.distance_to(px, py);
                if let Some(opacity) = link_opacity(
                    distance,
                    settings.pointer_link_radius,
                    settings.pointer_link_opacity,
                ) {
                    surface.draw_line(particle.x, particle.y, px, py, POINTER_LINK_WIDTH, opacity);
                }
            }
        }
    }
}
