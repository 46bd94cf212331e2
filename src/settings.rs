use serde::{Deserialize, Serialize};

/// How a particle is drawn
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum RenderMode {
    /// Translucent filled circle with a soft glow
    #[default]
    Circles,
    /// One character of the label per particle
    Glyphs,
}

impl RenderMode {
    pub fn name(&self) -> &str {
        match self {
            RenderMode::Circles => "Circles",
            RenderMode::Glyphs => "Glyphs",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            RenderMode::Circles => RenderMode::Glyphs,
            RenderMode::Glyphs => RenderMode::Circles,
        }
    }
}

/// Boundary behavior - what happens when particles hit viewport edges
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BoundaryBehavior {
    /// Reverse velocity and clamp the position onto the edge
    #[default]
    Clamp,
    /// Reverse velocity and mirror the overshoot back inside
    Bounce,
}

impl BoundaryBehavior {
    pub fn name(&self) -> &str {
        match self {
            BoundaryBehavior::Clamp => "Clamp",
            BoundaryBehavior::Bounce => "Bounce",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            BoundaryBehavior::Clamp => BoundaryBehavior::Bounce,
            BoundaryBehavior::Bounce => BoundaryBehavior::Clamp,
        }
    }

    /// Bring a coordinate that left `[0, max]` back inside
    pub fn apply(&self, value: f32, max: f32) -> f32 {
        let folded = match self {
            BoundaryBehavior::Clamp => value,
            BoundaryBehavior::Bounce => {
                if value < 0.0 {
                    -value
                } else if value > max {
                    max - (value - max)
                } else {
                    value
                }
            }
        };
        // A mirrored overshoot larger than the viewport still has to land inside
        folded.clamp(0.0, max.max(0.0))
    }
}

/// All particle field settings consolidated into one struct
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSettings {
    // === Population ===
    /// Explicit particle count (None = pick by viewport width)
    pub particle_count: Option<usize>,
    /// Count used on wide viewports
    pub desktop_count: usize,
    /// Count used below `compact_width`
    pub compact_count: usize,
    /// Viewport width (logical units) under which the compact count applies
    pub compact_width: f32,

    // === Motion ===
    /// Initial velocity components are drawn from [-max_speed, max_speed)
    pub max_speed: f32,
    /// What happens at viewport edges
    pub boundary_behavior: BoundaryBehavior,

    // === Links ===
    /// Particles closer than this are joined by a line (10-400)
    pub connection_distance: f32,
    /// Opacity of a particle link at distance 0
    pub link_opacity: f32,

    // === Pointer ===
    /// Radius inside which the pointer attracts particles (10-400)
    pub force_radius: f32,
    /// Attraction scale applied per tick
    pub force_strength: f32,
    /// Radius inside which particles are linked to the pointer (10-500)
    pub pointer_link_radius: f32,
    /// Opacity of a pointer link at distance 0
    pub pointer_link_opacity: f32,

    // === Visual ===
    pub render_mode: RenderMode,
    /// Glow extent around circles, in logical units (0 = no glow)
    pub glow_radius: f32,
    /// Characters assigned cyclically to particles in glyph mode
    pub label: String,
}

impl Default for FieldSettings {
    fn default() -> Self {
        Self {
            particle_count: None,
            desktop_count: 100,
            compact_count: 60,
            compact_width: 768.0,

            max_speed: 0.5,
            boundary_behavior: BoundaryBehavior::default(),

            connection_distance: 120.0,
            link_opacity: 0.4,

            force_radius: 150.0,
            force_strength: 0.001,
            pointer_link_radius: 200.0,
            pointer_link_opacity: 0.6,

            render_mode: RenderMode::default(),
            glow_radius: 10.0,
            label: "PORTFOLIO".to_string(),
        }
    }
}

/// Clamp into `[min, max]`, replacing NaN and infinities with `fallback`
pub fn bounded(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

impl FieldSettings {
    /// Pull every value loaded from disk back into the range the adjusters allow
    pub fn sanitize(&mut self) {
        let defaults = FieldSettings::default();

        self.particle_count = self.particle_count.map(|count| count.min(500));
        self.desktop_count = self.desktop_count.min(500);
        self.compact_count = self.compact_count.min(500);
        self.compact_width = bounded(self.compact_width, 0.0, 100_000.0, defaults.compact_width);
        self.max_speed = bounded(self.max_speed, 0.0, 10.0, defaults.max_speed);

        self.connection_distance =
            bounded(self.connection_distance, 10.0, 400.0, defaults.connection_distance);
        self.link_opacity = bounded(self.link_opacity, 0.0, 1.0, defaults.link_opacity);

        self.force_radius = bounded(self.force_radius, 10.0, 400.0, defaults.force_radius);
        self.force_strength = bounded(self.force_strength, 0.0, 0.1, defaults.force_strength);
        self.pointer_link_radius =
            bounded(self.pointer_link_radius, 10.0, 500.0, defaults.pointer_link_radius);
        self.pointer_link_opacity =
            bounded(self.pointer_link_opacity, 0.0, 1.0, defaults.pointer_link_opacity);

        self.glow_radius = bounded(self.glow_radius, 0.0, 20.0, defaults.glow_radius);
    }

    /// Particle count for a viewport of the given width
    pub fn count_for_width(&self, width: f32) -> usize {
        match self.particle_count {
            Some(count) => count,
            None if width < self.compact_width => self.compact_count,
            None => self.desktop_count,
        }
    }

    /// Adjust the explicit particle count (clamped to 0-500)
    pub fn adjust_particle_count(&mut self, delta: i32, current: usize) {
        let base = self.particle_count.unwrap_or(current) as i32;
        self.particle_count = Some((base + delta).clamp(0, 500) as usize);
    }

    /// Adjust connection distance within bounds
    pub fn adjust_connection_distance(&mut self, delta: f32) {
        self.connection_distance = (self.connection_distance + delta).clamp(10.0, 400.0);
    }

    /// Adjust pointer force radius within bounds
    pub fn adjust_force_radius(&mut self, delta: f32) {
        self.force_radius = (self.force_radius + delta).clamp(10.0, 400.0);
    }

    /// Adjust pointer link radius within bounds
    pub fn adjust_pointer_link_radius(&mut self, delta: f32) {
        self.pointer_link_radius = (self.pointer_link_radius + delta).clamp(10.0, 500.0);
    }

    /// Adjust link opacity within bounds
    pub fn adjust_link_opacity(&mut self, delta: f32) {
        self.link_opacity = (self.link_opacity + delta).clamp(0.0, 1.0);
    }

    /// Glyph for the particle at `index`, cycling through the label
    pub fn glyph_for(&self, index: usize) -> Option<char> {
        let len = self.label.chars().count();
        if len == 0 {
            return None;
        }
        self.label.chars().nth(index % len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_follows_viewport_width() {
        let settings = FieldSettings::default();
        assert_eq!(settings.count_for_width(500.0), 60);
        assert_eq!(settings.count_for_width(767.9), 60);
        assert_eq!(settings.count_for_width(768.0), 100);
        assert_eq!(settings.count_for_width(1920.0), 100);
    }

    #[test]
    fn test_explicit_count_wins() {
        let settings = FieldSettings {
            particle_count: Some(7),
            ..FieldSettings::default()
        };
        assert_eq!(settings.count_for_width(200.0), 7);
        assert_eq!(settings.count_for_width(2000.0), 7);
    }

    #[test]
    fn test_adjusters_clamp() {
        let mut settings = FieldSettings::default();
        settings.adjust_connection_distance(1000.0);
        assert_eq!(settings.connection_distance, 400.0);
        settings.adjust_force_radius(-1000.0);
        assert_eq!(settings.force_radius, 10.0);
        settings.adjust_particle_count(-50, 30);
        assert_eq!(settings.particle_count, Some(0));
        settings.adjust_particle_count(10, 999);
        assert_eq!(settings.particle_count, Some(10));
    }

    #[test]
    fn test_glyphs_cycle_through_label() {
        let settings = FieldSettings {
            label: "ABC".to_string(),
            ..FieldSettings::default()
        };
        let glyphs: Vec<_> = (0..5).map(|i| settings.glyph_for(i)).collect();
        assert_eq!(glyphs, vec![Some('A'), Some('B'), Some('C'), Some('A'), Some('B')]);

        let empty = FieldSettings {
            label: String::new(),
            ..FieldSettings::default()
        };
        assert_eq!(empty.glyph_for(3), None);
    }

    #[test]
    fn test_boundary_apply() {
        assert_eq!(BoundaryBehavior::Clamp.apply(-2.0, 100.0), 0.0);
        assert_eq!(BoundaryBehavior::Clamp.apply(103.0, 100.0), 100.0);
        assert_eq!(BoundaryBehavior::Bounce.apply(-2.0, 100.0), 2.0);
        assert_eq!(BoundaryBehavior::Bounce.apply(103.0, 100.0), 97.0);
        // Overshoot wider than the viewport still ends up inside
        assert_eq!(BoundaryBehavior::Bounce.apply(-50.0, 10.0), 10.0);
        assert_eq!(BoundaryBehavior::Bounce.apply(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_sanitize_pulls_values_into_range() {
        let mut settings = FieldSettings {
            particle_count: Some(10_000),
            desktop_count: 100_000,
            compact_width: f32::INFINITY,
            max_speed: -3.0,
            connection_distance: 1e12,
            link_opacity: f32::NAN,
            force_radius: 0.0,
            force_strength: 5.0,
            pointer_link_radius: 1e9,
            pointer_link_opacity: 2.0,
            glow_radius: 1e30,
            ..FieldSettings::default()
        };
        settings.sanitize();

        assert_eq!(settings.particle_count, Some(500));
        assert_eq!(settings.desktop_count, 500);
        assert_eq!(settings.compact_count, 60);
        assert_eq!(settings.compact_width, 768.0);
        assert_eq!(settings.max_speed, 0.0);
        assert_eq!(settings.connection_distance, 400.0);
        assert_eq!(settings.link_opacity, 0.4);
        assert_eq!(settings.force_radius, 10.0);
        assert_eq!(settings.force_strength, 0.1);
        assert_eq!(settings.pointer_link_radius, 500.0);
        assert_eq!(settings.pointer_link_opacity, 1.0);
        assert_eq!(settings.glow_radius, 20.0);
    }
}
