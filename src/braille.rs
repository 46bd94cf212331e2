use crate::color::{map_from_lut, ColorLut};
use crate::surface::DrawSurface;
use ratatui::style::Color;

/// Braille character rendering for high-resolution terminal graphics.
/// Each Braille character represents a 2x4 grid of dots (8 dots total).
///
/// Dot positions and their bit values:
/// ```text
/// (0,0)=0x01  (1,0)=0x08
/// (0,1)=0x02  (1,1)=0x10
/// (0,2)=0x04  (1,2)=0x20
/// (0,3)=0x40  (1,3)=0x80
/// ```
///
/// Unicode Braille patterns: U+2800 to U+28FF (256 patterns)
const BRAILLE_BASE: u32 = 0x2800;

/// Dot position to bit mapping for Braille characters
const BRAILLE_DOTS: [[u8; 4]; 2] = [
    [0x01, 0x02, 0x04, 0x40], // Left column (x=0): rows 0,1,2,3
    [0x08, 0x10, 0x20, 0x80], // Right column (x=1): rows 0,1,2,3
];

/// Dots dimmer than this are left unlit
pub const MIN_VISIBLE: f32 = 0.05;

/// Peak intensity of a glow halo relative to its particle
const GLOW_ALPHA: f32 = 0.5;

/// A single rendered Braille cell with position and color
#[derive(Clone, Copy)]
pub struct BrailleCell {
    pub x: u16,
    pub y: u16,
    pub char: char,
    pub color: Color,
}

/// Raw content of one terminal cell before coloring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellContent {
    pub x: u16,
    pub y: u16,
    pub char: char,
    /// Brightest dot (or glyph) in the cell
    pub intensity: f32,
}

/// Drawing surface that rasterizes into a grid of Braille dots.
///
/// Logical coordinates are multiplied by `pixel_ratio` to get dot coordinates.
pub struct BrailleCanvas {
    /// Size in terminal cells
    pub cols: u16,
    pub rows: u16,
    pub pixel_ratio: f32,
    dots: Vec<f32>,
    glyphs: Vec<Option<(char, f32)>>,
}

impl BrailleCanvas {
    pub fn new() -> Self {
        Self {
            cols: 0,
            rows: 0,
            pixel_ratio: 1.0,
            dots: Vec::new(),
            glyphs: Vec::new(),
        }
    }

    /// Dot grid width
    pub fn dot_width(&self) -> usize {
        self.cols as usize * 2
    }

    /// Dot grid height
    pub fn dot_height(&self) -> usize {
        self.rows as usize * 4
    }

    /// Intensity of the dot at (x, y), 0 outside the grid
    pub fn dot(&self, x: usize, y: usize) -> f32 {
        if x < self.dot_width() && y < self.dot_height() {
            self.dots[y * self.dot_width() + x]
        } else {
            0.0
        }
    }

    /// Max-blend a dot; out-of-grid coordinates are ignored
    fn plot(&mut self, x: i64, y: i64, intensity: f32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let (w, h) = (self.dot_width(), self.dot_height());
        if x < w && y < h {
            let dot = &mut self.dots[y * w + x];
            *dot = dot.max(intensity.clamp(0.0, 1.0));
        }
    }

    /// Logical coordinate to dot coordinate
    fn to_dots(&self, v: f32) -> f32 {
        v * self.pixel_ratio
    }

    /// Collect every non-empty cell (glyphs win over dot patterns)
    pub fn cells(&self) -> Vec<CellContent> {
        let mut cells = Vec::new();

        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let cell_idx = cy as usize * self.cols as usize + cx as usize;
                if let Some((glyph, intensity)) = self.glyphs[cell_idx] {
                    cells.push(CellContent {
                        x: cx,
                        y: cy,
                        char: glyph,
                        intensity,
                    });
                    continue;
                }

                let mut pattern: u8 = 0;
                let mut peak: f32 = 0.0;
                let base_bx = cx as usize * 2;
                let base_by = cy as usize * 4;

                for dx in 0..2 {
                    for dy in 0..4 {
                        let value = self.dot(base_bx + dx, base_by + dy);
                        if value >= MIN_VISIBLE {
                            pattern |= BRAILLE_DOTS[dx][dy];
                            peak = peak.max(value);
                        }
                    }
                }

                if pattern != 0 {
                    cells.push(CellContent {
                        x: cx,
                        y: cy,
                        char: char::from_u32(BRAILLE_BASE + pattern as u32).unwrap_or(' '),
                        intensity: peak,
                    });
                }
            }
        }

        cells
    }
}

impl Default for BrailleCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl DrawSurface for BrailleCanvas {
    fn set_size(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        self.pixel_ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        // Round up to whole cells so the last partial cell is still drawn
        self.cols = (snap_to_whole(width * self.pixel_ratio) / 2.0).ceil() as u16;
        self.rows = (snap_to_whole(height * self.pixel_ratio) / 4.0).ceil() as u16;
        self.dots = vec![0.0; self.dot_width() * self.dot_height()];
        self.glyphs = vec![None; self.cols as usize * self.rows as usize];
    }

    fn clear(&mut self) {
        self.dots.fill(0.0);
        self.glyphs.fill(None);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, opacity: f32, glow: f32) {
        let cx = self.to_dots(x);
        let cy = self.to_dots(y);
        let r = self.to_dots(radius);
        let g = self.to_dots(glow.max(0.0));
        let reach = (r + g).ceil() as i64;

        // Only visit dots that exist on the grid
        let (ix, iy) = (cx.floor() as i64, cy.floor() as i64);
        let x_range = ix.saturating_sub(reach).max(0)
            ..=ix.saturating_add(reach).min(self.dot_width() as i64 - 1);
        let y_range = iy.saturating_sub(reach).max(0)
            ..=iy.saturating_add(reach).min(self.dot_height() as i64 - 1);
        for py in y_range {
            for px in x_range.clone() {
                // Distance from the dot centre
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d <= r {
                    self.plot(px, py, opacity);
                } else if g > 0.0 && d <= r + g {
                    let falloff = 1.0 - (d - r) / g;
                    self.plot(px, py, opacity * GLOW_ALPHA * falloff);
                }
            }
        }

        // Sub-dot circles still light their own dot
        self.plot(ix, iy, opacity);
    }

    fn draw_glyph(&mut self, x: f32, y: f32, glyph: char, opacity: f32) {
        let col = (self.to_dots(x) / 2.0).floor();
        let row = (self.to_dots(y) / 4.0).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            return;
        }
        let idx = row as usize * self.cols as usize + col as usize;
        let opacity = opacity.clamp(0.0, 1.0);
        match self.glyphs[idx] {
            Some((_, existing)) if existing >= opacity => {}
            _ => self.glyphs[idx] = Some((glyph, opacity)),
        }
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, opacity: f32) {
        let (ax, ay) = (self.to_dots(x0), self.to_dots(y0));
        let (bx, by) = (self.to_dots(x1), self.to_dots(y1));
        let (dx, dy) = (bx - ax, by - ay);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;
        let thick = width > 1.0;
        // Widen across the minor axis
        let (ox, oy) = if dx.abs() >= dy.abs() { (0, 1) } else { (1, 0) };

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let px = (ax + dx * t).floor() as i64;
            let py = (ay + dy * t).floor() as i64;
            self.plot(px, py, opacity);
            if thick {
                self.plot(px + ox, py + oy, opacity);
            }
        }
    }
}

/// Dot counts that are whole up to float error (e.g. 53.999996) count as whole
fn snap_to_whole(dots: f32) -> f32 {
    let dots = dots.max(0.0);
    let nearest = dots.round();
    if (dots - nearest).abs() < 1e-3 {
        nearest
    } else {
        dots
    }
}

/// Color the canvas cells through the LUT
pub fn render_to_braille(canvas: &BrailleCanvas, color_lut: &ColorLut) -> Vec<BrailleCell> {
    canvas
        .cells()
        .into_iter()
        .map(|cell| BrailleCell {
            x: cell.x,
            y: cell.y,
            char: cell.char,
            color: map_from_lut(color_lut, cell.intensity),
        })
        .collect()
}

/// Logical viewport size for a canvas of the given terminal size
pub fn calculate_viewport_size(canvas_width: u16, canvas_height: u16, pixel_ratio: f32) -> (f32, f32) {
    // Braille gives 2x4 resolution per character
    let ratio = if pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
    (
        canvas_width as f32 * 2.0 / ratio,
        canvas_height as f32 * 4.0 / ratio,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorScheme;

    fn canvas(cols: u16, rows: u16) -> BrailleCanvas {
        let mut canvas = BrailleCanvas::new();
        canvas.set_size(cols as f32 * 2.0, rows as f32 * 4.0, 1.0);
        canvas
    }

    #[test]
    fn test_braille_pattern() {
        // Test that single dot patterns work correctly
        assert_eq!(BRAILLE_DOTS[0][0], 0x01); // Top-left
        assert_eq!(BRAILLE_DOTS[1][0], 0x08); // Top-right
        assert_eq!(BRAILLE_DOTS[0][3], 0x40); // Bottom-left
        assert_eq!(BRAILLE_DOTS[1][3], 0x80); // Bottom-right

        // All dots should give 0xFF
        let all_dots: u8 = BRAILLE_DOTS[0].iter().sum::<u8>() + BRAILLE_DOTS[1].iter().sum::<u8>();
        assert_eq!(all_dots, 0xFF);
    }

    #[test]
    fn test_set_size_applies_pixel_ratio() {
        let mut canvas = BrailleCanvas::new();
        canvas.set_size(160.0, 96.0, 0.25);
        assert_eq!((canvas.cols, canvas.rows), (20, 6));
        assert_eq!((canvas.dot_width(), canvas.dot_height()), (40, 24));

        canvas.set_size(0.0, 0.0, 0.25);
        assert!(canvas.cells().is_empty());
    }

    #[test]
    fn test_single_dot_circle() {
        let mut canvas = canvas(4, 2);
        canvas.fill_circle(0.2, 0.2, 0.1, 0.8, 0.0);
        let cells = canvas.cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, '\u{2801}');
        assert!((cells[0].intensity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_glow_is_dimmer_than_core() {
        let mut canvas = canvas(10, 5);
        canvas.fill_circle(10.0, 10.0, 1.0, 1.0, 4.0);
        assert_eq!(canvas.dot(10, 10), 1.0);
        let halo = canvas.dot(13, 10);
        assert!(halo > 0.0 && halo < GLOW_ALPHA + 1e-6);
        assert_eq!(canvas.dot(19, 10), 0.0);
    }

    #[test]
    fn test_line_lights_every_step() {
        let mut canvas = canvas(5, 1);
        canvas.draw_line(0.0, 0.0, 9.0, 0.0, 1.0, 0.5);
        for x in 0..10 {
            assert_eq!(canvas.dot(x, 0), 0.5);
            assert_eq!(canvas.dot(x, 1), 0.0);
        }

        canvas.clear();
        canvas.draw_line(0.0, 0.0, 9.0, 0.0, 2.0, 0.5);
        for x in 0..10 {
            assert_eq!(canvas.dot(x, 1), 0.5);
        }
    }

    #[test]
    fn test_dim_dots_not_shown() {
        let mut canvas = canvas(2, 1);
        canvas.draw_line(0.0, 0.0, 3.0, 0.0, 1.0, MIN_VISIBLE / 2.0);
        assert!(canvas.cells().is_empty());
    }

    #[test]
    fn test_glyph_overrides_dots() {
        let mut canvas = canvas(4, 2);
        canvas.fill_circle(1.0, 1.0, 1.0, 1.0, 0.0);
        canvas.draw_glyph(1.0, 1.0, 'P', 0.7);
        let cells = canvas.cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].char, 'P');

        // Off-canvas glyphs are dropped
        canvas.draw_glyph(-5.0, 1.0, 'Q', 1.0);
        canvas.draw_glyph(100.0, 1.0, 'Q', 1.0);
        assert_eq!(canvas.cells().len(), 1);
    }

    #[test]
    fn test_render_colors_by_intensity() {
        let lut = ColorScheme::Aqua.build_lut();
        let mut canvas = canvas(2, 1);
        canvas.fill_circle(0.5, 0.5, 0.1, 1.0, 0.0);
        let cells = render_to_braille(&canvas, &lut);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].color, Color::Rgb(100, 255, 218));
    }

    #[test]
    fn test_viewport_size_inverts_ratio() {
        assert_eq!(calculate_viewport_size(100, 50, 0.25), (800.0, 800.0));
        assert_eq!(calculate_viewport_size(10, 10, 0.0), (20.0, 40.0));
    }

    #[test]
    fn test_viewport_round_trip_keeps_cell_count() {
        // Ratios that are not exact in binary must not add a phantom column
        for &ratio in &[0.3_f32, 0.1, 0.7, 0.25, 1.0 / 3.0] {
            for &(cols, rows) in &[(27_u16, 10_u16), (96, 38), (1, 1), (203, 61)] {
                let (width, height) = calculate_viewport_size(cols, rows, ratio);
                let mut canvas = BrailleCanvas::new();
                canvas.set_size(width, height, ratio);
                assert_eq!((canvas.cols, canvas.rows), (cols, rows), "ratio {}", ratio);
            }
        }

        // A genuinely partial cell still rounds up
        let mut canvas = BrailleCanvas::new();
        canvas.set_size(5.0, 5.0, 1.0);
        assert_eq!((canvas.cols, canvas.rows), (3, 2));
    }

    #[test]
    fn test_oversized_circle_only_touches_grid() {
        let mut canvas = canvas(3, 2);
        canvas.fill_circle(2.0, 2.0, 1e12, 1.0, 1e12);
        for y in 0..canvas.dot_height() {
            for x in 0..canvas.dot_width() {
                assert_eq!(canvas.dot(x, y), 1.0);
            }
        }

        canvas.clear();
        canvas.fill_circle(-1e9, 1e9, 2.0, 1.0, 2.0);
        assert!(canvas.cells().is_empty());
    }
}
