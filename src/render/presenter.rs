use glam::DVec3;
use ratatui::style::Color;
use tracing::debug;

use crate::config::DisplayConfig;
use crate::globe::geometry::project;
use crate::globe::{SamplePoint, Terrain};

/// A character grid the globe can be drawn onto
pub trait Surface {
    /// (columns, rows)
    fn size(&self) -> (u16, u16);
    fn clear(&mut self, background: Color);
    fn draw_glyph(&mut self, col: u16, row: u16, glyph: char, fg: Color);
}

/// Maps unit-sphere points onto surface cells.
///
/// The surface is treated as a virtual pixel canvas of
/// `cols * cell_width_px` by `rows * cell_height_px`, which keeps the globe
/// round even though terminal cells are taller than they are wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceTransform {
    pub cols: u16,
    pub rows: u16,
    pub width_px: f64,
    pub height_px: f64,
    pub center: (f64, f64),
    /// Sphere radius in virtual pixels
    pub sphere_radius: f64,
    cell_width_px: f64,
    cell_height_px: f64,
}

impl SurfaceTransform {
    pub fn new(cols: u16, rows: u16, display: &DisplayConfig) -> Self {
        let width_px = cols as f64 * display.cell_width_px;
        let height_px = rows as f64 * display.cell_height_px;
        Self {
            cols,
            rows,
            width_px,
            height_px,
            center: (width_px / 2.0, height_px / 2.0),
            sphere_radius: width_px.min(height_px) / 2.0 * display.fill,
            cell_width_px: display.cell_width_px,
            cell_height_px: display.cell_height_px,
        }
    }

    /// Cell for a rotated point, `None` when it falls off the surface
    pub fn to_cell(&self, rotated: DVec3) -> Option<(u16, u16)> {
        let (px, py) = project(rotated, self.sphere_radius, self.center);
        if !(px >= 0.0 && px < self.width_px && py >= 0.0 && py < self.height_px) {
            return None;
        }
        let col = (px / self.cell_width_px) as u16;
        let row = (py / self.cell_height_px) as u16;
        (col < self.cols && row < self.rows).then_some((col, row))
    }
}

/// Depth-modulated colour for a terrain class. `z` is the rotated depth.
pub fn terrain_color(terrain: Terrain, z: f64) -> Color {
    let d = z.clamp(0.0, 1.0);
    let (base, intensity) = match terrain {
        Terrain::Ocean => ((20.0, 80.0, 220.0), 0.4 + 0.6 * d),
        Terrain::Land => ((80.0, 180.0, 70.0), 0.5 + 0.5 * d),
        Terrain::Ice => ((225.0, 235.0, 245.0), 0.7 + 0.3 * d),
    };
    Color::Rgb(
        (base.0 * intensity) as u8,
        (base.1 * intensity) as u8,
        (base.2 * intensity) as u8,
    )
}

/// Points ordered far to near (ascending z) for painter's drawing
pub fn depth_sorted(points: &[SamplePoint]) -> Vec<&SamplePoint> {
    let mut sorted: Vec<&SamplePoint> = points.iter().collect();
    sorted.sort_by(|a, b| a.rotated.z.total_cmp(&b.rotated.z));
    sorted
}

/// Draws frames onto a [`Surface`], rebuilding its transform whenever the
/// surface size changes. Scale is derived at draw time, so a frame computed
/// before a resize still lands correctly.
pub struct Presenter {
    display: DisplayConfig,
    transform: SurfaceTransform,
}

impl Presenter {
    pub fn new(display: DisplayConfig) -> Self {
        Self {
            transform: SurfaceTransform::new(0, 0, &display),
            display,
        }
    }

    pub fn transform(&self) -> &SurfaceTransform {
        &self.transform
    }

    pub fn background(&self) -> Color {
        let [r, g, b] = self.display.background;
        Color::Rgb(r, g, b)
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        if self.transform.cols == cols && self.transform.rows == rows {
            return;
        }
        self.transform = SurfaceTransform::new(cols, rows, &self.display);
        debug!(cols, rows, radius = self.transform.sphere_radius, "surface resized");
    }

    /// Clear, depth sort and draw. Returns how many glyphs were drawn.
    pub fn present<S: Surface>(&mut self, points: &[SamplePoint], surface: &mut S) -> usize {
        let (cols, rows) = surface.size();
        self.resize(cols, rows);
        surface.clear(self.background());

        let mut drawn = 0;
        for point in depth_sorted(points) {
            if let Some((col, row)) = self.transform.to_cell(point.rotated) {
                surface.draw_glyph(col, row, point.glyph, terrain_color(point.terrain, point.depth()));
                drawn += 1;
            }
        }
        drawn
    }
}

/// In-memory surface; keeps the final grid and the order of draw calls
#[derive(Debug, Clone)]
pub struct TextSurface {
    cols: u16,
    rows: u16,
    cells: Vec<Option<(char, Color)>>,
    pub background: Option<Color>,
    pub draw_log: Vec<(u16, u16, char)>,
}

impl TextSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![None; cols as usize * rows as usize],
            background: None,
            draw_log: Vec::new(),
        }
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<(char, Color)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells[row as usize * self.cols as usize + col as usize]
    }

    /// Rows as plain text, blanks for empty cells
    pub fn lines(&self) -> Vec<String> {
        (0..self.rows)
            .map(|row| {
                (0..self.cols)
                    .map(|col| self.cell(col, row).map_or(' ', |(ch, _)| ch))
                    .collect()
            })
            .collect()
    }
}

impl Surface for TextSurface {
    fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    fn clear(&mut self, background: Color) {
        self.cells.fill(None);
        self.draw_log.clear();
        self.background = Some(background);
    }

    fn draw_glyph(&mut self, col: u16, row: u16, glyph: char, fg: Color) {
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row as usize * self.cols as usize + col as usize] = Some((glyph, fg));
        self.draw_log.push((col, row, glyph));
    }
}
