use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Config;
use crate::controller::Controller;
use crate::globe::{find_land, GridSpec, LandShape, SamplePoint};
use crate::render::{FrameResponse, Presenter, RenderBackend};

/// Keyboard nudge in virtual pixels per key press
const NUDGE_PX: f64 = 12.0;

/// Rolling frame statistics for the status bar
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub frames: u64,
    pub skipped: u64,
    pub last_compute: Duration,
    pub last_points: usize,
}

/// Application state: one globe, its controller, the frame backend and the
/// latest frame waiting to be drawn
pub struct App {
    pub controller: Controller,
    pub presenter: Presenter,
    pub grid: GridSpec,
    pub should_quit: bool,
    pub stats: FrameStats,
    backend: RenderBackend,
    shapes: Arc<[LandShape]>,
    latest: Option<FrameResponse>,
    next_seq: u64,
    cell_size: (f64, f64),
}

impl App {
    pub fn new(config: &Config, shapes: Arc<[LandShape]>, width: usize, height: usize) -> Self {
        let backend = RenderBackend::new(config.use_worker_thread);
        info!(backend = backend.name(), shapes = shapes.len(), "globe ready");

        let mut app = Self {
            controller: Controller::new(&config.grid, config.motion.drag_sensitivity),
            presenter: Presenter::new(config.display),
            grid: config.grid,
            should_quit: false,
            stats: FrameStats::default(),
            backend,
            shapes,
            latest: None,
            next_seq: 0,
            cell_size: (config.display.cell_width_px, config.display.cell_height_px),
        };
        app.resize(width, height);
        app
    }

    /// Update the globe surface when the terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        // Account for border (2 chars horizontal, 2 vertical plus the status bar)
        let inner_width = width.saturating_sub(2);
        let inner_height = height.saturating_sub(3);
        self.presenter.resize(inner_width as u16, inner_height as u16);
    }

    /// Advance the clock by one tick and ask for a new frame
    pub fn on_tick(&mut self, dt: Duration) {
        self.controller.advance(dt);
        self.request_frame();
    }

    /// Post a frame for the current rotation. A finished frame is collected
    /// first, so a request is only skipped while the worker is still busy.
    pub fn request_frame(&mut self) {
        self.poll_frame();
        let request = self.controller.frame_request(self.next_seq, &self.shapes, &self.grid);
        if self.backend.submit(request) {
            self.next_seq = self.next_seq.wrapping_add(1);
        } else {
            self.stats.skipped += 1;
        }
    }

    /// Pick up a finished frame, if one arrived
    pub fn poll_frame(&mut self) -> bool {
        let Some(response) = self.backend.poll() else {
            return false;
        };
        self.stats.frames += 1;
        self.stats.last_compute = response.elapsed;
        self.stats.last_points = response.points.len();
        self.latest = Some(response);
        true
    }

    /// Points of the latest frame, empty before the first one arrives
    pub fn points(&self) -> &[SamplePoint] {
        self.latest.as_ref().map(|f| f.points.as_slice()).unwrap_or(&[])
    }

    /// Presenter and latest points, borrowed together for drawing
    pub fn frame_parts(&mut self) -> (&mut Presenter, &[SamplePoint]) {
        let points = self.latest.as_ref().map(|f| f.points.as_slice()).unwrap_or(&[]);
        (&mut self.presenter, points)
    }

    /// The sample nearest the viewer in the latest frame
    pub fn center_probe(&self) -> Option<&SamplePoint> {
        self.points().iter().max_by(|a, b| a.depth().total_cmp(&b.depth()))
    }

    /// Index of the coastline shape under a sample, `None` over water and ice
    pub fn shape_at(&self, point: &SamplePoint) -> Option<usize> {
        find_land(point.lat, point.lon, &self.shapes)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Convert a terminal cell to client-space pixels
    fn to_client(&self, col: u16, row: u16) -> (f64, f64) {
        (col as f64 * self.cell_size.0, row as f64 * self.cell_size.1)
    }

    pub fn pointer_down(&mut self, col: u16, row: u16) {
        let (x, y) = self.to_client(col, row);
        self.controller.pointer_down(x, y);
    }

    /// Drag samples apply immediately and trigger a frame
    pub fn pointer_move(&mut self, col: u16, row: u16) {
        if !self.controller.is_dragging() {
            return;
        }
        let (x, y) = self.to_client(col, row);
        self.controller.pointer_move(x, y);
        self.request_frame();
    }

    pub fn pointer_up(&mut self) {
        self.controller.pointer_up();
    }

    pub fn pointer_leave(&mut self) {
        self.controller.pointer_leave();
    }

    /// Keyboard rotation in steps of `NUDGE_PX`
    pub fn nudge(&mut self, dx: i32, dy: i32) {
        self.controller.nudge(dx as f64 * NUDGE_PX, dy as f64 * NUDGE_PX);
        self.request_frame();
    }

    pub fn reset_rotation(&mut self) {
        self.controller.reset_manual();
        self.request_frame();
    }

    /// Halve the grid steps
    pub fn finer(&mut self) {
        self.set_grid(self.grid.rescaled(0.5));
    }

    /// Double the grid steps
    pub fn coarser(&mut self) {
        self.set_grid(self.grid.rescaled(2.0));
    }

    fn set_grid(&mut self, grid: GridSpec) {
        debug!(lat_step = grid.lat_step_deg, lon_step = grid.lon_step_deg, "grid resolution changed");
        self.grid = grid;
        self.request_frame();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Composed pitch and yaw for the status bar
    pub fn rotation_summary(&self) -> String {
        let (pitch, yaw) = self.controller.frame_angles();
        format!("pitch {:+.0}° yaw {:+.0}°", pitch.to_degrees(), yaw.to_degrees().rem_euclid(360.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::embedded_coastlines;
    use crate::globe::Terrain;

    fn inline_app() -> App {
        let config = Config {
            use_worker_thread: false,
            ..Config::default()
        };
        App::new(&config, embedded_coastlines().into(), 82, 43)
    }

    #[test]
    fn test_resize_sets_inner_surface() {
        let mut app = inline_app();
        assert_eq!(app.presenter.transform().cols, 80);
        assert_eq!(app.presenter.transform().rows, 40);
        app.resize(1, 1);
        assert_eq!(app.presenter.transform().cols, 0);
    }

    #[test]
    fn test_tick_produces_frame() {
        let mut app = inline_app();
        assert!(app.points().is_empty());
        app.on_tick(Duration::from_millis(33));
        assert!(app.poll_frame());
        assert!(!app.points().is_empty());
        assert_eq!(app.stats.frames, 1);
        assert!(!app.poll_frame());
    }

    #[test]
    fn test_center_probe_faces_viewer() {
        let mut app = inline_app();
        assert!(app.center_probe().is_none());
        app.request_frame();
        app.poll_frame();
        let probe = app.center_probe().unwrap();
        // Default tilt brings the 27th parallel forward, spin starts at lon 0
        assert!((probe.lat - 27.0).abs() <= app.grid.lat_step_deg);
        assert!(probe.lon.abs() <= app.grid.lon_step_deg);
    }

    #[test]
    fn test_shape_at_matches_terrain() {
        let mut app = inline_app();
        app.request_frame();
        app.poll_frame();
        for point in app.points() {
            match point.terrain {
                Terrain::Land => assert!(app.shape_at(point).is_some()),
                Terrain::Ocean => assert!(app.shape_at(point).is_none()),
                Terrain::Ice => {}
            }
        }
    }

    #[test]
    fn test_worker_keeps_up_with_ticks() {
        let mut app = App::new(&Config::default(), embedded_coastlines().into(), 82, 43);
        assert_eq!(app.backend_name(), "worker");
        app.request_frame();
        // Same order as the main loop: poll, draw/wait, tick
        for _ in 0..20 {
            app.poll_frame();
            std::thread::sleep(Duration::from_millis(33));
            app.on_tick(Duration::from_millis(33));
        }
        assert_eq!(app.stats.skipped, 0);
        assert!(app.stats.frames >= 20);
    }

    #[test]
    fn test_pointer_drag_rotates_in_pixels() {
        let mut app = inline_app();
        app.pointer_down(10, 10);
        app.pointer_move(15, 10);
        // 5 cells * 8 px * 0.01 rad/px
        assert!((app.controller.rotation().manual_rotation_y - 0.4).abs() < 1e-12);
        app.pointer_up();
        app.pointer_move(30, 30);
        assert!((app.controller.rotation().manual_rotation_y - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_resolution_controls() {
        let mut app = inline_app();
        let base = app.grid;
        app.finer();
        assert_eq!(app.grid.lat_step_deg, base.lat_step_deg / 2.0);
        app.coarser();
        app.coarser();
        assert_eq!(app.grid.lon_step_deg, base.lon_step_deg * 2.0);
    }

    #[test]
    fn test_reset_keeps_clock() {
        let mut app = inline_app();
        app.nudge(3, -2);
        app.on_tick(Duration::from_secs(1));
        app.reset_rotation();
        let rotation = app.controller.rotation();
        assert_eq!(rotation.manual_rotation_x, 0.0);
        assert_eq!(rotation.manual_rotation_y, 0.0);
        assert!(rotation.auto_rotation > 0.0);
    }
}
