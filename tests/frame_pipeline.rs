use std::sync::Arc;
use std::time::Duration;

use ascii_globe::config::DisplayConfig;
use ascii_globe::controller::Controller;
use ascii_globe::globe::grid::{ICE_GLYPHS, LAND_RAMP, OCEAN_RAMP};
use ascii_globe::globe::{GridSpec, LandShape, Polygon, Terrain};
use ascii_globe::render::presenter::terrain_color;
use ascii_globe::render::{Presenter, RenderWorker, TextSurface};

// lat 2 / lon 0 sample on an 80x40 surface
const FRONT: (u16, u16) = (40, 19);
// lat 2 / lon 60 sample
const EAST: (u16, u16) = (71, 19);
const NORTH: (u16, u16) = (40, 2);

fn square_world() -> Arc<[LandShape]> {
    vec![Polygon::new(vec![(-20.0, -20.0), (20.0, -20.0), (20.0, 20.0), (-20.0, 20.0)]).into()].into()
}

fn upright_grid() -> GridSpec {
    GridSpec {
        tilt_deg: 0.0,
        visibility_threshold: 0.0,
        ..GridSpec::default()
    }
}

fn draw(controller: &Controller, shapes: &Arc<[LandShape]>, grid: &GridSpec) -> TextSurface {
    let response = controller.frame_request(0, shapes, grid).compute();
    let mut presenter = Presenter::new(DisplayConfig::default());
    let mut surface = TextSurface::new(80, 40);
    presenter.present(&response.points, &mut surface);
    surface
}

#[test]
fn test_front_face_shows_land_and_ocean() {
    let grid = upright_grid();
    let controller = Controller::new(&grid, 0.01);
    let surface = draw(&controller, &square_world(), &grid);

    let (front, color) = surface.cell(FRONT.0, FRONT.1).expect("front cell drawn");
    assert!(LAND_RAMP.contains(&front), "got {front:?}");
    // Facing the viewer, so close to full land brightness
    let full = terrain_color(Terrain::Land, 1.0);
    assert!(color == full || color == terrain_color(Terrain::Land, 0.999), "got {color:?}");

    let (east, _) = surface.cell(EAST.0, EAST.1).expect("east cell drawn");
    assert!(OCEAN_RAMP.contains(&east), "got {east:?}");

    let (north, _) = surface.cell(NORTH.0, NORTH.1).expect("polar cell drawn");
    assert!(ICE_GLYPHS.contains(&north), "got {north:?}");

    // Corners lie outside the disc
    assert!(surface.cell(0, 0).is_none());
    assert!(surface.cell(79, 39).is_none());
}

#[test]
fn test_half_turn_brings_far_side_forward() {
    let grid = upright_grid();
    let mut controller = Controller::new(&grid, 0.01);
    controller.pointer_down(0.0, 0.0);
    controller.pointer_move(std::f64::consts::PI / 0.01, 0.0);
    controller.pointer_up();

    let surface = draw(&controller, &square_world(), &grid);
    let (front, _) = surface.cell(FRONT.0, FRONT.1).expect("front cell drawn");
    assert!(OCEAN_RAMP.contains(&front), "got {front:?}");
}

#[test]
fn test_auto_rotation_moves_the_picture() {
    let grid = upright_grid();
    let shapes = square_world();
    let mut controller = Controller::new(&grid, 0.01);
    let before = draw(&controller, &shapes, &grid).lines();
    controller.advance(Duration::from_secs(20));
    let after = draw(&controller, &shapes, &grid).lines();
    assert_ne!(before, after);
}

#[test]
fn test_worker_frame_draws_like_inline() {
    let grid = upright_grid();
    let shapes = square_world();
    let controller = Controller::new(&grid, 0.01);
    let request = controller.frame_request(3, &shapes, &grid);

    let mut worker = RenderWorker::spawn().unwrap();
    assert!(worker.post(request.clone()).unwrap());
    let threaded = worker.recv_timeout(Duration::from_secs(10)).unwrap().unwrap();
    let inline = request.compute();

    let mut presenter = Presenter::new(DisplayConfig::default());
    let mut a = TextSurface::new(80, 40);
    let mut b = TextSurface::new(80, 40);
    presenter.present(&threaded.points, &mut a);
    presenter.present(&inline.points, &mut b);
    assert_eq!(a.lines(), b.lines());
}
