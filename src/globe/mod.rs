//! Pure globe math: projection, land classification and frame sampling.

pub mod geometry;
pub mod grid;
pub mod land;

pub use grid::{generate_frame, GridSpec, SamplePoint, Terrain};
pub use land::{find_land, is_land, LandShape, Polygon, Region};
