use glam::DVec3;
use rayon::prelude::*;
use serde::Deserialize;

use crate::globe::geometry::{rotate, to_cartesian};
use crate::globe::land::{is_land, LandShape};
use crate::hash::cell_coin;

/// Land glyphs from far to near
pub const LAND_RAMP: [char; 4] = ['#', '%', '+', '@'];
/// Ocean glyphs from near to far
pub const OCEAN_RAMP: [char; 2] = ['~', '≈'];
/// Ice glyphs, picked per frame
pub const ICE_GLYPHS: [char; 2] = ['*', '◦'];

/// Finest step accepted in either direction (degrees)
pub const MIN_STEP_DEG: f64 = 0.5;

/// Sampling resolution and the fixed constants of the globe
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Latitude step in degrees
    pub lat_step_deg: f64,
    /// Longitude step in degrees
    pub lon_step_deg: f64,
    /// Rotated z must exceed this to be sampled (back-face cut)
    pub visibility_threshold: f64,
    /// |lat| above this is ice regardless of land data
    pub polar_lat_deg: f64,
    /// Axial tilt toward the viewer in degrees
    pub tilt_deg: f64,
    /// Auto-rotation speed in radians per second
    pub auto_rotation_speed: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            lat_step_deg: 4.0,
            lon_step_deg: 6.0,
            visibility_threshold: -0.3,
            polar_lat_deg: 75.0,
            tilt_deg: 27.0,
            // one turn every 90 seconds
            auto_rotation_speed: std::f64::consts::TAU / 90.0,
        }
    }
}

impl GridSpec {
    pub fn tilt(&self) -> f64 {
        self.tilt_deg.to_radians()
    }

    /// Number of latitude rows, both poles included
    pub fn lat_samples(&self) -> usize {
        (180.0 / self.lat_step_deg.max(MIN_STEP_DEG)).floor() as usize + 1
    }

    /// Number of longitude columns, both -180 and 180 included
    pub fn lon_samples(&self) -> usize {
        (360.0 / self.lon_step_deg.max(MIN_STEP_DEG)).floor() as usize + 1
    }

    /// Copy with both steps scaled, clamped to sane bounds
    pub fn rescaled(&self, factor: f64) -> Self {
        Self {
            lat_step_deg: (self.lat_step_deg * factor).clamp(MIN_STEP_DEG, 30.0),
            lon_step_deg: (self.lon_step_deg * factor).clamp(MIN_STEP_DEG, 45.0),
            ..*self
        }
    }
}

/// Terrain class of a sample, also the colour class used when drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terrain {
    Ocean,
    Land,
    Ice,
}

impl Terrain {
    pub fn label(&self) -> &'static str {
        match self {
            Terrain::Ocean => "ocean",
            Terrain::Land => "land",
            Terrain::Ice => "ice",
        }
    }
}

/// One visible sample of the sphere surface for a single frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    pub lat: f64,
    pub lon: f64,
    /// Unit-sphere position before rotation
    pub cartesian: DVec3,
    /// Position after the frame rotation; z is depth toward the viewer
    pub rotated: DVec3,
    pub glyph: char,
    pub terrain: Terrain,
}

impl SamplePoint {
    #[inline]
    pub fn depth(&self) -> f64 {
        self.rotated.z
    }

    #[inline]
    pub fn is_visible(&self, threshold: f64) -> bool {
        self.rotated.z > threshold
    }
}

/// Map z in [-1, 1] onto [0, 1]
#[inline(always)]
pub fn normalized_depth(z: f64) -> f64 {
    ((z + 1.0) * 0.5).clamp(0.0, 1.0)
}

/// Bucket a [0, 1] value into a ramp index, clamped at both ends
#[inline(always)]
pub fn ramp_index(t: f64, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let idx = (t * len as f64).floor();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(len - 1)
    }
}

/// Pick terrain and glyph for one sample
#[inline]
fn classify(
    lat: f64,
    lon: f64,
    z: f64,
    cell: (u64, u64),
    shapes: &[LandShape],
    grid: &GridSpec,
    seed: u64,
) -> (Terrain, char) {
    // Polar check runs first and skips the polygon scan entirely
    if lat.abs() > grid.polar_lat_deg {
        let glyph = if cell_coin(cell.0, cell.1, seed) { ICE_GLYPHS[0] } else { ICE_GLYPHS[1] };
        return (Terrain::Ice, glyph);
    }

    let depth = normalized_depth(z);
    if is_land(lat, lon, shapes) {
        (Terrain::Land, LAND_RAMP[ramp_index(depth, LAND_RAMP.len())])
    } else {
        (Terrain::Ocean, OCEAN_RAMP[ramp_index(1.0 - depth, OCEAN_RAMP.len())])
    }
}

/// Sample one latitude row; only camera-facing points are kept
fn sample_row(
    lat_idx: usize,
    rotation_x: f64,
    rotation_y: f64,
    shapes: &[LandShape],
    grid: &GridSpec,
    seed: u64,
) -> Vec<SamplePoint> {
    let lat_step = grid.lat_step_deg.max(MIN_STEP_DEG);
    let lon_step = grid.lon_step_deg.max(MIN_STEP_DEG);
    let lat = (-90.0 + lat_idx as f64 * lat_step).min(90.0);
    let cols = grid.lon_samples();

    let mut row = Vec::with_capacity(cols / 2 + 1);
    for lon_idx in 0..cols {
        let lon = (-180.0 + lon_idx as f64 * lon_step).min(180.0);
        let cartesian = to_cartesian(lat, lon, 1.0);
        let rotated = rotate(cartesian, rotation_x, rotation_y, 0.0);
        if rotated.z <= grid.visibility_threshold {
            continue;
        }

        let (terrain, glyph) = classify(
            lat,
            lon,
            rotated.z,
            (lat_idx as u64, lon_idx as u64),
            shapes,
            grid,
            seed,
        );
        row.push(SamplePoint { lat, lon, cartesian, rotated, glyph, terrain });
    }
    row
}

/// Sample the whole visible hemisphere for one frame.
///
/// `rotation_x` and `rotation_y` are the composed totals (tilt plus drag, and
/// spin plus drag). `seed` drives the ice flicker so a frame is reproducible.
/// Points come back in grid order, south to north then west to east.
pub fn generate_frame(
    rotation_x: f64,
    rotation_y: f64,
    shapes: &[LandShape],
    grid: &GridSpec,
    seed: u64,
) -> Vec<SamplePoint> {
    (0..grid.lat_samples())
        .into_par_iter()
        .flat_map_iter(|lat_idx| sample_row(lat_idx, rotation_x, rotation_y, shapes, grid, seed))
        .collect()
}
