use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{GlobeError, Result};
use crate::globe::GridSpec;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "globe.json";

/// Pointer and clock tuning
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Radians of rotation per pixel of drag
    pub drag_sensitivity: f64,
    /// Animation tick interval in milliseconds
    pub tick_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            tick_ms: 33,
        }
    }
}

/// Terminal surface metrics
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Width of one terminal cell in virtual pixels
    pub cell_width_px: f64,
    /// Height of one terminal cell in virtual pixels
    pub cell_height_px: f64,
    /// Fraction of the shorter surface side covered by the globe diameter
    pub fill: f64,
    /// Background colour as RGB
    pub background: [u8; 3],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            fill: 0.9,
            background: [0x40, 0x11, 0x3f],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridSpec,
    pub motion: MotionConfig,
    pub display: DisplayConfig,
    /// Compute frames on a dedicated thread; inline otherwise
    pub use_worker_thread: bool,
    /// Optional GeoJSON file replacing the embedded coastlines
    pub coastlines: Option<PathBuf>,
    /// Log destination; defaults to a file in the temp dir
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid: GridSpec::default(),
            motion: MotionConfig::default(),
            display: DisplayConfig::default(),
            use_worker_thread: true,
            coastlines: None,
            log_file: None,
        }
    }
}

impl Config {
    /// Load `path` if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut bytes = fs::read(path).map_err(|source| GlobeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&mut bytes).map_err(|e| match e {
            ParseFailure::Json(source) => GlobeError::ConfigParse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::Invalid(err) => err,
        })
    }

    /// Parse and validate a JSON document. simd-json parses in place, hence `&mut`.
    pub fn from_json(bytes: &mut [u8]) -> std::result::Result<Self, ParseFailure> {
        let config: Config = simd_json::serde::from_slice(bytes).map_err(ParseFailure::Json)?;
        config.validate().map_err(ParseFailure::Invalid)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let g = &self.grid;
        if !(g.lat_step_deg > 0.0 && g.lon_step_deg > 0.0) {
            return Err(GlobeError::InvalidConfig(format!(
                "grid steps must be positive (lat {}, lon {})",
                g.lat_step_deg, g.lon_step_deg
            )));
        }
        if g.lat_step_deg > 90.0 || g.lon_step_deg > 180.0 {
            return Err(GlobeError::InvalidConfig("grid steps too coarse".into()));
        }
        if !(0.0..=90.0).contains(&g.polar_lat_deg) {
            return Err(GlobeError::InvalidConfig(format!(
                "polar_lat_deg must be within 0..=90, got {}",
                g.polar_lat_deg
            )));
        }
        let d = &self.display;
        if !(d.cell_width_px > 0.0 && d.cell_height_px > 0.0) {
            return Err(GlobeError::InvalidConfig("cell metrics must be positive".into()));
        }
        if !(d.fill > 0.0 && d.fill <= 1.0) {
            return Err(GlobeError::InvalidConfig(format!("fill must be in (0, 1], got {}", d.fill)));
        }
        if self.motion.tick_ms == 0 {
            return Err(GlobeError::InvalidConfig("tick_ms must be at least 1".into()));
        }
        Ok(())
    }
}

/// Why an in-memory config document was rejected
#[derive(Debug)]
pub enum ParseFailure {
    Json(simd_json::Error),
    Invalid(GlobeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> std::result::Result<Config, ParseFailure> {
        let mut bytes = json.as_bytes().to_vec();
        Config::from_json(&mut bytes)
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_empty_object_gives_defaults() {
        let config = parse("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = parse(r#"{"grid": {"lat_step_deg": 2.0}, "use_worker_thread": false}"#).unwrap();
        assert_eq!(config.grid.lat_step_deg, 2.0);
        assert_eq!(config.grid.lon_step_deg, GridSpec::default().lon_step_deg);
        assert!(!config.use_worker_thread);
        assert_eq!(config.motion, MotionConfig::default());
    }

    #[test]
    fn test_paths() {
        let config = parse(r#"{"coastlines": "data/land.geojson"}"#).unwrap();
        assert_eq!(config.coastlines, Some(PathBuf::from("data/land.geojson")));
    }

    #[test]
    fn test_rejects_zero_step() {
        let err = parse(r#"{"grid": {"lon_step_deg": 0.0}}"#).unwrap_err();
        assert!(matches!(err, ParseFailure::Invalid(GlobeError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_bad_fill() {
        let err = parse(r#"{"display": {"fill": 1.5}}"#).unwrap_err();
        assert!(matches!(err, ParseFailure::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(parse("{ grid: "), Err(ParseFailure::Json(_))));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load_or_default(Path::new("/nonexistent/globe.json")).unwrap();
        assert_eq!(config, Config::default());
    }
}
