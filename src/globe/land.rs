/// Wrap longitude into [-180, 180)
#[inline(always)]
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360
    if wrapped >= 360.0 {
        -180.0
    } else {
        wrapped - 180.0
    }
}

/// Closed ring of (lon, lat) vertices; the last vertex connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<(f64, f64)>,
    /// (min_lon, min_lat, max_lon, max_lat)
    bounds: Option<(f64, f64, f64, f64)>,
}

impl Polygon {
    pub fn new(vertices: Vec<(f64, f64)>) -> Self {
        let bounds = if vertices.len() < 3 {
            None
        } else {
            let mut min_lon = f64::MAX;
            let mut min_lat = f64::MAX;
            let mut max_lon = f64::MIN;
            let mut max_lat = f64::MIN;
            for &(lon, lat) in &vertices {
                min_lon = min_lon.min(lon);
                min_lat = min_lat.min(lat);
                max_lon = max_lon.max(lon);
                max_lat = max_lat.max(lat);
            }
            Some((min_lon, min_lat, max_lon, max_lat))
        };
        Self { vertices, bounds }
    }

    /// Bounding box, `None` for rings too short to enclose anything
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.bounds
    }

    /// Ray casting: count edge crossings of a horizontal ray from the point.
    /// Rings with fewer than 3 vertices never match.
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        let Some((min_lon, min_lat, max_lon, max_lat)) = self.bounds else {
            return false;
        };
        if lon < min_lon || lon > max_lon || lat < min_lat || lat > max_lat {
            return false;
        }

        let (x, y) = (lon, lat);
        let n = self.vertices.len();
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.vertices[i];
            let (xj, yj) = self.vertices[j];
            if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// Lat/lon box. When `lon_min >= lon_max` the box wraps across the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl Region {
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self { lat_min, lat_max, lon_min, lon_max }
    }

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        if lat < self.lat_min || lat > self.lat_max {
            return false;
        }
        if self.lon_min < self.lon_max {
            lon >= self.lon_min && lon <= self.lon_max
        } else {
            lon >= self.lon_min || lon <= self.lon_max
        }
    }
}

/// Anything that can claim a point as land
#[derive(Debug, Clone, PartialEq)]
pub enum LandShape {
    Polygon(Polygon),
    Region(Region),
}

impl LandShape {
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        match self {
            LandShape::Polygon(p) => p.contains(lat, lon),
            LandShape::Region(r) => r.contains(lat, lon),
        }
    }
}

impl From<Polygon> for LandShape {
    fn from(p: Polygon) -> Self {
        LandShape::Polygon(p)
    }
}

impl From<Region> for LandShape {
    fn from(r: Region) -> Self {
        LandShape::Region(r)
    }
}

/// Index of the first shape containing the point, after longitude normalization
pub fn find_land(lat: f64, lon: f64, shapes: &[LandShape]) -> Option<usize> {
    let lon = normalize_lon(lon);
    shapes.iter().position(|s| s.contains(lat, lon))
}

/// True when any shape contains the point. First match wins.
#[inline]
pub fn is_land(lat: f64, lon: f64, shapes: &[LandShape]) -> bool {
    find_land(lat, lon, shapes).is_some()
}
