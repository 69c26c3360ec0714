use std::fs;
use std::path::Path;
use std::sync::Arc;

use geojson::{GeoJson, Geometry, Value};
use tracing::{info, warn};

use crate::error::{GlobeError, Result};
use crate::globe::{LandShape, Polygon};

/// Simplified continental outlines as (lon, lat) rings
const CONTINENTS: &[&[(f64, f64)]] = &[
    // North America
    &[
        (-168.0, 66.0), (-162.0, 70.0), (-156.0, 71.5), (-140.0, 69.5), (-128.0, 70.0),
        (-115.0, 68.5), (-95.0, 72.0), (-82.0, 69.0), (-80.0, 63.0), (-93.0, 59.0),
        (-82.0, 52.0), (-79.0, 55.0), (-76.0, 62.0), (-68.0, 58.5), (-61.0, 56.0),
        (-56.0, 52.0), (-66.0, 45.0), (-70.0, 42.0), (-74.0, 40.5), (-76.0, 35.0),
        (-81.0, 31.0), (-80.0, 25.5), (-83.0, 29.0), (-89.0, 30.0), (-97.0, 27.5),
        (-97.0, 22.0), (-91.0, 19.0), (-87.0, 21.5), (-88.0, 16.0), (-84.0, 15.0),
        (-83.0, 10.0), (-79.0, 9.0), (-77.5, 7.5), (-80.0, 7.5), (-85.0, 10.0),
        (-92.0, 14.5), (-105.0, 19.5), (-112.0, 29.0), (-109.0, 23.0), (-115.0, 30.0),
        (-117.0, 32.5), (-121.0, 35.0), (-124.0, 40.0), (-124.0, 47.0), (-127.0, 50.5),
        (-133.0, 56.0), (-139.0, 59.5), (-148.0, 60.5), (-154.0, 58.0), (-162.0, 55.0),
        (-157.0, 58.5), (-162.0, 60.0), (-166.0, 62.0), (-165.0, 64.5),
    ],
    // South America
    &[
        (-77.0, 8.0), (-72.0, 12.0), (-64.0, 10.5), (-60.0, 8.5), (-52.0, 5.0),
        (-50.0, 0.0), (-44.0, -2.5), (-35.0, -5.5), (-35.0, -9.0), (-39.0, -13.0),
        (-40.0, -20.0), (-44.0, -23.0), (-48.0, -26.0), (-53.0, -33.5), (-57.5, -35.0),
        (-57.0, -38.0), (-62.0, -39.0), (-65.0, -42.0), (-66.0, -47.0), (-69.0, -51.0),
        (-68.5, -54.5), (-72.0, -54.0), (-75.0, -50.0), (-74.0, -44.0), (-73.5, -37.0),
        (-71.5, -30.0), (-70.2, -18.0), (-76.0, -14.0), (-81.0, -6.0), (-80.0, -1.0),
        (-78.0, 2.0), (-78.0, 7.0),
    ],
    // Africa
    &[
        (-17.0, 21.0), (-16.0, 28.0), (-9.5, 32.0), (-6.0, 35.8), (0.0, 35.8),
        (10.0, 37.2), (11.0, 33.5), (20.0, 31.0), (25.0, 31.8), (32.0, 31.3),
        (34.5, 28.0), (37.0, 21.0), (43.0, 12.5), (51.0, 11.8), (49.0, 6.0),
        (40.0, -2.5), (39.0, -8.0), (40.5, -15.0), (35.0, -21.0), (35.5, -24.0),
        (32.5, -29.0), (27.0, -33.8), (20.0, -34.8), (18.0, -31.0), (15.0, -27.0),
        (11.8, -17.0), (13.5, -11.0), (12.0, -5.0), (9.0, -1.0), (9.5, 4.0),
        (6.0, 4.3), (1.0, 6.0), (-4.0, 5.0), (-8.0, 4.5), (-13.0, 7.5),
        (-16.5, 12.5), (-17.5, 14.7),
    ],
    // Eurasia
    &[
        (-9.5, 43.0), (-9.0, 38.7), (-6.0, 36.2), (-2.0, 36.8), (3.0, 43.0),
        (9.0, 44.2), (12.3, 41.7), (16.0, 38.0), (18.5, 40.2), (13.0, 45.6),
        (19.5, 42.0), (21.0, 38.0), (23.5, 38.0), (26.0, 40.8), (29.0, 41.0),
        (36.0, 41.5), (41.5, 41.5), (36.0, 36.7), (35.0, 33.0), (34.5, 29.5),
        (39.0, 22.0), (43.0, 13.0), (52.0, 16.0), (57.0, 18.5), (59.8, 22.5),
        (56.0, 26.3), (51.0, 24.5), (48.0, 29.8), (50.5, 30.0), (57.0, 25.5),
        (62.0, 25.2), (67.0, 24.8), (72.8, 21.0), (73.0, 16.0), (77.0, 8.2),
        (80.3, 13.5), (80.2, 16.0), (86.7, 20.2), (91.7, 22.5), (94.0, 18.0),
        (97.7, 16.5), (98.5, 8.5), (100.5, 3.5), (103.5, 1.4), (103.0, 5.5),
        (100.3, 13.5), (105.0, 8.8), (109.0, 11.5), (108.0, 16.5), (106.5, 20.5),
        (110.5, 21.2), (114.0, 22.3), (119.5, 25.5), (122.0, 30.5), (120.8, 36.7),
        (118.0, 38.5), (121.5, 40.9), (125.3, 39.5), (126.6, 34.5), (129.4, 35.5),
        (129.5, 42.4), (135.5, 43.8), (141.0, 52.0), (135.0, 54.5), (143.0, 59.3),
        (151.0, 59.2), (156.5, 61.5), (163.0, 62.0), (156.5, 57.5), (156.0, 51.0),
        (162.2, 56.2), (163.3, 59.0), (170.5, 60.0), (179.9, 65.0), (179.9, 69.0),
        (170.0, 70.0), (160.0, 69.5), (150.0, 71.5), (140.0, 72.5), (130.0, 71.0),
        (113.0, 73.7), (104.0, 77.7), (98.0, 76.0), (87.0, 75.0), (80.5, 73.5),
        (72.5, 72.8), (68.5, 68.0), (60.0, 69.8), (53.0, 68.0), (44.0, 68.5),
        (40.5, 64.5), (37.0, 66.5), (41.0, 67.5), (33.0, 69.5), (25.0, 71.0),
        (16.0, 69.0), (12.0, 66.0), (5.0, 62.0), (5.5, 58.5), (8.0, 58.0),
        (11.0, 59.0), (12.3, 56.0), (10.5, 54.0), (8.6, 55.5), (8.0, 53.5),
        (4.5, 52.5), (1.5, 51.0), (-1.5, 49.5), (-4.6, 48.6), (-1.2, 46.0),
        (-1.8, 43.4),
    ],
    // Australia
    &[
        (113.5, -22.0), (114.0, -26.5), (115.0, -34.0), (118.0, -35.0), (123.5, -33.9),
        (131.0, -31.5), (135.5, -34.8), (138.0, -35.5), (140.0, -38.0), (146.0, -39.0),
        (150.0, -37.5), (153.5, -28.0), (153.0, -25.0), (149.0, -20.5), (145.5, -15.0),
        (143.5, -10.7), (142.0, -15.0), (141.5, -12.5), (136.8, -12.2), (135.5, -15.0),
        (130.0, -11.3), (126.0, -14.0), (122.0, -17.5), (119.0, -20.0),
    ],
    // Greenland
    &[
        (-73.0, 78.0), (-60.0, 82.0), (-30.0, 83.5), (-20.0, 81.5), (-18.0, 76.0),
        (-22.0, 70.0), (-32.0, 68.0), (-40.0, 65.0), (-43.0, 60.0), (-49.0, 61.5),
        (-53.0, 66.5), (-54.0, 70.5), (-60.0, 76.0), (-68.0, 77.0),
    ],
    // Antarctica, a cap spanning every longitude
    &[(-180.0, -64.0), (180.0, -64.0), (180.0, -90.0), (-180.0, -90.0)],
];

/// Larger islands
const ISLANDS: &[&[(f64, f64)]] = &[
    // Great Britain
    &[
        (-5.7, 50.0), (1.5, 51.2), (1.7, 52.7), (-0.3, 54.0), (-2.0, 55.8),
        (-3.0, 58.6), (-5.0, 58.6), (-6.2, 56.5), (-4.8, 54.8), (-3.0, 53.4),
        (-4.7, 52.8), (-5.2, 51.7),
    ],
    // Iceland
    &[(-24.0, 65.5), (-22.0, 66.4), (-15.0, 66.3), (-13.6, 65.0), (-18.5, 63.4), (-22.7, 63.8)],
    // Japan
    &[
        (130.0, 31.5), (132.0, 33.8), (135.0, 33.5), (140.0, 35.0), (141.0, 38.0),
        (142.0, 40.5), (141.5, 45.5), (145.0, 43.3), (141.0, 41.5), (140.0, 40.0),
        (139.5, 38.0), (136.5, 37.0), (135.5, 35.7), (133.0, 35.5), (130.8, 34.0),
    ],
    // Madagascar
    &[(44.0, -25.0), (47.0, -25.0), (50.5, -15.5), (49.3, -12.0), (44.0, -16.5)],
    // Borneo
    &[(109.0, 1.5), (111.0, -3.0), (116.0, -4.0), (119.0, 1.0), (117.5, 7.0), (113.0, 3.3)],
    // Sumatra
    &[(95.3, 5.6), (98.0, 4.0), (104.0, -1.0), (106.0, -5.8), (101.0, -3.0), (98.5, 1.0)],
    // New Guinea
    &[
        (131.0, -1.4), (138.0, -1.6), (147.0, -6.0), (150.0, -10.5), (143.0, -9.0),
        (141.0, -9.0), (137.5, -5.0), (132.5, -4.0),
    ],
    // New Zealand
    &[
        (172.7, -34.4), (178.5, -37.7), (176.8, -39.5), (174.8, -41.3), (174.0, -39.0),
        (172.0, -40.5), (168.3, -44.0), (166.5, -46.0), (169.0, -46.6), (172.8, -43.8),
        (174.3, -41.5),
    ],
];

/// The built-in coastline set, continents first
pub fn embedded_coastlines() -> Vec<LandShape> {
    CONTINENTS
        .iter()
        .chain(ISLANDS.iter())
        .map(|ring| Polygon::new(ring.to_vec()).into())
        .collect()
}

/// Coastlines from the configured GeoJSON file, or the embedded set when no
/// file is configured or it cannot be used
pub fn load_coastlines(path: Option<&Path>) -> Arc<[LandShape]> {
    let Some(path) = path else {
        return embedded_coastlines().into();
    };
    match load_geojson_polygons(path) {
        Ok(shapes) => {
            info!(path = %path.display(), polygons = shapes.len(), "loaded coastlines");
            shapes.into()
        }
        Err(e) => {
            warn!(error = %e, "falling back to embedded coastlines");
            embedded_coastlines().into()
        }
    }
}

/// Read the exterior rings of every Polygon/MultiPolygon in a GeoJSON file
pub fn load_geojson_polygons(path: &Path) -> Result<Vec<LandShape>> {
    let mut bytes = fs::read(path).map_err(|source| GlobeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson: GeoJson = simd_json::serde::from_slice(&mut bytes).map_err(|source| {
        GlobeError::Coastlines {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let mut shapes = Vec::new();
    collect_polygons(&geojson, &mut |ring| shapes.push(Polygon::new(ring).into()));
    if shapes.is_empty() {
        return Err(GlobeError::NoPolygons(path.to_path_buf()));
    }
    Ok(shapes)
}

/// Walk a GeoJSON document and hand every exterior ring to `add_ring`
pub fn collect_polygons<F>(geojson: &GeoJson, add_ring: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_geometry(geometry, add_ring);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry(geometry, add_ring);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry(geometry, add_ring),
    }
}

fn collect_geometry<F>(geometry: &Geometry, add_ring: &mut F)
where
    F: FnMut(Vec<(f64, f64)>),
{
    match &geometry.value {
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                add_ring(exterior.iter().map(|c| (c[0], c[1])).collect());
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    add_ring(exterior.iter().map(|c| (c[0], c[1])).collect());
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry(g, add_ring);
            }
        }
        // Lines and points enclose nothing
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::globe::is_land;

    #[test]
    fn test_embedded_rings_are_closed_polygons() {
        let shapes = embedded_coastlines();
        assert_eq!(shapes.len(), CONTINENTS.len() + ISLANDS.len());
        for shape in &shapes {
            match shape {
                LandShape::Polygon(p) => assert!(p.bounds().is_some()),
                LandShape::Region(_) => panic!("embedded data is polygons only"),
            }
        }
    }

    #[test]
    fn test_known_places() {
        let shapes = embedded_coastlines();
        // (lat, lon, land?)
        let cases = [
            (40.0, -100.0, true),   // Kansas
            (-10.0, -55.0, true),   // Brazil
            (5.0, 20.0, true),      // Central Africa
            (50.0, 90.0, true),     // Siberia
            (-25.0, 135.0, true),   // Outback
            (-80.0, 100.0, true),   // Antarctica
            (-80.0, -179.9, true),  // Antarctica at the antimeridian
            (0.0, -150.0, false),   // Pacific
            (-30.0, -20.0, false),  // South Atlantic
            (-20.0, 80.0, false),   // Indian Ocean
            (36.0, -40.0, false),   // North Atlantic
        ];
        for (lat, lon, expected) in cases {
            assert_eq!(is_land(lat, lon, &shapes), expected, "({lat}, {lon})");
        }
    }

    #[test]
    fn test_collect_polygons_from_geojson() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-10, -10], [10, -10], [10, 10], [-10, 10], [-10, -10]],
                                    [[-1, -1], [1, -1], [1, 1], [-1, 1], [-1, -1]]]
                }},
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "LineString", "coordinates": [[0, 0], [5, 5]]
                }},
                {"type": "Feature", "properties": {}, "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [[[[100, 0], [101, 0], [101, 1], [100, 0]]],
                                    [[[50, 50], [51, 50], [51, 51], [50, 50]]]]
                }}
            ]
        }"#;
        let geojson: GeoJson = doc.parse().unwrap();
        let mut rings = Vec::new();
        collect_polygons(&geojson, &mut |r| rings.push(r));
        assert_eq!(rings.len(), 3);
        assert_eq!(rings[0][1], (10.0, -10.0));
        assert_eq!(rings[2][0], (50.0, 50.0));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let shapes = load_coastlines(Some(Path::new("/nonexistent/land.geojson")));
        assert_eq!(shapes.len(), embedded_coastlines().len());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_geojson_polygons(Path::new("/nonexistent/land.geojson")).unwrap_err();
        assert!(matches!(err, GlobeError::Io { .. }));
    }
}
