//! Geometry input adapter: parses Natural Earth GeoJSON into immutable
//! layer snapshots for the compositor. Parsing is an external concern to the
//! projection core; this module is the one concrete collaborator the shell
//! uses, plus a built-in coarse world for when no data files are present.

use crate::geo::GeoCoordinate;
use crate::map::{GeoChain, LayerKind, VectorLayer};
use anyhow::Result;
use geojson::{GeoJson, Geometry, Value};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Natural Earth source file per layer kind; `true` marks fill geometry
/// whose chains are closed rings.
const LAYER_FILES: &[(&str, LayerKind, bool)] = &[
    ("ne_110m_land.json", LayerKind::Land, true),
    ("ne_110m_lakes.json", LayerKind::Lake, true),
    ("ne_110m_glaciated_areas.json", LayerKind::Glacier, true),
    (
        "ne_110m_antarctic_ice_shelves_polys.json",
        LayerKind::Ice,
        true,
    ),
    (
        "ne_110m_rivers_lake_centerlines.json",
        LayerKind::River,
        false,
    ),
    (
        "ne_110m_admin_0_boundary_lines_land.json",
        LayerKind::CountryBorder,
        false,
    ),
    (
        "ne_110m_admin_1_states_provinces_lines.json",
        LayerKind::StateBorder,
        false,
    ),
];

/// Load every available layer file under `data_dir` in parallel.
/// Missing or malformed files are skipped with a warning; the globe renders
/// with whatever loaded.
pub fn load_layers(data_dir: &Path) -> Vec<VectorLayer> {
    LAYER_FILES
        .par_iter()
        .filter_map(|&(file, kind, closed)| {
            let path = data_dir.join(file);
            if !path.exists() {
                return None;
            }
            match load_layer(&path, kind, closed) {
                Ok(layer) => Some(layer),
                Err(e) => {
                    warn!(file, error = %e, "failed to load layer");
                    None
                }
            }
        })
        .collect()
}

fn load_layer(path: &Path, kind: LayerKind, closed: bool) -> Result<VectorLayer> {
    let content = fs::read_to_string(path)?;
    let geojson: GeoJson = content.parse()?;
    let mut chains = Vec::new();
    collect_chains(&geojson, closed, &mut chains);
    Ok(VectorLayer::new(kind, chains))
}

fn collect_chains(geojson: &GeoJson, closed: bool, chains: &mut Vec<GeoChain>) {
    match geojson {
        GeoJson::FeatureCollection(fc) => {
            for feature in &fc.features {
                if let Some(ref geometry) = feature.geometry {
                    collect_geometry(geometry, closed, chains);
                }
            }
        }
        GeoJson::Feature(f) => {
            if let Some(ref geometry) = f.geometry {
                collect_geometry(geometry, closed, chains);
            }
        }
        GeoJson::Geometry(geometry) => collect_geometry(geometry, closed, chains),
    }
}

fn collect_geometry(geometry: &Geometry, closed: bool, chains: &mut Vec<GeoChain>) {
    match &geometry.value {
        Value::LineString(coords) => chains.push(to_chain(coords, closed)),
        Value::MultiLineString(lines) => {
            for coords in lines {
                chains.push(to_chain(coords, closed));
            }
        }
        Value::Polygon(rings) => {
            // Exterior ring only; hole rings are rare at this resolution.
            if let Some(exterior) = rings.first() {
                chains.push(to_chain(exterior, true));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    chains.push(to_chain(exterior, true));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry(g, closed, chains);
            }
        }
        _ => {}
    }
}

fn to_chain(coords: &[Vec<f64>], closed: bool) -> GeoChain {
    let points: Vec<GeoCoordinate> = coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| GeoCoordinate::from_degrees(c[0], c[1]))
        .collect();
    if closed {
        GeoChain::ring(points)
    } else {
        GeoChain::line(points)
    }
}

fn ring(points: &[(f64, f64)]) -> GeoChain {
    GeoChain::ring(
        points
            .iter()
            .map(|&(lon, lat)| GeoCoordinate::from_degrees(lon, lat))
            .collect(),
    )
}

fn line(points: &[(f64, f64)]) -> GeoChain {
    GeoChain::line(
        points
            .iter()
            .map(|&(lon, lat)| GeoCoordinate::from_degrees(lon, lat))
            .collect(),
    )
}

/// Coarse built-in world used when no data files are available: simplified
/// continent rings plus one exemplar of each stroked layer.
pub fn builtin_world() -> Vec<VectorLayer> {
    let land = VectorLayer::new(
        LayerKind::Land,
        vec![
            // North America
            ring(&[
                (-168.0, 65.0), (-166.0, 60.0), (-141.0, 60.0), (-130.0, 55.0),
                (-125.0, 48.0), (-124.0, 40.0), (-117.0, 32.0), (-110.0, 25.0),
                (-97.0, 25.0), (-82.0, 24.0), (-80.0, 25.0), (-81.0, 31.0),
                (-75.0, 35.0), (-70.0, 41.0), (-65.0, 47.0), (-55.0, 47.0),
                (-52.0, 47.0), (-55.0, 52.0), (-58.0, 55.0), (-64.0, 60.0),
                (-73.0, 62.0), (-80.0, 63.0), (-95.0, 62.0), (-110.0, 68.0),
                (-130.0, 70.0), (-145.0, 70.0),
            ]),
            // South America
            ring(&[
                (-80.0, 10.0), (-75.0, 5.0), (-60.0, 5.0), (-50.0, 0.0),
                (-35.0, -5.0), (-35.0, -10.0), (-38.0, -15.0), (-40.0, -22.0),
                (-48.0, -25.0), (-55.0, -34.0), (-58.0, -38.0), (-65.0, -42.0),
                (-68.0, -50.0), (-75.0, -52.0), (-75.0, -45.0), (-72.0, -40.0),
                (-72.0, -30.0), (-70.0, -20.0), (-80.0, -5.0), (-80.0, 0.0),
            ]),
            // Africa
            ring(&[
                (-17.0, 15.0), (-17.0, 20.0), (-15.0, 28.0), (-5.0, 35.0),
                (10.0, 37.0), (20.0, 33.0), (35.0, 30.0), (35.0, 20.0),
                (42.0, 12.0), (50.0, 12.0), (45.0, 5.0), (40.0, -5.0),
                (35.0, -20.0), (35.0, -25.0), (30.0, -30.0), (20.0, -35.0),
                (18.0, -35.0), (15.0, -30.0), (10.0, -15.0), (10.0, 0.0),
                (5.0, 5.0), (-5.0, 5.0), (-10.0, 5.0), (-15.0, 10.0),
            ]),
            // Eurasia
            ring(&[
                (-10.0, 36.0), (-5.0, 43.0), (-5.0, 48.0), (-10.0, 52.0),
                (-5.0, 58.0), (5.0, 58.0), (5.0, 62.0), (10.0, 71.0),
                (25.0, 71.0), (40.0, 68.0), (60.0, 69.0), (90.0, 75.0),
                (110.0, 73.0), (140.0, 72.0), (160.0, 70.0), (170.0, 66.0),
                (160.0, 60.0), (155.0, 55.0), (145.0, 50.0), (135.0, 43.0),
                (128.0, 38.0), (122.0, 30.0), (110.0, 20.0), (105.0, 10.0),
                (100.0, 14.0), (95.0, 16.0), (92.0, 22.0), (88.0, 22.0),
                (80.0, 15.0), (80.0, 8.0), (75.0, 15.0), (70.0, 20.0),
                (65.0, 25.0), (60.0, 25.0), (55.0, 27.0), (50.0, 30.0),
                (42.0, 36.0), (35.0, 36.0), (27.0, 36.0), (22.0, 37.0),
                (15.0, 40.0), (10.0, 44.0), (5.0, 43.0), (0.0, 38.0),
            ]),
            // Australia
            ring(&[
                (115.0, -20.0), (120.0, -18.0), (130.0, -12.0), (140.0, -12.0),
                (145.0, -15.0), (150.0, -25.0), (153.0, -30.0), (150.0, -35.0),
                (145.0, -38.0), (140.0, -38.0), (135.0, -35.0), (130.0, -32.0),
                (125.0, -32.0), (115.0, -35.0), (115.0, -25.0),
            ]),
            // Greenland
            ring(&[
                (-45.0, 60.0), (-42.0, 62.0), (-22.0, 70.0), (-18.0, 76.0),
                (-30.0, 83.0), (-55.0, 82.0), (-68.0, 78.0), (-58.0, 75.0),
                (-55.0, 70.0), (-53.0, 65.0),
            ]),
        ],
    );

    let lakes = VectorLayer::new(
        LayerKind::Lake,
        vec![
            // Caspian Sea
            ring(&[
                (47.0, 46.0), (51.0, 47.0), (54.0, 45.0), (53.0, 41.0),
                (54.0, 38.0), (51.0, 37.0), (49.0, 38.0), (50.0, 42.0),
                (47.0, 44.0),
            ]),
            // Great Lakes blob
            ring(&[
                (-92.0, 47.0), (-84.0, 47.0), (-81.0, 45.0), (-76.0, 44.0),
                (-79.0, 43.0), (-83.0, 42.0), (-87.0, 42.0), (-88.0, 44.0),
            ]),
        ],
    );

    let glaciers = VectorLayer::new(
        LayerKind::Glacier,
        vec![ring(&[
            (-44.0, 62.0), (-40.0, 64.0), (-25.0, 71.0), (-22.0, 76.0),
            (-32.0, 81.0), (-52.0, 80.0), (-62.0, 77.0), (-54.0, 73.0),
            (-51.0, 67.0),
        ])],
    );

    // Antarctic ice shelf band.
    let ice = VectorLayer::new(
        LayerKind::Ice,
        vec![ring(
            &(0..24)
                .map(|i| (i as f64 * 15.0 - 180.0, -72.0))
                .collect::<Vec<_>>(),
        )],
    );

    let rivers = VectorLayer::new(
        LayerKind::River,
        vec![
            // Amazon
            line(&[
                (-73.0, -4.5), (-67.0, -3.5), (-61.0, -3.0), (-55.0, -2.5),
                (-52.0, -1.5), (-50.0, 0.0),
            ]),
            // Nile
            line(&[
                (32.9, 0.4), (31.5, 6.0), (32.5, 15.0), (33.0, 22.0),
                (31.0, 27.0), (31.5, 30.5),
            ]),
            // Yangtze
            line(&[
                (91.0, 33.0), (97.0, 30.0), (104.0, 29.0), (110.0, 30.0),
                (117.0, 31.0), (121.5, 31.5),
            ]),
        ],
    );

    let country_borders = VectorLayer::new(
        LayerKind::CountryBorder,
        vec![
            // US-Canada
            line(&[
                (-123.0, 49.0), (-110.0, 49.0), (-95.0, 49.0), (-88.0, 48.0),
                (-83.0, 45.5), (-79.0, 43.5), (-75.0, 45.0), (-71.0, 45.0),
                (-67.5, 47.0),
            ]),
            // US-Mexico
            line(&[
                (-117.1, 32.5), (-111.0, 31.3), (-106.5, 31.8), (-103.0, 29.0),
                (-99.5, 27.5), (-97.1, 25.9),
            ]),
        ],
    );

    let state_borders = VectorLayer::new(
        LayerKind::StateBorder,
        vec![
            line(&[(-102.0, 37.0), (-102.0, 40.0), (-95.3, 40.0)]),
            line(&[(-114.0, 42.0), (-111.0, 42.0), (-111.0, 45.0)]),
        ],
    );

    vec![
        land,
        lakes,
        glaciers,
        ice,
        rivers,
        country_borders,
        state_borders,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_world_covers_layer_kinds() {
        let layers = builtin_world();
        for kind in [
            LayerKind::Land,
            LayerKind::Lake,
            LayerKind::Glacier,
            LayerKind::Ice,
            LayerKind::River,
            LayerKind::CountryBorder,
            LayerKind::StateBorder,
        ] {
            let layer = layers.iter().find(|l| l.kind() == kind);
            assert!(layer.is_some(), "missing builtin layer {:?}", kind);
            assert!(!layer.unwrap().chains().is_empty());
        }
    }

    #[test]
    fn test_builtin_fill_layers_are_rings() {
        for layer in builtin_world() {
            for chain in layer.chains() {
                assert_eq!(chain.closed(), layer.kind().is_fill());
                assert!(chain.points().len() >= 2);
            }
        }
    }

    #[test]
    fn test_missing_data_dir_loads_nothing() {
        let layers = load_layers(Path::new("/nonexistent/data/dir"));
        assert!(layers.is_empty());
    }
}
