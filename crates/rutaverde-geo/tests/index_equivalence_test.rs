//! The indexed lookup must agree with a plain scan in collection order

use proptest::prelude::*;
use rutaverde_core::models::{Feature, Geometry, RawProperties};
use rutaverde_geo::spatial::contains_point;
use rutaverde_geo::SpatialIndex;

/// Ten by ten grid of non-overlapping cells over Bogotá, some of them
/// triangles so bounding boxes over-approximate the area.
fn zone_grid() -> Vec<Feature<RawProperties>> {
    let (west, south, step) = (-74.25, 4.45, 0.04);
    let mut features = Vec::new();
    for row in 0..10 {
        for col in 0..10 {
            let x0 = west + col as f64 * step;
            let y0 = south + row as f64 * step;
            let geometry = if (row + col) % 3 == 0 {
                Geometry::polygon(vec![vec![
                    [x0, y0],
                    [x0 + step, y0],
                    [x0, y0 + step],
                    [x0, y0],
                ]])
            } else {
                Geometry::rectangle(x0, y0, x0 + step, y0 + step)
            };
            features.push(Feature::new(Some(geometry), RawProperties::new()));
        }
    }
    features
}

fn linear_scan(features: &[Feature<RawProperties>], lng: f64, lat: f64) -> Option<usize> {
    features.iter().position(|f| {
        f.geometry.as_ref().map(|g| contains_point(g, lng, lat)).unwrap_or(false)
    })
}

proptest! {
    #[test]
    fn indexed_lookup_matches_linear_scan(lng in -74.3f64..-73.8, lat in 4.4f64..4.9) {
        let features = zone_grid();
        let index = SpatialIndex::build(&features);

        let indexed = index.find_containing_feature(&features, lng, lat).map(|(i, _)| i);
        prop_assert_eq!(indexed, linear_scan(&features, lng, lat));
    }

    #[test]
    fn candidates_cover_every_match(lng in -74.3f64..-73.8, lat in 4.4f64..4.9) {
        let features = zone_grid();
        let index = SpatialIndex::build(&features);

        if let Some(found) = linear_scan(&features, lng, lat) {
            prop_assert!(index.find_candidates(lng, lat).contains(&found));
        }
    }
}

#[test]
fn empty_candidates_never_run_exact_test() {
    let features = zone_grid();
    let index = SpatialIndex::build(&features);

    let mut exact_tests = 0;
    let found = index.find_containing_with(&features, -75.5, 6.2, |g, lng, lat| {
        exact_tests += 1;
        contains_point(g, lng, lat)
    });

    assert!(index.find_candidates(-75.5, 6.2).is_empty());
    assert!(found.is_none());
    assert_eq!(exact_tests, 0);
}
