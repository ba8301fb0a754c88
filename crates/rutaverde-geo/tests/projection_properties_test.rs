//! Property tests for the projection round trips and CRS detection

use proj::Proj;
use proptest::prelude::*;
use rutaverde_core::models::{Crs, Feature, Geometry, RawCollection, RawProperties};
use rutaverde_geo::projection::{classify_position, transform_geometry, Reprojector};
use rutaverde_geo::detect_crs;

fn round_trip(crs: Crs, position: [f64; 2]) -> ([f64; 2], [f64; 2]) {
    let forward = Reprojector::new(Crs::Wgs84, crs).unwrap();
    let inverse = Reprojector::new(crs, Crs::Wgs84).unwrap();
    let projected = forward.convert(position).unwrap();
    (projected, inverse.convert(projected).unwrap())
}

proptest! {
    #[test]
    fn web_mercator_round_trip(lng in -179.0f64..179.0, lat in -80.0f64..80.0) {
        let (_, [lng2, lat2]) = round_trip(Crs::WebMercator, [lng, lat]);
        prop_assert!((lng - lng2).abs() <= 1e-6);
        prop_assert!((lat - lat2).abs() <= 1e-6);
    }

    #[test]
    fn origen_nacional_round_trip_over_bogota(lng in -74.3f64..-73.8, lat in 4.4f64..4.9) {
        let ([x, y], [lng2, lat2]) = round_trip(Crs::LocalTransverseMercator, [lng, lat]);
        // metres from the false origin stay within the district
        prop_assert!((x - 1_000_000.0).abs() < 40_000.0);
        prop_assert!((y - 1_000_000.0).abs() < 40_000.0);
        prop_assert!((lng - lng2).abs() <= 1e-7);
        prop_assert!((lat - lat2).abs() <= 1e-7);
    }

    #[test]
    fn wgs84_positions_detect_as_wgs84(lng in -180.0f64..=180.0, lat in -90.0f64..=90.0) {
        prop_assert_eq!(classify_position([lng, lat]), Some(Crs::Wgs84));
    }

    #[test]
    fn transform_keeps_vertex_count(
        ring in prop::collection::vec((-8.3e6f64..-8.2e6, 4.9e5f64..5.5e5), 4..20)
    ) {
        let ring: Vec<[f64; 2]> = ring.into_iter().map(|(x, y)| [x, y]).collect();
        let geometry = Geometry::polygon(vec![ring]);
        let out = transform_geometry(&geometry, Crs::WebMercator, Crs::Wgs84).unwrap();
        prop_assert_eq!(out.skipped, 0);
        prop_assert_eq!(out.geometry.positions().count(), geometry.positions().count());
        for [lng, lat] in out.geometry.positions() {
            prop_assert!(*lng > -75.0 && *lng < -73.0);
            prop_assert!(*lat > 4.0 && *lat < 5.0);
        }
    }
}

#[test]
fn detects_projected_bogota_polygons() {
    let ring = vec![
        [-8_247_000.0, 513_000.0],
        [-8_245_000.0, 513_000.0],
        [-8_245_000.0, 515_000.0],
        [-8_247_000.0, 513_000.0],
    ];
    let collection = RawCollection::new(vec![Feature::new(
        Some(Geometry::multi_polygon(vec![vec![ring]])),
        RawProperties::new(),
    )]);
    assert_eq!(detect_crs(&collection, "macrobarr.geojson"), Crs::WebMercator);
}

#[test]
fn origen_nacional_agrees_with_published_bogota_zone() {
    // EPSG:3116 is MAGNA-SIRGAS / Colombia Bogota zone with the same origin
    let reference = Proj::new_known_crs("EPSG:3116", "EPSG:4326", None).unwrap();
    let ours = Reprojector::new(Crs::LocalTransverseMercator, Crs::Wgs84).unwrap();

    for (x, y) in [(1_000_000.0, 1_000_000.0), (997_500.0, 1_002_600.0), (985_000.0, 1_020_000.0)] {
        let (lng, lat) = reference.convert((x, y)).unwrap();
        let [lng2, lat2] = ours.convert([x, y]).unwrap();
        assert!((lng - lng2).abs() < 1e-6, "lng {} vs {}", lng, lng2);
        assert!((lat - lat2).abs() < 1e-6, "lat {} vs {}", lat, lat2);
    }
}
