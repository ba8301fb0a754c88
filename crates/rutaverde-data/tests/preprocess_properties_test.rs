//! Property tests for zone and site preprocessing
//!
//! Preprocessed collections are written out as GeoJSON and read back through
//! the normalization pipeline; the result must be identical to the first pass.

use proptest::prelude::*;
use rutaverde_core::document::parse_document_value;
use rutaverde_data::{normalize_sites, normalize_zones, PreprocessContext};
use serde_json::{json, Value};

fn zone_feature(cell: (i32, i32), locality: u8, frequency: u8, start: u32, end: u32) -> Value {
    // ordinates are whole hundredths
    let (x0, x1) = ((cell.0 - 7420) as f64 / 100.0, (cell.0 - 7419) as f64 / 100.0);
    let (y0, y1) = ((cell.1 + 450) as f64 / 100.0, (cell.1 + 451) as f64 / 100.0);
    json!({
        "type": "Feature",
        "geometry": {"type": "Polygon", "coordinates": [[
            [x0, y0], [x1, y0], [x1, y1], [x0, y1], [x0, y0]
        ]]},
        "properties": {
            "IDLOCALID_": locality.to_string(),
            "IDFRECUE_": frequency.to_string(),
            "HORAINICIO": start,
            "HORAFIN": end,
            "CODIGO": format!("Z{}", locality)
        }
    })
}

fn site_feature(lng_cents: i32, lat_cents: i32, name: String, materials: Vec<&str>, upper: bool) -> Value {
    let properties = if upper {
        json!({"NOMBRE": name, "TIPO": "Punto Verde", "MATERIALES": materials.join(", ")})
    } else {
        json!({"nombre": name, "tipo": "ECA", "materiales": materials, "direccion": "Cra 7 # 40-62"})
    };
    json!({
        "type": "Feature",
        "geometry": {"type": "Point", "coordinates": [
            (lng_cents - 7430) as f64 / 100.0,
            (lat_cents + 440) as f64 / 100.0
        ]},
        "properties": properties
    })
}

fn collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

fn zone_strategy() -> impl Strategy<Value = Value> {
    ((0..30i32, 0..30i32), 1..=24u8, 0..=5u8, 0..2400u32, 0..2400u32)
        .prop_map(|(cell, locality, frequency, start, end)| zone_feature(cell, locality, frequency, start, end))
}

fn site_strategy() -> impl Strategy<Value = Value> {
    (
        0..50i32,
        0..50i32,
        "[A-Za-z ]{0,12}",
        prop::sample::subsequence(vec!["Papel", "Cartón", "PET", "Vidrio", "Metal"], 0..=5),
        any::<bool>(),
    )
        .prop_map(|(lng, lat, name, materials, upper)| site_feature(lng, lat, name, materials, upper))
}

proptest! {
    #[test]
    fn prop_zone_preprocessing_is_idempotent(features in prop::collection::vec(zone_strategy(), 1..20)) {
        let first = normalize_zones(
            parse_document_value("zones", collection(features)).unwrap(),
            "zones",
            &mut PreprocessContext::new(),
        ).unwrap();
        let written = serde_json::to_value(&first.collection).unwrap();

        let second = normalize_zones(
            parse_document_value("zones", written).unwrap(),
            "zones",
            &mut PreprocessContext::new(),
        ).unwrap();

        prop_assert!(second.was_processed);
        prop_assert_eq!(first.collection, second.collection);
    }

    #[test]
    fn prop_site_preprocessing_is_idempotent(features in prop::collection::vec(site_strategy(), 1..20)) {
        let first = normalize_sites(
            parse_document_value("sites", collection(features)).unwrap(),
            "sites",
            &mut PreprocessContext::new(),
        ).unwrap();
        let written = serde_json::to_value(&first.collection).unwrap();

        let second = normalize_sites(
            parse_document_value("sites", written).unwrap(),
            "sites",
            &mut PreprocessContext::new(),
        ).unwrap();

        prop_assert!(second.was_processed);
        prop_assert_eq!(first.collection, second.collection);
    }
}

#[test]
fn test_unresolved_operator_noted_once_for_many_features() {
    let features = (0..1000).map(|i| zone_feature((i % 30, i / 30 % 30), 77, 1, 600, 1400)).collect();
    let mut ctx = PreprocessContext::new();

    let zones = normalize_zones(
        parse_document_value("zones", collection(features)).unwrap(),
        "zones",
        &mut ctx,
    ).unwrap();

    assert_eq!(zones.collection.len(), 1000);
    assert_eq!(ctx.unresolved_localities(), vec!["ZONE 77"]);
    assert!(ctx.failed_features().is_empty());
}

#[test]
fn test_mixed_alias_spellings_normalize_alike() {
    let lower = json!({
        "type": "Feature",
        "geometry": {"type": "Polygon", "coordinates": [[[-74.1, 4.6], [-74.0, 4.6], [-74.0, 4.7], [-74.1, 4.6]]]},
        "properties": {"idlocalid_": 11, "idfrecue_": 2, "horainicio": "1300", "horafin": "2130"}
    });
    let zones = normalize_zones(
        parse_document_value("zones", collection(vec![lower])).unwrap(),
        "zones",
        &mut PreprocessContext::new(),
    ).unwrap();

    let zone = zones.collection.features[0].properties.as_processed().unwrap();
    assert_eq!(zone.localidad, "SUBA");
    assert_eq!(zone.frequency.label(), "Mar - Jue - Sáb");
    assert_eq!(zone.shift.to_string(), "Tarde-Noche");
    assert_eq!(zone.schedule_label, "13:00 - 21:30");
}
