//! Zone command implementation

use super::check_coordinates;
use crate::cli::ZoneArgs;
use crate::output::{Human, OutputWriter, Report};
use anyhow::{Context, Result};
use rutaverde_core::catalog::is_in_bogota;
use rutaverde_core::config::LayeredConfig;
use rutaverde_data::{estimated_windows, CollectionWindow, Loader, ZoneResolution, ZoneResolver};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize)]
struct ZoneOutput {
    lat: f64,
    lng: f64,
    found: bool,
    zone: Option<ZoneResolution>,
    windows: Vec<CollectionWindow>,
}

#[derive(Tabled)]
struct WindowRow {
    #[tabled(rename = "Day")]
    day: &'static str,
    #[tabled(rename = "From")]
    start: &'static str,
    #[tabled(rename = "To")]
    end: &'static str,
}

impl Report for ZoneOutput {
    fn render(&self, out: &mut Human) {
        let Some(zone) = &self.zone else {
            out.note(format!("({}, {}) is outside every collection zone", self.lat, self.lng));
            return;
        };

        out.heading("Collection zone")
            .field("Locality", &zone.locality)
            .field("Operator", &zone.operator_name)
            .field("Frequency", &zone.frequency)
            .field("Shift", &zone.shift)
            .field("Schedule", &zone.schedule)
            .field("Source", format!("{} ({})", zone.source, zone.data_date));

        if !self.windows.is_empty() {
            out.heading("Estimated collection windows").table(
                self.windows.iter().map(|w| WindowRow { day: w.day, start: w.start, end: w.end }),
            );
        }
    }
}

/// Resolve the point once and derive everything shown from that zone.
fn zone_report(resolver: &ZoneResolver, lat: f64, lng: f64) -> ZoneOutput {
    let found = resolver.find_zone(lat, lng);
    let windows = found
        .and_then(|(_, feature)| feature.properties.as_processed())
        .map(|zone| estimated_windows(zone.frequency, zone.shift))
        .unwrap_or_default();
    let zone = found.map(|(index, feature)| ZoneResolution::from_feature(index, feature));

    ZoneOutput { lat, lng, found: zone.is_some(), zone, windows }
}

pub async fn execute(args: ZoneArgs, config: LayeredConfig, output: &OutputWriter) -> Result<()> {
    check_coordinates(args.lat, args.lng)?;
    if !is_in_bogota(args.lat, args.lng) {
        tracing::warn!(lat = args.lat, lng = args.lng, "Point is outside Bogotá");
    }

    let loader = Loader::from_config(&config);
    let zones = loader
        .load_zones()
        .await
        .with_context(|| format!("Failed to load zones from {}", config.data_url.value))?;

    let resolver = if args.linear {
        ZoneResolver::linear(zones.collection)
    } else {
        ZoneResolver::indexed(zones.collection)
    };

    output.emit(&zone_report(&resolver, args.lat, args.lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rutaverde_core::models::{Feature, Geometry, RawCollection};
    use rutaverde_data::{PreprocessContext, PreprocessZones};
    use serde_json::json;

    fn resolver() -> ZoneResolver {
        let zone = |west: f64, props: serde_json::Value| {
            let serde_json::Value::Object(map) = props else { panic!("not an object") };
            Feature::new(Some(Geometry::rectangle(west, 4.60, west + 0.05, 4.65)), map)
        };
        let zones = RawCollection::new(vec![
            zone(-74.10, json!({"IDLOCALID_": "13", "IDFRECUE_": "2", "HORAINICIO": 1900, "HORAFIN": 2100})),
            zone(-74.05, json!({"IDLOCALID_": "3", "HORAFIN": "late"})),
        ])
        .preprocess_zones(&mut PreprocessContext::new());
        ZoneResolver::indexed(zones)
    }

    #[test]
    fn test_windows_follow_resolved_zone() {
        let report = zone_report(&resolver(), 4.62, -74.07);

        let zone = report.zone.as_ref().unwrap();
        assert_eq!(zone.zone_index, 0);
        assert_eq!(zone.frequency, "Mar - Jue - Sáb");
        let days: Vec<&str> = report.windows.iter().map(|w| w.day).collect();
        assert_eq!(days, vec!["Martes", "Jueves", "Sábado"]);
    }

    #[test]
    fn test_unprocessed_zone_has_no_windows() {
        let report = zone_report(&resolver(), 4.62, -74.02);
        assert!(report.found);
        assert_eq!(report.zone.as_ref().unwrap().zone_index, 1);
        assert!(report.windows.is_empty());
    }

    #[test]
    fn test_outside_coverage_renders_note() {
        let report = zone_report(&resolver(), 4.95, -74.07);
        assert!(!report.found);

        let mut out = Human::default();
        report.render(&mut out);
        assert!(out.into_text().contains("outside every collection zone"));
    }
}
