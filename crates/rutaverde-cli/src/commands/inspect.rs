//! Inspect command implementation

use crate::cli::InspectArgs;
use crate::output::{Human, OutputWriter, Report};
use anyhow::{Context, Result};
use rutaverde_core::document::read_document;
use rutaverde_core::models::{BoundingBox, Crs};
use rutaverde_data::pipeline::to_wgs84;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct InspectOutput {
    document: String,
    crs: Crs,
    epsg: u32,
    processed: bool,
    feature_count: usize,
    geometry_types: BTreeMap<String, usize>,
    missing_geometry: Vec<usize>,
    invalid_geometry: Vec<(usize, String)>,
    non_feature_entries: Vec<usize>,
    /// Extent after conversion to WGS84
    bbox: Option<BoundingBox>,
}

impl Report for InspectOutput {
    fn render(&self, out: &mut Human) {
        out.heading("Document")
            .field("Path", &self.document)
            .field("CRS", self.crs)
            .field("Processed", if self.processed { "yes" } else { "no" })
            .field("Features", self.feature_count);
        for (kind, count) in &self.geometry_types {
            out.field(format!("  {}", kind), count);
        }

        out.heading("Validation")
            .field("Without geometry", self.missing_geometry.len())
            .field("Unreadable geometry", self.invalid_geometry.len())
            .field("Not a Feature", self.non_feature_entries.len());
        for (index, reason) in &self.invalid_geometry {
            out.warning(format!("feature {}: {}", index, reason));
        }

        out.heading("Extent (WGS84)");
        match self.bbox {
            Some(bbox) => {
                out.field("Longitude", format!("{:.6} .. {:.6}", bbox.min_x, bbox.max_x))
                    .field("Latitude", format!("{:.6} .. {:.6}", bbox.min_y, bbox.max_y));
            }
            None => {
                out.note("No coordinates");
            }
        }
    }
}

pub fn execute(args: InspectArgs, output: &OutputWriter) -> Result<()> {
    let parsed = read_document(&args.path)
        .with_context(|| format!("Failed to read {}", args.path.display()))?;
    let label = args.path.display().to_string();
    let report = parsed.report;

    let mut geometry_types = BTreeMap::new();
    for geometry in parsed.collection.features.iter().filter_map(|f| f.geometry.as_ref()) {
        *geometry_types.entry(geometry.geometry_type().to_string()).or_insert(0) += 1;
    }

    let processed = parsed.collection.is_processed();
    let (wgs84, crs) = to_wgs84(parsed.collection, &label)?;

    let result = InspectOutput {
        document: label,
        crs,
        epsg: crs.epsg(),
        processed,
        feature_count: report.feature_count,
        geometry_types,
        missing_geometry: report.missing_geometry,
        invalid_geometry: report.invalid_geometry,
        non_feature_entries: report.non_feature_entries,
        bbox: wgs84.bounding_box(),
    };

    output.emit(&result)
}
